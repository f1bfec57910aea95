//! Store seam between the handlers and persistence. Handlers only ever see
//! these traits, so the backend is swappable and mockable: Postgres in
//! deployments, the in-memory map for tests and database-free local runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{NewTask, NewUser, Task, TaskPatch, TaskStats, User};
use crate::query::{TaskFilter, TaskSort};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Task persistence. Id generation, durability, and uniqueness live behind
/// this trait; the handlers carry no query syntax of their own.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_many(&self, filter: &TaskFilter, sort: TaskSort) -> Result<Vec<Task>, StoreError>;

    async fn find_one(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Apply a partial update. Fails with `NotFound` when the id has vanished
    /// and `Validation` when the patch breaks the schema (e.g. empty title).
    async fn update_by_id(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;

    /// Grouped total/completed/pending counts over one owner's tasks. A user
    /// with zero tasks gets all-zero counts, never an absent result.
    async fn aggregate_counts(&self, owner: Uuid) -> Result<TaskStats, StoreError>;
}

/// Account persistence for the registration/login flow.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

pub(crate) fn validate_title(title: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation("Please add a title".to_string()));
    }
    Ok(())
}
