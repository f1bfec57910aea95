//! Postgres store. SQL stays inside this module; the handlers only see the
//! `TaskStore`/`UserStore` traits.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::model::{NewTask, NewUser, Task, TaskPatch, TaskStats, User};
use crate::query::{TaskFilter, TaskSort};
use crate::store::{validate_title, StoreError, TaskStore, UserStore};

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"#;

const CREATE_TASKS: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner UUID NOT NULL REFERENCES users(id),
    title TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    priority TEXT,
    due_date TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"#;

const CREATE_TASKS_OWNER_IDX: &str =
    "CREATE INDEX IF NOT EXISTS tasks_owner_idx ON tasks (owner)";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and make sure the schema exists.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let url = config
            .database
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Connection("DATABASE_URL is not set".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        for ddl in [CREATE_USERS, CREATE_TASKS, CREATE_TASKS_OWNER_IDX] {
            sqlx::query(ddl).execute(&pool).await?;
        }

        Ok(Self { pool })
    }

    fn order_by(sort: TaskSort) -> &'static str {
        match sort {
            TaskSort::DueDateAsc => "due_date ASC NULLS FIRST",
            TaskSort::PriorityDesc => {
                "CASE priority WHEN 'high' THEN 3 WHEN 'medium' THEN 2 WHEN 'low' THEN 1 ELSE 0 END DESC"
            }
            TaskSort::CreatedDesc => "created_at DESC",
        }
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_many(&self, filter: &TaskFilter, sort: TaskSort) -> Result<Vec<Task>, StoreError> {
        // Incrementally build the WHERE clause so only present filters bind
        let mut sql = String::from("SELECT * FROM tasks WHERE owner = $1");
        let mut idx = 1;
        if filter.completed.is_some() {
            idx += 1;
            sql.push_str(&format!(" AND completed = ${}", idx));
        }
        if filter.priority.is_some() {
            idx += 1;
            sql.push_str(&format!(" AND priority = ${}", idx));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(Self::order_by(sort));

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(filter.owner);
        if let Some(completed) = filter.completed {
            query = query.bind(completed);
        }
        if let Some(priority) = &filter.priority {
            query = query.bind(priority);
        }

        let tasks = query.fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        validate_title(&task.title)?;

        let created = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (owner, title, completed, priority, due_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(task.owner)
        .bind(&task.title)
        .bind(task.completed)
        .bind(task.priority.map(|p| p.as_str()))
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_by_id(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }

        if patch.is_empty() {
            // Nothing to change; behave like a read
            return self
                .find_one(id)
                .await?
                .ok_or_else(|| StoreError::NotFound("Task not found".to_string()));
        }

        let mut sets = Vec::new();
        let mut idx = 1;
        if patch.title.is_some() {
            idx += 1;
            sets.push(format!("title = ${}", idx));
        }
        if patch.completed.is_some() {
            idx += 1;
            sets.push(format!("completed = ${}", idx));
        }
        if patch.priority.is_some() {
            idx += 1;
            sets.push(format!("priority = ${}", idx));
        }
        if patch.due_date.is_some() {
            idx += 1;
            sets.push(format!("due_date = ${}", idx));
        }

        let sql = format!(
            "UPDATE tasks SET {} WHERE id = $1 RETURNING *",
            sets.join(", ")
        );

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(id);
        if let Some(title) = &patch.title {
            query = query.bind(title);
        }
        if let Some(completed) = patch.completed {
            query = query.bind(completed);
        }
        if let Some(priority) = patch.priority {
            query = query.bind(priority.as_str());
        }
        if let Some(due_date) = patch.due_date {
            query = query.bind(due_date);
        }

        query
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("Task not found".to_string()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Task not found".to_string()));
        }
        Ok(())
    }

    async fn aggregate_counts(&self, owner: Uuid) -> Result<TaskStats, StoreError> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE completed) FROM tasks WHERE owner = $1",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        let (total, completed) = row;
        Ok(TaskStats { total, completed, pending: total - completed })
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
                Err(StoreError::Conflict("Email is already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
