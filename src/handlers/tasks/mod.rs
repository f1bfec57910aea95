// /tasks handlers, one file per operation. Each composes the query builder,
// the ownership guard, and the store trait; no query syntax lives here.

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod stats;
pub mod update;

pub use create::create;
pub use delete::delete;
pub use get::get_one;
pub use list::list;
pub use stats::stats;
pub use update::update;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse the `{id}` path segment. A non-UUID value can never name a stored
/// task, so it is reported as NotFound rather than a parse error.
pub(crate) fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Task not found"))
}
