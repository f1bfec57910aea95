pub mod task;
pub mod user;

pub use task::{NewTask, Priority, Task, TaskPatch, TaskStats};
pub use user::{NewUser, User};
