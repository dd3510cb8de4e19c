pub mod task;
pub mod user;

pub use task::{
    CreateTaskRequest, NewTask, ParseTaskStatusError, Task, TaskChanges, TaskQuery, TaskStatus,
    UpdateTaskRequest,
};
pub use user::User;
