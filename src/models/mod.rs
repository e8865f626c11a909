pub mod task;
pub mod user;

pub use task::{CreateTaskInput, Task, TaskStatus, UpdateTaskInput};
pub use user::{PublicUser, UpdateUserInput, User};
