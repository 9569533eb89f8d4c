pub mod comment;
pub mod project;
pub mod relations;
pub mod subtask;
pub mod task;
pub mod user;
