pub mod comments;
pub mod directory;
pub mod filter;
pub mod repository;
pub mod seed;
pub mod subtasks;
pub mod tasks;
pub mod validation;
