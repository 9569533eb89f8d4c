//! taskflow - local task tracking
//!
//! Tasks, subtasks and comments organized into projects, persisted as JSON
//! collections in a key-value store and joined back together on read.

pub mod config;
pub mod models;
pub mod services;
pub mod storage;
