//! Filter expressions and task storage for taskbook.
//!
//! The [`filter`] module compiles filter expressions such as
//! `(n:Hello || d:1/10/2018) && t:"CS2103,CS2101"` into predicates over
//! [`Task`](taskbook_model_rs::models::Task)s. The [`TaskStore`] reads the
//! JSON task list those predicates run against.

pub mod filter;
mod store;

pub use store::{Result, TaskList, TaskStore, TaskStoreError};
