//! Data models for taskbook tasks.

mod fields;
mod task;

pub use fields::{Attachment, Deadline, Frequency, Name, Priority, Tag};
pub use task::Task;
