//! Task record and field value types for taskbook.
//!
//! Every field a filter expression can address has its own value type here.
//! Each one parses from user text through [`std::str::FromStr`], has a natural
//! ordering, and serializes as a plain string or number.
//!
//! ```
//! use taskbook_model_rs::prelude::*;
//!
//! let task = Task::new("Hello World".parse().unwrap())
//!     .with_priority("3".parse().unwrap())
//!     .with_tags(["CS2103".parse().unwrap()]);
//!
//! assert_eq!(task.priority.value(), 3);
//! assert!(task.name.contains_ignore_case(&"hello".parse().unwrap()));
//! ```

pub mod error;
pub mod models;
pub mod prelude;
