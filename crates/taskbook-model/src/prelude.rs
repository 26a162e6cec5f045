//! Convenient re-exports of the model types.
//!
//! ```
//! use taskbook_model_rs::prelude::*;
//! ```

pub use crate::error::{ModelError, Result};
pub use crate::models::{Attachment, Deadline, Frequency, Name, Priority, Tag, Task};
