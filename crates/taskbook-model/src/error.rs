//! Error types for the task model.

use thiserror::Error;

/// A specialized Result type for model value parsing.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors produced when user text cannot be turned into a field value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A name was blank.
    #[error("invalid name {value:?}: a name cannot be blank")]
    InvalidName {
        /// The rejected input.
        value: String,
    },

    /// A deadline was not a real calendar date in a supported format.
    #[error("invalid deadline {value:?}: expected a date such as 1/10/2018")]
    InvalidDeadline {
        /// The rejected input.
        value: String,
    },

    /// A priority was not an integer in range.
    #[error("invalid priority {value:?}: expected a number from 0 to 4")]
    InvalidPriority {
        /// The rejected input.
        value: String,
    },

    /// A frequency was not a whole number of days.
    #[error("invalid frequency {value:?}: expected a whole number of days")]
    InvalidFrequency {
        /// The rejected input.
        value: String,
    },

    /// A tag contained something other than letters and digits.
    #[error("invalid tag {value:?}: tags contain only letters and digits")]
    InvalidTag {
        /// The rejected input.
        value: String,
    },

    /// An attachment path was blank.
    #[error("invalid attachment {value:?}: a path cannot be blank")]
    InvalidAttachment {
        /// The rejected input.
        value: String,
    },
}

impl ModelError {
    /// Creates an invalid name error.
    pub fn invalid_name(value: impl Into<String>) -> Self {
        ModelError::InvalidName {
            value: value.into(),
        }
    }

    /// Creates an invalid deadline error.
    pub fn invalid_deadline(value: impl Into<String>) -> Self {
        ModelError::InvalidDeadline {
            value: value.into(),
        }
    }

    /// Creates an invalid priority error.
    pub fn invalid_priority(value: impl Into<String>) -> Self {
        ModelError::InvalidPriority {
            value: value.into(),
        }
    }

    /// Creates an invalid frequency error.
    pub fn invalid_frequency(value: impl Into<String>) -> Self {
        ModelError::InvalidFrequency {
            value: value.into(),
        }
    }

    /// Creates an invalid tag error.
    pub fn invalid_tag(value: impl Into<String>) -> Self {
        ModelError::InvalidTag {
            value: value.into(),
        }
    }

    /// Creates an invalid attachment error.
    pub fn invalid_attachment(value: impl Into<String>) -> Self {
        ModelError::InvalidAttachment {
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_quote_the_input() {
        let err = ModelError::invalid_priority("high");
        assert_eq!(
            err.to_string(),
            "invalid priority \"high\": expected a number from 0 to 4"
        );

        let err = ModelError::invalid_tag("CS 2103");
        assert!(err.to_string().contains("\"CS 2103\""));
    }
}
