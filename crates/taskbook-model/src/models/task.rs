//! Task model.
//!
//! This module defines the Task struct, the record that filter expressions are
//! evaluated against.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::fields::{Attachment, Deadline, Frequency, Name, Priority, Tag};

/// A task in the task book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// What the task is about.
    pub name: Name,

    /// The date the task is due by, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Deadline>,

    /// Task priority from 0 (whenever) to 4 (most urgent).
    #[serde(default)]
    pub priority: Priority,

    /// Recurrence interval in days (0 for one-off tasks).
    #[serde(default)]
    pub frequency: Frequency,

    /// Tags attached to the task.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<Tag>,

    /// File paths attached to the task.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attachments: BTreeSet<Attachment>,
}

impl Task {
    /// Creates a task with the given name and default values for everything else.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            deadline: None,
            priority: Priority::default(),
            frequency: Frequency::default(),
            tags: BTreeSet::new(),
            attachments: BTreeSet::new(),
        }
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the frequency.
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Replaces the tag set.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Replaces the attachment set.
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = Attachment>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserialize_minimal() {
        let json = r#"{"name": "Read chapter 3"}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.name.as_str(), "Read chapter 3");
        assert!(task.deadline.is_none());
        assert_eq!(task.priority.value(), 0);
        assert_eq!(task.frequency.days(), 0);
        assert!(task.tags.is_empty());
        assert!(task.attachments.is_empty());
    }

    #[test]
    fn test_task_deserialize_full() {
        let json = r#"{
            "name": "Submit report",
            "deadline": "1/10/2018",
            "priority": 3,
            "frequency": 7,
            "tags": ["CS2103", "CS2101"],
            "attachments": ["report.docx"]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.deadline.unwrap().to_string(), "1/10/2018");
        assert_eq!(task.priority.value(), 3);
        assert!(task.frequency.is_recurring());
        assert_eq!(task.tags.len(), 2);
        assert!(task.tags.contains(&"CS2101".parse().unwrap()));
        assert_eq!(task.attachments.len(), 1);
    }

    #[test]
    fn test_task_rejects_invalid_field() {
        let json = r#"{"name": "Oops", "priority": 7}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_task_serialize_skips_empty() {
        let task = Task::new("Plain".parse().unwrap());
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["name"], "Plain");
        assert!(json.get("deadline").is_none());
        assert!(json.get("tags").is_none());
        assert_eq!(json["priority"], 0);
    }

    #[test]
    fn test_builders_replace_sets() {
        let task = Task::new("Builder".parse().unwrap())
            .with_tags(["a1".parse().unwrap(), "a1".parse().unwrap()])
            .with_attachments(["x.txt".parse().unwrap()]);

        assert_eq!(task.tags.len(), 1);
        assert_eq!(task.attachments.len(), 1);
    }
}
