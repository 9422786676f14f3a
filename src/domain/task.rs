//! To-do items tracked by the organizer.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

pub const MAX_TASK_TEXT: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Editable task fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub text: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self {
            text: text.into(),
            priority,
            due_date: None,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

impl Identifiable for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Task {
    fn name(&self) -> &str {
        &self.text
    }
}

impl Displayable for Task {
    fn display_label(&self) -> String {
        let mark = if self.completed { "x" } else { " " };
        format!("[{}] {} ({})", mark, self.text, self.priority)
    }
}

impl Record for Task {
    type Draft = TaskDraft;

    const ID_PREFIX: &'static str = "task";
    const STORAGE_KEY: &'static str = "student_organizer_tasks";
    const PLURAL: &'static str = "tasks";

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(draft: &TaskDraft) -> Result<(), ValidationError> {
        let text = require_text("task text", &draft.text)?;
        if text.chars().count() > MAX_TASK_TEXT {
            return Err(ValidationError::TooLong {
                field: "task text",
                max: MAX_TASK_TEXT,
            });
        }
        Ok(())
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: TaskDraft) -> Self {
        Self {
            id,
            text: draft.text.trim().to_string(),
            priority: draft.priority,
            completed: false,
            created_at,
            due_date: draft.due_date,
        }
    }

    fn apply(&mut self, draft: TaskDraft) {
        self.text = draft.text.trim().to_string();
        self.priority = draft.priority;
        self.due_date = draft.due_date;
    }

    fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            text: self.text.clone(),
            priority: self.priority,
            due_date: self.due_date,
        }
    }

    fn is_completed(&self) -> bool {
        self.completed
    }

    fn priority(&self) -> Option<Priority> {
        Some(self.priority)
    }

    fn supports_completion() -> bool {
        true
    }

    fn empty_message() -> String {
        "No tasks yet. Add one to get started!".into()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(label)
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ValidationError::UnknownValue {
                field: "priority",
                value: other.to_string(),
            }),
        }
    }
}

/// Counts derived from the task list. Priority buckets only count pending tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = TaskStats {
            total: tasks.len(),
            ..TaskStats::default()
        };
        for task in tasks {
            if task.completed {
                stats.completed += 1;
                continue;
            }
            stats.pending += 1;
            match task.priority {
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
        }
        stats
    }
}
