//! Pure list rendering: filter, sort and placeholder selection.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::{Priority, Record, ValidationError};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    fn admits<R: Record>(&self, record: &R) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !record.is_completed(),
            StatusFilter::Completed => record.is_completed(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        })
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" | "pending" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            other => Err(ValidationError::UnknownValue {
                field: "filter",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Completed last, then higher priority, then newest.
    #[default]
    Smart,
    Newest,
    Oldest,
    NameAsc,
    NameDesc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Smart => "smart",
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
        })
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "smart" | "default" => Ok(SortOrder::Smart),
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "name-asc" | "az" => Ok(SortOrder::NameAsc),
            "name-desc" | "za" => Ok(SortOrder::NameDesc),
            other => Err(ValidationError::UnknownValue {
                field: "sort order",
                value: other.to_string(),
            }),
        }
    }
}

/// Per-domain list settings, persisted next to the collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewPreferences {
    pub filter: StatusFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub sort: SortOrder,
    pub hide_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Per-row action exposed to the adapter layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Toggle,
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a, R> {
    pub record: &'a R,
    pub affordances: Vec<Affordance>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView<'a, R> {
    Empty(String),
    Rows(Vec<Row<'a, R>>),
}

impl<'a, R> ListView<'a, R> {
    pub fn rows(&self) -> &[Row<'a, R>] {
        match self {
            ListView::Empty(_) => &[],
            ListView::Rows(rows) => rows,
        }
    }
}

/// Derives the visible list from the collection and the active preferences.
pub fn render<'a, R: Record>(records: &'a [R], prefs: &ViewPreferences) -> ListView<'a, R> {
    if records.is_empty() {
        return ListView::Empty(R::empty_message());
    }

    let mut visible: Vec<&R> = records
        .iter()
        .filter(|record| prefs.filter.admits(*record))
        .filter(|record| !(prefs.hide_completed && record.is_completed()))
        .filter(|record| match prefs.priority {
            Some(wanted) => record.priority().map_or(true, |p| p == wanted),
            None => true,
        })
        .collect();

    if visible.is_empty() {
        let message = if prefs.filter == StatusFilter::All {
            format!("No matching {}", R::PLURAL)
        } else {
            format!("No {} {}", prefs.filter, R::PLURAL)
        };
        return ListView::Empty(message);
    }

    visible.sort_by(|a, b| compare(*a, *b, prefs.sort));
    if let Some(limit) = prefs.limit.or(R::LIST_LIMIT) {
        visible.truncate(limit);
    }

    let affordances = if R::supports_completion() {
        vec![Affordance::Toggle, Affordance::Edit, Affordance::Delete]
    } else {
        vec![Affordance::Edit, Affordance::Delete]
    };

    ListView::Rows(
        visible
            .into_iter()
            .map(|record| Row {
                record,
                affordances: affordances.clone(),
            })
            .collect(),
    )
}

fn compare<R: Record>(a: &R, b: &R, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Smart => a
            .is_completed()
            .cmp(&b.is_completed())
            .then_with(|| b.priority().cmp(&a.priority()))
            .then_with(|| b.created_at().cmp(&a.created_at())),
        SortOrder::Newest => b.created_at().cmp(&a.created_at()),
        SortOrder::Oldest => a.created_at().cmp(&b.created_at()),
        SortOrder::NameAsc => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortOrder::NameDesc => b.name().to_lowercase().cmp(&a.name().to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskDraft};
    use chrono::{Duration, Utc};

    fn tasks() -> Vec<Task> {
        let base = Utc::now();
        let specs = [
            ("walk dog", Priority::Low, false, 0),
            ("essay", Priority::High, true, 1),
            ("buy milk", Priority::Medium, false, 2),
            ("Apply for grant", Priority::High, false, 3),
        ];
        specs
            .iter()
            .enumerate()
            .map(|(idx, (text, priority, done, minutes))| {
                let mut task = Task::from_draft(
                    format!("task_{idx}"),
                    base + Duration::minutes(*minutes),
                    TaskDraft::new(*text, *priority),
                );
                task.completed = *done;
                task
            })
            .collect()
    }

    fn names<'a>(view: &ListView<'a, Task>) -> Vec<&'a str> {
        view.rows().iter().map(|row| row.record.text.as_str()).collect()
    }

    #[test]
    fn smart_order_sinks_completed_and_ranks_priority() {
        let tasks = tasks();
        let view = render(&tasks, &ViewPreferences::default());
        assert_eq!(
            names(&view),
            vec!["Apply for grant", "buy milk", "walk dog", "essay"]
        );
        assert_eq!(
            view.rows()[0].affordances,
            vec![Affordance::Toggle, Affordance::Edit, Affordance::Delete]
        );
    }

    #[test]
    fn filters_and_hide_completed_apply() {
        let tasks = tasks();
        let prefs = ViewPreferences {
            filter: StatusFilter::Completed,
            ..ViewPreferences::default()
        };
        assert_eq!(names(&render(&tasks, &prefs)), vec!["essay"]);

        let prefs = ViewPreferences {
            hide_completed: true,
            priority: Some(Priority::High),
            ..ViewPreferences::default()
        };
        assert_eq!(names(&render(&tasks, &prefs)), vec!["Apply for grant"]);
    }

    #[test]
    fn name_sort_ignores_case_and_limit_truncates() {
        let tasks = tasks();
        let prefs = ViewPreferences {
            sort: SortOrder::NameAsc,
            limit: Some(2),
            ..ViewPreferences::default()
        };
        assert_eq!(names(&render(&tasks, &prefs)), vec!["Apply for grant", "buy milk"]);
    }

    #[test]
    fn empty_states_use_placeholders() {
        let none: Vec<Task> = Vec::new();
        assert_eq!(
            render(&none, &ViewPreferences::default()),
            ListView::Empty("No tasks yet. Add one to get started!".into())
        );

        let mut tasks = tasks();
        tasks.retain(|task| !task.completed);
        let prefs = ViewPreferences {
            filter: StatusFilter::Completed,
            ..ViewPreferences::default()
        };
        assert_eq!(
            render(&tasks, &prefs),
            ListView::Empty("No completed tasks".into())
        );
    }
}
