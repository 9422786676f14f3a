//! Task-specific commands and derived views.

use chrono::NaiveDate;

use crate::core::manager::{Mutation, RecordManager};
use crate::core::view::{SortOrder, StatusFilter};
use crate::domain::{Priority, Task, TaskStats};

/// Stateless helpers over the task collection.
pub struct TodoService;

impl TodoService {
    pub fn stats(tasks: &RecordManager<Task>) -> TaskStats {
        TaskStats::from_tasks(tasks.all())
    }

    pub fn toggle(tasks: &mut RecordManager<Task>, id: &str) -> Option<Mutation> {
        tasks.toggle_complete(id)
    }

    /// First `limit` pending tasks in collection order.
    pub fn pending(tasks: &RecordManager<Task>, limit: usize) -> Vec<&Task> {
        tasks
            .all()
            .iter()
            .filter(|task| !task.completed)
            .take(limit)
            .collect()
    }

    /// Pending tasks whose due date lies before `today`.
    pub fn overdue(tasks: &RecordManager<Task>, today: NaiveDate) -> Vec<&Task> {
        tasks
            .all()
            .iter()
            .filter(|task| !task.completed && task.due_date.is_some_and(|due| due < today))
            .collect()
    }

    pub fn set_filter(tasks: &mut RecordManager<Task>, filter: StatusFilter) -> bool {
        tasks.update_view(|view| view.filter = filter)
    }

    pub fn set_priority_filter(tasks: &mut RecordManager<Task>, priority: Option<Priority>) -> bool {
        tasks.update_view(|view| view.priority = priority)
    }

    pub fn set_sort(tasks: &mut RecordManager<Task>, sort: SortOrder) -> bool {
        tasks.update_view(|view| view.sort = sort)
    }

    pub fn set_hide_completed(tasks: &mut RecordManager<Task>, hide: bool) -> bool {
        tasks.update_view(|view| view.hide_completed = hide)
    }
}
