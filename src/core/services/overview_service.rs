//! Cross-collection dashboard and its refresh policy.

use std::time::{Duration, Instant};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::core::organizer::{Organizer, Revisions};
use crate::core::services::{BudgetService, ScheduleService, TodoService};
use crate::domain::{ClassSession, Day, Task};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);
const UPCOMING_TASKS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub pending_tasks: usize,
    pub high_priority: usize,
    pub today: Day,
    pub today_classes: usize,
    pub balance: f64,
    pub balance_negative: bool,
    pub upcoming_tasks: Vec<Task>,
    pub todays_schedule: Vec<ClassSession>,
}

pub struct OverviewService;

impl OverviewService {
    /// Reads the current stats of every collection; never mutates them.
    pub fn snapshot(organizer: &Organizer, today: NaiveDate) -> Overview {
        let day = Day::from(today.weekday());
        let tasks = TodoService::stats(&organizer.tasks);
        let budget = BudgetService::stats(&organizer.budget);
        let todays_schedule: Vec<ClassSession> =
            ScheduleService::classes_for_day(&organizer.schedule, day)
                .into_iter()
                .cloned()
                .collect();
        Overview {
            pending_tasks: tasks.pending,
            high_priority: tasks.high,
            today: day,
            today_classes: todays_schedule.len(),
            balance: budget.balance,
            balance_negative: budget.balance < 0.0,
            upcoming_tasks: TodoService::pending(&organizer.tasks, UPCOMING_TASKS)
                .into_iter()
                .cloned()
                .collect(),
            todays_schedule,
        }
    }
}

/// Decides when the dashboard repaints.
///
/// A change is only picked up once `debounce` has passed without a further
/// change, so a burst of mutations produces a single refresh.
#[derive(Debug, Clone)]
pub struct OverviewTracker {
    debounce: Duration,
    seen: Option<Revisions>,
    /// Latest unseen revisions and when they were first observed.
    pending: Option<(Revisions, Instant)>,
    force: bool,
}

impl Default for OverviewTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl OverviewTracker {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            seen: None,
            pending: None,
            force: true,
        }
    }

    /// Tab activation: the next poll refreshes unconditionally.
    pub fn activate(&mut self) {
        self.force = true;
    }

    pub fn poll(
        &mut self,
        organizer: &Organizer,
        today: NaiveDate,
        now: Instant,
    ) -> Option<Overview> {
        let current = organizer.revisions();
        if self.force {
            return Some(self.refresh(organizer, today, current));
        }
        if self.seen == Some(current) {
            self.pending = None;
            return None;
        }
        // Each further change restarts the quiet window.
        let since = match self.pending {
            Some((revisions, since)) if revisions == current => since,
            _ => {
                self.pending = Some((current, now));
                now
            }
        };
        if now.duration_since(since) < self.debounce {
            return None;
        }
        Some(self.refresh(organizer, today, current))
    }

    fn refresh(&mut self, organizer: &Organizer, today: NaiveDate, current: Revisions) -> Overview {
        self.force = false;
        self.pending = None;
        self.seen = Some(current);
        OverviewService::snapshot(organizer, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskDraft};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
    }

    #[test]
    fn tracker_waits_for_debounce_after_mutation() {
        let mut organizer = Organizer::in_memory();
        let mut tracker = OverviewTracker::new(Duration::from_millis(100));
        let start = Instant::now();

        assert!(tracker.poll(&organizer, today(), start).is_some(), "first poll paints");
        assert!(tracker.poll(&organizer, today(), start).is_none(), "nothing changed");

        organizer
            .tasks
            .add(TaskDraft::new("Buy milk", Priority::High))
            .unwrap();
        assert!(tracker.poll(&organizer, today(), start).is_none());
        assert!(tracker
            .poll(&organizer, today(), start + Duration::from_millis(50))
            .is_none());
        let overview = tracker
            .poll(&organizer, today(), start + Duration::from_millis(100))
            .expect("refresh after debounce");
        assert_eq!(overview.pending_tasks, 1);
        assert_eq!(overview.high_priority, 1);
    }

    #[test]
    fn further_changes_restart_the_quiet_window() {
        let mut organizer = Organizer::in_memory();
        let mut tracker = OverviewTracker::new(Duration::from_millis(100));
        let start = Instant::now();
        tracker.poll(&organizer, today(), start);

        organizer.tasks.add(TaskDraft::new("Essay", Priority::Low)).unwrap();
        assert!(tracker.poll(&organizer, today(), start).is_none());

        let later = start + Duration::from_millis(80);
        organizer.tasks.add(TaskDraft::new("Slides", Priority::Low)).unwrap();
        assert!(tracker.poll(&organizer, today(), later).is_none());
        assert!(
            tracker
                .poll(&organizer, today(), start + Duration::from_millis(120))
                .is_none(),
            "second change pushed the refresh back"
        );
        let overview = tracker
            .poll(&organizer, today(), later + Duration::from_millis(100))
            .expect("refresh once changes settle");
        assert_eq!(overview.pending_tasks, 2);
    }

    #[test]
    fn activation_forces_refresh() {
        let organizer = Organizer::in_memory();
        let mut tracker = OverviewTracker::default();
        let now = Instant::now();
        tracker.poll(&organizer, today(), now);
        tracker.activate();
        assert!(tracker.poll(&organizer, today(), now).is_some());
    }
}
