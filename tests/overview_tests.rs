use std::time::{Duration, Instant};

use chrono::NaiveDate;
use organizer_core::{
    core::services::{OverviewService, OverviewTracker},
    domain::{Category, ClassDraft, ClockTime, Day, Priority, TaskDraft, TransactionDraft},
    Organizer,
};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

fn at(hour: u32) -> ClockTime {
    ClockTime::hm(hour, 0).unwrap()
}

#[test]
fn snapshot_combines_all_collections() {
    let mut organizer = Organizer::in_memory();
    for n in 0..7 {
        organizer
            .tasks
            .add(TaskDraft::new(format!("task {n}"), Priority::Medium))
            .unwrap();
    }
    let done = organizer.tasks.all()[0].id.clone();
    organizer.tasks.toggle_complete(&done);
    organizer
        .tasks
        .add(TaskDraft::new("urgent", Priority::High))
        .unwrap();

    organizer
        .schedule
        .add(ClassDraft::new("Late", Day::Monday, at(15), at(16)))
        .unwrap();
    organizer
        .schedule
        .add(ClassDraft::new("Early", Day::Monday, at(8), at(9)))
        .unwrap();
    organizer
        .schedule
        .add(ClassDraft::new("Other day", Day::Friday, at(8), at(9)))
        .unwrap();
    organizer
        .budget
        .add(TransactionDraft::expense("Rent", 200.0, Category::Housing))
        .unwrap();

    let overview = OverviewService::snapshot(&organizer, monday());
    assert_eq!(overview.pending_tasks, 7);
    assert_eq!(overview.high_priority, 1);
    assert_eq!(overview.upcoming_tasks.len(), 5);
    assert_eq!(overview.upcoming_tasks[0].text, "urgent");
    assert!(overview.upcoming_tasks.iter().all(|task| !task.completed));
    assert_eq!(overview.today, Day::Monday);
    assert_eq!(overview.today_classes, 2);
    let names: Vec<&str> = overview
        .todays_schedule
        .iter()
        .map(|session| session.name.as_str())
        .collect();
    assert_eq!(names, vec!["Early", "Late"]);
    assert_eq!(overview.balance, -200.0);
    assert!(overview.balance_negative);
}

#[test]
fn tracker_ignores_polls_without_changes() {
    let mut organizer = Organizer::in_memory();
    let mut tracker = OverviewTracker::new(Duration::from_millis(100));
    let t0 = Instant::now();
    assert!(tracker.poll(&organizer, monday(), t0).is_some());

    for step in 1..5 {
        assert!(tracker
            .poll(&organizer, monday(), t0 + Duration::from_secs(step))
            .is_none());
    }

    organizer
        .budget
        .add(TransactionDraft::income("Job", 50.0, Category::Other))
        .unwrap();
    let t1 = t0 + Duration::from_secs(10);
    assert!(tracker.poll(&organizer, monday(), t1).is_none());
    let refreshed = tracker
        .poll(&organizer, monday(), t1 + Duration::from_millis(150))
        .unwrap();
    assert_eq!(refreshed.balance, 50.0);
    assert!(tracker
        .poll(&organizer, monday(), t1 + Duration::from_millis(300))
        .is_none());
}
