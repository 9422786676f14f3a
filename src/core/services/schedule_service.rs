//! Weekly schedule queries.

use crate::core::manager::RecordManager;
use crate::domain::{ClassDraft, ClassSession, Day, Record, ScheduleStats};

pub struct ScheduleService;

impl ScheduleService {
    pub fn stats(schedule: &RecordManager<ClassSession>, today: Day) -> ScheduleStats {
        ScheduleStats::from_sessions(schedule.all(), today)
    }

    /// Sessions held on `day`, earliest first.
    pub fn classes_for_day(schedule: &RecordManager<ClassSession>, day: Day) -> Vec<&ClassSession> {
        let mut sessions: Vec<&ClassSession> = schedule
            .all()
            .iter()
            .filter(|session| session.day == day)
            .collect();
        sessions.sort_by_key(|session| session.start_time);
        sessions
    }

    /// Full week grouped by day, each day ordered by start time.
    pub fn week(schedule: &RecordManager<ClassSession>) -> Vec<(Day, Vec<&ClassSession>)> {
        Day::ALL
            .iter()
            .map(|day| (*day, Self::classes_for_day(schedule, *day)))
            .collect()
    }

    /// Existing sessions a draft would clash with, ignoring `exclude`.
    pub fn conflicts<'a>(
        schedule: &'a RecordManager<ClassSession>,
        draft: &ClassDraft,
        exclude: Option<&str>,
    ) -> Vec<&'a ClassSession> {
        let probe = ClassSession::from_draft(String::new(), chrono::Utc::now(), draft.clone());
        schedule
            .all()
            .iter()
            .filter(|session| Some(session.id.as_str()) != exclude)
            .filter(|session| probe.conflicts_with(session))
            .collect()
    }
}
