//! Weekly class schedule entries.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Duration, NaiveTime, Utc, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::common::*;

pub const DEFAULT_CLASS_COLOR: &str = "#800000";

/// Legacy single-time sessions occupy one slot of this length.
const LEGACY_SLOT_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: String,
    pub name: String,
    pub day: Day,
    #[serde(alias = "time")]
    pub start_time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub room: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl ClassSession {
    /// Effective end of the session, deriving one for legacy single-time records.
    pub fn effective_end(&self) -> NaiveTime {
        match self.end_time {
            Some(end) => end.0,
            None => {
                let (end, _) = self
                    .start_time
                    .0
                    .overflowing_add_signed(Duration::minutes(LEGACY_SLOT_MINUTES));
                // Clamp slots running past midnight to the end of the day.
                if end < self.start_time.0 {
                    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(self.start_time.0)
                } else {
                    end
                }
            }
        }
    }

    pub fn time_label(&self) -> String {
        match self.end_time {
            Some(end) => format!("{}-{}", self.start_time, end),
            None => self.start_time.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDraft {
    pub name: String,
    pub day: Day,
    pub start_time: ClockTime,
    pub end_time: Option<ClockTime>,
    pub room: Option<String>,
    pub color: String,
}

impl ClassDraft {
    pub fn new(name: impl Into<String>, day: Day, start: ClockTime, end: ClockTime) -> Self {
        Self {
            name: name.into(),
            day,
            start_time: start,
            end_time: Some(end),
            room: None,
            color: DEFAULT_CLASS_COLOR.into(),
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

impl Identifiable for ClassSession {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for ClassSession {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for ClassSession {
    fn display_label(&self) -> String {
        match &self.room {
            Some(room) => format!("{} {} {} @ {}", self.day, self.time_label(), self.name, room),
            None => format!("{} {} {}", self.day, self.time_label(), self.name),
        }
    }
}

impl Record for ClassSession {
    type Draft = ClassDraft;

    const ID_PREFIX: &'static str = "class";
    const STORAGE_KEY: &'static str = "student_organizer_schedule";
    const PLURAL: &'static str = "classes";

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(draft: &ClassDraft) -> Result<(), ValidationError> {
        require_text("class name", &draft.name)?;
        if let Some(end) = draft.end_time {
            if end <= draft.start_time {
                return Err(ValidationError::InvalidTimeRange);
            }
        }
        if !is_hex_color(&draft.color) {
            return Err(ValidationError::InvalidColor(draft.color.clone()));
        }
        Ok(())
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: ClassDraft) -> Self {
        let mut session = Self {
            id,
            name: String::new(),
            day: draft.day,
            start_time: draft.start_time,
            end_time: None,
            room: None,
            color: String::new(),
            created_at,
        };
        session.apply(draft);
        session
    }

    fn apply(&mut self, draft: ClassDraft) {
        self.name = draft.name.trim().to_string();
        self.day = draft.day;
        self.start_time = draft.start_time;
        self.end_time = draft.end_time;
        self.room = draft
            .room
            .map(|room| room.trim().to_string())
            .filter(|room| !room.is_empty());
        self.color = draft.color;
    }

    fn to_draft(&self) -> ClassDraft {
        ClassDraft {
            name: self.name.clone(),
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            room: self.room.clone(),
            color: self.color.clone(),
        }
    }

    /// Two sessions clash when they share a day and their time ranges intersect.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.day == other.day
            && self.start_time.0 < other.effective_end()
            && other.start_time.0 < self.effective_end()
    }
}

/// Days a class can be scheduled on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
            Weekday::Sun => Day::Sunday,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Day::ALL
            .iter()
            .copied()
            .find(|day| {
                let name = day.as_str();
                normalized == name || (normalized.len() >= 3 && name.starts_with(&normalized))
            })
            .ok_or(ValidationError::UnknownValue {
                field: "day",
                value: normalized,
            })
    }
}

/// Wall-clock time serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(pub NaiveTime);

impl ClockTime {
    pub fn hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(ClockTime)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map(ClockTime)
            .map_err(|_| ValidationError::InvalidTime(value.trim().to_string()))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleStats {
    pub total: usize,
    pub by_day: BTreeMap<Day, usize>,
    pub today: usize,
}

impl ScheduleStats {
    pub fn from_sessions(sessions: &[ClassSession], today: Day) -> Self {
        let mut by_day: BTreeMap<Day, usize> = Day::ALL.iter().map(|day| (*day, 0)).collect();
        for session in sessions {
            *by_day.entry(session.day).or_default() += 1;
        }
        Self {
            total: sessions.len(),
            today: by_day.get(&today).copied().unwrap_or_default(),
            by_day,
        }
    }
}

fn default_color() -> String {
    DEFAULT_CLASS_COLOR.into()
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|room| !room.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> ClockTime {
        ClockTime::hm(hour, minute).unwrap()
    }

    fn session(day: Day, start: ClockTime, end: Option<ClockTime>) -> ClassSession {
        let mut draft = ClassDraft::new("Physics", day, start, at(23, 0));
        draft.end_time = end;
        ClassSession::from_draft(generate_id("class", Utc::now()), Utc::now(), draft)
    }

    #[test]
    fn overlapping_ranges_on_same_day_conflict() {
        let a = session(Day::Monday, at(9, 0), Some(at(10, 30)));
        let b = session(Day::Monday, at(10, 0), Some(at(11, 0)));
        let c = session(Day::Monday, at(10, 30), Some(at(11, 30)));
        let d = session(Day::Tuesday, at(9, 0), Some(at(10, 30)));
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c), "touching ranges do not overlap");
        assert!(!a.conflicts_with(&d));
    }

    #[test]
    fn legacy_time_reads_as_one_hour_slot() {
        let json = r##"{"id":"class_1_abc","name":"Math","day":"monday","time":"09:00","room":"","color":"#800000","createdAt":"2024-01-01T00:00:00Z"}"##;
        let legacy: ClassSession = serde_json::from_str(json).unwrap();
        assert_eq!(legacy.start_time, at(9, 0));
        assert_eq!(legacy.end_time, None);
        assert_eq!(legacy.room, None);
        assert_eq!(legacy.effective_end(), at(10, 0).0);

        let other = session(Day::Monday, at(9, 30), Some(at(9, 45)));
        assert!(legacy.conflicts_with(&other));
    }

    #[test]
    fn validate_rejects_inverted_range_and_bad_color() {
        let draft = ClassDraft::new("Bio", Day::Friday, at(10, 0), at(10, 0));
        assert_eq!(
            ClassSession::validate(&draft),
            Err(ValidationError::InvalidTimeRange)
        );
        let draft = ClassDraft::new("Bio", Day::Friday, at(10, 0), at(11, 0)).with_color("red");
        assert!(matches!(
            ClassSession::validate(&draft),
            Err(ValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn day_parses_full_and_abbreviated_names() {
        assert_eq!("Monday".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("thu".parse::<Day>().unwrap(), Day::Thursday);
        assert!("someday".parse::<Day>().is_err());
    }

    #[test]
    fn stats_fill_every_day() {
        let sessions = vec![
            session(Day::Monday, at(8, 0), Some(at(9, 0))),
            session(Day::Monday, at(9, 0), Some(at(10, 0))),
        ];
        let stats = ScheduleStats::from_sessions(&sessions, Day::Monday);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.today, 2);
        assert_eq!(stats.by_day.len(), 7);
        assert_eq!(stats.by_day[&Day::Sunday], 0);
    }
}
