use serde::{Deserialize, Serialize};

pub const DEFAULT_DOOR: &str = "right";
pub const DEFAULT_SEATING_PATTERN: &str = "IV Yr, III Yr, II Yr, I Yr";

fn default_door() -> String {
    DEFAULT_DOOR.to_string()
}

/// One physical exam room as configured by the user. Order within the room
/// list is the only ranking that matters; label cascades walk it by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub label: String,
    pub rows: Option<u32>,
    pub cols: Option<u32>,
    #[serde(default = "default_door")]
    pub door: String,
    #[serde(default)]
    pub seating_pattern: String,
}

/// Ordered list of exam dates. Serialized as a bare array, matching what the
/// front end submits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleConfig(pub Vec<DateEntry>);

impl ScheduleConfig {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateEntry {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub shifts: Vec<ShiftEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftEntry {
    #[serde(default)]
    pub time_range: TimeRange,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// One cohort's exam within a shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub year: String,
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    #[serde(default)]
    pub start: TimeParts,
    #[serde(default)]
    pub end: TimeParts,
}

/// A 12-hour clock time as three independently-filled form fields. Any of the
/// three may still be unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeParts {
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub meridiem: Option<String>,
}

impl TimeParts {
    pub fn is_complete(&self) -> bool {
        self.hour.is_some()
            && self.minute.is_some()
            && self.meridiem.as_deref().is_some_and(|m| !m.trim().is_empty())
    }

    /// Renders `"9:05 AM"` (hour unpadded, minute two-digit). None until all
    /// three parts are present.
    pub fn render(&self) -> Option<String> {
        let hour = self.hour?;
        let minute = self.minute?;
        let meridiem = self.meridiem.as_deref()?.trim();
        if meridiem.is_empty() {
            return None;
        }
        Some(format!("{}:{:02} {}", hour, minute, meridiem))
    }
}

impl TimeRange {
    pub fn is_complete(&self) -> bool {
        self.start.is_complete() && self.end.is_complete()
    }

    pub fn render(&self) -> Option<String> {
        Some(format!("{} - {}", self.start.render()?, self.end.render()?))
    }
}

/// Normalized student identity. The engine boundary resolves the loose
/// "plain string or record" occupant shape into this exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub enrollment: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub year: String,
}

/// One room's computed seating for exactly one (date, shift), as returned by
/// the allocation engine. Snake-case keys are the engine's wire format. The
/// occupant-bearing fields stay opaque JSON; the core never interprets seat
/// contents, it only fingerprints them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingSessionRecord {
    pub room_name: String,
    pub date: String,
    pub shift: String,
    #[serde(default)]
    pub rows: u32,
    #[serde(default)]
    pub cols: u32,
    #[serde(default = "default_door")]
    pub door: String,
    #[serde(default)]
    pub headers: serde_json::Value,
    #[serde(default)]
    pub matrix: serde_json::Value,
    #[serde(default)]
    pub counts: serde_json::Value,
    #[serde(default)]
    pub total_in_room: i64,
}

/// One (room, year) attendance list for exactly one (date, shift). Produced
/// by splitting the engine's mixed-year room sheets at the ingestion boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSessionRecord {
    pub room_name: String,
    pub year: String,
    pub date: String,
    pub shift: String,
    #[serde(default)]
    pub students: Vec<Student>,
}

/// A (date, shift) pair stamped onto a consolidated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStamp {
    pub date: String,
    pub shift: String,
}

/// A seating record merged with every other content-identical record for the
/// same room, annotated with all sessions it covers.
#[derive(Debug, Clone, Serialize)]
pub struct SeatingArtifact {
    pub room_name: String,
    pub rows: u32,
    pub cols: u32,
    pub door: String,
    pub headers: serde_json::Value,
    pub matrix: serde_json::Value,
    pub counts: serde_json::Value,
    pub total_in_room: i64,
    pub sessions: Vec<SessionStamp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceArtifact {
    pub room_name: String,
    pub year: String,
    pub students: Vec<Student>,
    pub sessions: Vec<SessionStamp>,
}
