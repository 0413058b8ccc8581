use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

use crate::model::{
    AttendanceArtifact, AttendanceSessionRecord, SeatingArtifact, SeatingSessionRecord,
    SessionStamp,
};

/// Content fingerprint: sha256 over the canonical JSON of the occupant-bearing
/// field. serde_json emits object keys sorted and preserves array order, so
/// two records serialize identically exactly when they describe the same
/// arrangement.
fn fingerprint(value: &serde_json::Value) -> Option<String> {
    if value.is_null() {
        return None;
    }
    let canonical = serde_json::to_string(value).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Some(format!("{:x}", hasher.finalize()))
}

/// Per-record stand-in for records whose occupant field is missing. The `#`
/// prefix cannot collide with a hex digest, so such records always land in
/// their own single-session artifact instead of failing the pass.
fn synthetic_key(ordinal: usize) -> String {
    format!("#unfingerprinted-{}", ordinal)
}

/// Merges seating records that share `(room, matrix-content)` into one
/// artifact carrying every `(date, shift)` it applies to. The first record
/// seen for a key is canonical and supplies all non-session fields; every
/// record contributes its session stamp in input order. No record is dropped.
pub fn consolidate_seating(records: &[SeatingSessionRecord]) -> Vec<SeatingArtifact> {
    let mut artifacts: Vec<SeatingArtifact> = Vec::new();
    let mut by_key: HashMap<(String, String), usize> = HashMap::new();

    for (ordinal, record) in records.iter().enumerate() {
        let content_key = fingerprint(&record.matrix).unwrap_or_else(|| synthetic_key(ordinal));
        let key = (record.room_name.clone(), content_key);
        let stamp = SessionStamp {
            date: record.date.clone(),
            shift: record.shift.clone(),
        };
        match by_key.get(&key) {
            Some(&index) => artifacts[index].sessions.push(stamp),
            None => {
                by_key.insert(key, artifacts.len());
                artifacts.push(SeatingArtifact {
                    room_name: record.room_name.clone(),
                    rows: record.rows,
                    cols: record.cols,
                    door: record.door.clone(),
                    headers: record.headers.clone(),
                    matrix: record.matrix.clone(),
                    counts: record.counts.clone(),
                    total_in_room: record.total_in_room,
                    sessions: vec![stamp],
                });
            }
        }
    }

    artifacts
}

/// Merges per-(room, year) attendance records whose ordered enrollment lists
/// are identical. Same canonical-first, stamp-everything policy as seating.
pub fn consolidate_attendance(records: &[AttendanceSessionRecord]) -> Vec<AttendanceArtifact> {
    let mut artifacts: Vec<AttendanceArtifact> = Vec::new();
    let mut by_key: HashMap<(String, String, String), usize> = HashMap::new();

    for (ordinal, record) in records.iter().enumerate() {
        let enrollments: Vec<&str> = record
            .students
            .iter()
            .map(|s| s.enrollment.as_str())
            .collect();
        let roster = serde_json::to_value(&enrollments).unwrap_or(serde_json::Value::Null);
        // An empty roster still fingerprints ("[]"), so empty sheets group
        // with each other rather than vanishing.
        let content_key = fingerprint(&roster).unwrap_or_else(|| synthetic_key(ordinal));
        let key = (record.room_name.clone(), record.year.clone(), content_key);
        let stamp = SessionStamp {
            date: record.date.clone(),
            shift: record.shift.clone(),
        };
        match by_key.get(&key) {
            Some(&index) => artifacts[index].sessions.push(stamp),
            None => {
                by_key.insert(key, artifacts.len());
                artifacts.push(AttendanceArtifact {
                    room_name: record.room_name.clone(),
                    year: record.year.clone(),
                    students: record.students.clone(),
                    sessions: vec![stamp],
                });
            }
        }
    }

    artifacts
}

/// Distinct room names in first-seen order. This mirrors the user-entered
/// room order; it is never re-sorted.
pub fn distinct_rooms<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if seen.insert(name) {
            out.push(name.to_string());
        }
    }
    out
}
