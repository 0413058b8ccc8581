//! Wire shapes for the external allocation engine. The engine computes the
//! actual seat assignments; this side only builds its submission payload and
//! unpacks its result envelope. Keys here are the engine's snake_case format.

use serde::{Deserialize, Serialize};

use crate::model::{
    AttendanceSessionRecord, Room, ScheduleConfig, SeatingSessionRecord, Student,
};

#[derive(Debug, Clone, Serialize)]
pub struct EngineDateBlock {
    pub date: String,
    pub shifts: Vec<EngineShift>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineShift {
    pub time: String,
    pub years: Vec<EngineAssignment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineAssignment {
    pub year: String,
    pub subject: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineRoom {
    pub name: String,
    pub rows: u32,
    pub cols: u32,
    pub door: String,
    pub seating_pattern: String,
}

/// A room that cannot be submitted yet: rows/cols unset or zero, or no
/// seating pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteRoom {
    pub index: usize,
    pub label: String,
}

/// Serializes a schedule into the engine's submission shape. Expected to run
/// after validation; an incomplete time range degrades to an empty `time`
/// string rather than failing here.
pub fn schedule_payload(config: &ScheduleConfig) -> Vec<EngineDateBlock> {
    config
        .0
        .iter()
        .map(|entry| EngineDateBlock {
            date: entry.date.trim().to_string(),
            shifts: entry
                .shifts
                .iter()
                .map(|shift| EngineShift {
                    time: shift.time_range.render().unwrap_or_default(),
                    years: shift
                        .assignments
                        .iter()
                        .map(|a| EngineAssignment {
                            year: a.year.clone(),
                            subject: a.subject.trim().to_string(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

pub fn room_payload(rooms: &[Room]) -> Result<Vec<EngineRoom>, IncompleteRoom> {
    let mut out = Vec::with_capacity(rooms.len());
    for (index, room) in rooms.iter().enumerate() {
        let (Some(rows), Some(cols)) = (
            room.rows.filter(|&r| r >= 1),
            room.cols.filter(|&c| c >= 1),
        ) else {
            return Err(IncompleteRoom {
                index,
                label: room.label.clone(),
            });
        };
        if room.seating_pattern.trim().is_empty() {
            return Err(IncompleteRoom {
                index,
                label: room.label.clone(),
            });
        }
        out.push(EngineRoom {
            name: room.label.clone(),
            rows,
            cols,
            door: room.door.clone(),
            seating_pattern: room.seating_pattern.clone(),
        });
    }
    Ok(out)
}

/// The engine's full result. Only `seating_plans` and `room_attendance_data`
/// are interpreted; the rest pass through to presentation untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineResult {
    #[serde(default)]
    pub master_timetable: serde_json::Value,
    #[serde(default)]
    pub attendance_data: serde_json::Value,
    #[serde(default)]
    pub exam_dates_map: serde_json::Value,
    #[serde(default)]
    pub seating_plans: Vec<SeatingSessionRecord>,
    #[serde(default)]
    pub room_attendance_data: Vec<RoomAttendanceSheet>,
}

/// One room's raw attendance sheet as the engine emits it: a single mixed
/// list of students across every cohort seated in the room.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomAttendanceSheet {
    pub room_name: String,
    pub date: String,
    pub shift: String,
    #[serde(default)]
    pub students: Vec<Student>,
}

/// Resolves the engine's mixed-year sheets into per-(room, year) records,
/// once, at the ingestion boundary. Student order and first-seen year order
/// are preserved. A sheet with no students still yields one (empty) record so
/// its session stamp survives consolidation.
pub fn split_by_year(sheets: &[RoomAttendanceSheet]) -> Vec<AttendanceSessionRecord> {
    let mut out: Vec<AttendanceSessionRecord> = Vec::new();
    for sheet in sheets {
        let mut buckets: Vec<(String, Vec<Student>)> = Vec::new();
        for student in &sheet.students {
            match buckets.iter_mut().find(|(year, _)| *year == student.year) {
                Some((_, list)) => list.push(student.clone()),
                None => buckets.push((student.year.clone(), vec![student.clone()])),
            }
        }
        if buckets.is_empty() {
            buckets.push((String::new(), Vec::new()));
        }
        for (year, students) in buckets {
            out.push(AttendanceSessionRecord {
                room_name: sheet.room_name.clone(),
                year,
                date: sheet.date.clone(),
                shift: sheet.shift.clone(),
                students,
            });
        }
    }
    out
}
