use crate::consolidate;
use crate::engine::{self, EngineResult, RoomAttendanceSheet};
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::SeatingSessionRecord;
use serde_json::json;

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, HandlerErr> {
    serde_json::to_value(value).map_err(|e| HandlerErr::new("serialize_failed", e.to_string()))
}

fn parse_field<T: serde::de::DeserializeOwned>(
    params: &serde_json::Value,
    key: &str,
) -> Result<T, HandlerErr> {
    let raw = params
        .get(key)
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| HandlerErr::new("bad_params", format!("invalid {}: {}", key, e)))
}

fn seating_section(plans: &[SeatingSessionRecord]) -> Result<serde_json::Value, HandlerErr> {
    let rooms = consolidate::distinct_rooms(plans.iter().map(|p| p.room_name.as_str()));
    let artifacts = consolidate::consolidate_seating(plans);
    Ok(json!({
        "rooms": rooms,
        "artifacts": to_json(&artifacts)?,
    }))
}

fn attendance_section(sheets: &[RoomAttendanceSheet]) -> Result<serde_json::Value, HandlerErr> {
    let rooms = consolidate::distinct_rooms(sheets.iter().map(|s| s.room_name.as_str()));
    let records = engine::split_by_year(sheets);
    let artifacts = consolidate::consolidate_attendance(&records);
    Ok(json!({
        "rooms": rooms,
        "artifacts": to_json(&artifacts)?,
    }))
}

/// Unpacks a full engine result: consolidates the seating and room-attendance
/// sections and passes every other field through untouched.
fn results_open(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let result: EngineResult = parse_field(params, "result")?;
    Ok(json!({
        "master_timetable": result.master_timetable,
        "attendance_data": result.attendance_data,
        "exam_dates_map": result.exam_dates_map,
        "seating": seating_section(&result.seating_plans)?,
        "room_attendance": attendance_section(&result.room_attendance_data)?,
    }))
}

fn results_consolidate_seating(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let plans: Vec<SeatingSessionRecord> = parse_field(params, "seatingPlans")?;
    seating_section(&plans)
}

fn results_consolidate_attendance(
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let sheets: Vec<RoomAttendanceSheet> = parse_field(params, "roomAttendanceData")?;
    attendance_section(&sheets)
}

fn respond(result: Result<serde_json::Value, HandlerErr>, id: &str) -> serde_json::Value {
    match result {
        Ok(value) => ok(id, value),
        Err(error) => error.response(id),
    }
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "results.open" => Some(respond(results_open(&req.params), &req.id)),
        "results.consolidateSeating" => {
            Some(respond(results_consolidate_seating(&req.params), &req.id))
        }
        "results.consolidateAttendance" => {
            Some(respond(results_consolidate_attendance(&req.params), &req.id))
        }
        _ => None,
    }
}
