use crate::engine;
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::ScheduleConfig;
use crate::validate;
use serde_json::json;

fn parse_config(params: &serde_json::Value) -> Result<ScheduleConfig, HandlerErr> {
    let raw = params
        .get("config")
        .ok_or_else(|| HandlerErr::new("bad_params", "missing config"))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| HandlerErr::new("bad_params", format!("invalid config: {}", e)))
}

/// Runs validation and maps the violation list into the error envelope. The
/// first violation drives UI focus; all of them are returned.
fn check(config: &ScheduleConfig) -> Result<(), HandlerErr> {
    validate::validate(config).map_err(|violations| {
        let details = serde_json::to_value(&violations).unwrap_or_default();
        HandlerErr::with_details(
            "invalid_schedule",
            "schedule failed validation",
            json!({ "violations": details }),
        )
    })
}

fn schedule_validate(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let config = parse_config(params)?;
    check(&config)?;
    // Echo the config back unchanged; validation never normalizes.
    let config_json = serde_json::to_value(&config)
        .map_err(|e| HandlerErr::new("serialize_failed", e.to_string()))?;
    Ok(json!({ "valid": true, "config": config_json }))
}

/// Builds the allocation engine's submission payload. Fails closed: nothing
/// is produced unless the schedule validates and every room is configured.
fn schedule_build_payload(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let config = parse_config(params)?;
    check(&config)?;

    let room_config = engine::room_payload(&state.rooms).map_err(|incomplete| {
        HandlerErr::with_details(
            "room_incomplete",
            format!("room \"{}\" is missing rows, cols, or a seating pattern", incomplete.label),
            json!({ "roomIndex": incomplete.index, "label": incomplete.label }),
        )
    })?;
    if room_config.is_empty() {
        return Err(HandlerErr::new("no_rooms", "no rooms configured"));
    }

    let schedule_config = engine::schedule_payload(&config);
    Ok(json!({
        "schedule_config": serde_json::to_value(&schedule_config)
            .map_err(|e| HandlerErr::new("serialize_failed", e.to_string()))?,
        "room_config": serde_json::to_value(&room_config)
            .map_err(|e| HandlerErr::new("serialize_failed", e.to_string()))?,
    }))
}

fn respond(result: Result<serde_json::Value, HandlerErr>, id: &str) -> serde_json::Value {
    match result {
        Ok(value) => ok(id, value),
        Err(error) => error.response(id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "schedule.validate" => Some(respond(schedule_validate(&req.params), &req.id)),
        "schedule.buildPayload" => Some(respond(schedule_build_payload(state, &req.params), &req.id)),
        _ => None,
    }
}
