use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{Room, DEFAULT_DOOR, DEFAULT_SEATING_PATTERN};
use crate::sequence;
use serde_json::json;
use uuid::Uuid;

const ROOMS_INIT_MAX: u64 = 200;

fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))
}

fn find_room_index(rooms: &[Room], room_id: &str) -> Result<usize, HandlerErr> {
    rooms
        .iter()
        .position(|r| r.id == room_id)
        .ok_or_else(|| HandlerErr::new("not_found", "room not found"))
}

fn rooms_json(rooms: &[Room]) -> Result<serde_json::Value, HandlerErr> {
    serde_json::to_value(rooms)
        .map_err(|e| HandlerErr::new("serialize_failed", e.to_string()))
}

fn rooms_init(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let count = params
        .get("count")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| HandlerErr::new("bad_params", "missing count"))?;
    if count == 0 || count > ROOMS_INIT_MAX {
        return Err(HandlerErr::new(
            "bad_params",
            format!("count must be between 1 and {}", ROOMS_INIT_MAX),
        ));
    }

    // Fresh list, labelled N101 upward like the front end's default tiles.
    state.rooms = (1..=count)
        .map(|i| Room {
            id: Uuid::new_v4().to_string(),
            label: format!("N{}", 100 + i),
            rows: None,
            cols: None,
            door: DEFAULT_DOOR.to_string(),
            seating_pattern: DEFAULT_SEATING_PATTERN.to_string(),
        })
        .collect();
    Ok(json!({ "rooms": rooms_json(&state.rooms)? }))
}

fn rooms_list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({ "rooms": rooms_json(&state.rooms)? }))
}

fn apply_patch(room: &mut Room, patch: &serde_json::Value) -> Result<(), HandlerErr> {
    let Some(obj) = patch.as_object() else {
        return Err(HandlerErr::new("bad_params", "patch must be an object"));
    };
    for (key, value) in obj {
        match key.as_str() {
            "label" => {
                let Some(s) = value.as_str() else {
                    return Err(HandlerErr::new("bad_params", "label must be a string"));
                };
                room.label = s.trim().to_string();
            }
            "rows" | "cols" => {
                let parsed = if value.is_null() {
                    None
                } else {
                    let n = value
                        .as_u64()
                        .filter(|&n| n >= 1 && n <= u32::MAX as u64)
                        .ok_or_else(|| {
                            HandlerErr::new("bad_params", format!("{} must be a positive integer", key))
                        })?;
                    Some(n as u32)
                };
                if key == "rows" {
                    room.rows = parsed;
                } else {
                    room.cols = parsed;
                }
            }
            "door" => {
                let Some(s) = value.as_str() else {
                    return Err(HandlerErr::new("bad_params", "door must be a string"));
                };
                room.door = s.to_string();
            }
            "seatingPattern" => {
                let Some(s) = value.as_str() else {
                    return Err(HandlerErr::new("bad_params", "seatingPattern must be a string"));
                };
                room.seating_pattern = s.to_string();
            }
            other => {
                return Err(HandlerErr::new(
                    "bad_params",
                    format!("unknown patch field: {}", other),
                ));
            }
        }
    }
    Ok(())
}

fn rooms_update(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let room_id = get_required_str(params, "roomId")?;
    let index = find_room_index(&state.rooms, &room_id)?;
    let patch = params
        .get("patch")
        .ok_or_else(|| HandlerErr::new("bad_params", "missing patch"))?;
    apply_patch(&mut state.rooms[index], patch)?;
    Ok(json!({ "rooms": rooms_json(&state.rooms)? }))
}

/// Sets one room's label, then cascades the numbered sequence onto every room
/// after it. An unparseable label updates only the edited room.
fn rooms_rename(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let room_id = get_required_str(params, "roomId")?;
    let label = get_required_str(params, "label")?;
    let index = find_room_index(&state.rooms, &room_id)?;

    state.rooms[index].label = label.trim().to_string();
    let cascaded = sequence::cascade_labels(&mut state.rooms, index, &label);

    Ok(json!({
        "cascaded": cascaded,
        "rooms": rooms_json(&state.rooms)?
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
        "rooms.init" => Some(respond(rooms_init(state, &req.params), &req.id)),
        "rooms.list" => Some(respond(rooms_list(state), &req.id)),
        "rooms.update" => Some(respond(rooms_update(state, &req.params), &req.id)),
        "rooms.rename" => Some(respond(rooms_rename(state, &req.params), &req.id)),
        _ => None,
    }
}
