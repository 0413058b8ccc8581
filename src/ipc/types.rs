use serde::Deserialize;

use crate::model::Room;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Session state. Only the ordered room list is held between requests;
/// validation and consolidation are stateless over their params.
#[derive(Default)]
pub struct AppState {
    pub rooms: Vec<Room>,
}
