use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub meeting_code: String,
    /// Identity of the participant that created the room.
    pub owner_identity: String,
    #[serde(default)]
    pub status: RoomStatus,
    /// End-of-call transcript summary, set when the room is ended.
    pub summary: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub ended_at: Option<DateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[default]
    Open,
    Ended,
}

impl Room {
    pub const COLLECTION: &'static str = "rooms";
}
