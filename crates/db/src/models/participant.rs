use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub room_id: ObjectId,
    /// Stable identity across joins (one record per identity per room).
    pub identity: String,
    pub display_name: String,
    /// Preferred caption language, BCP 47 (e.g. "kn-IN").
    pub language: Option<String>,
    pub joined_at: DateTime,
    pub left_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Participant {
    pub const COLLECTION: &'static str = "participants";
}
