use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// One finalized utterance recorded for end-of-call summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub room_id: ObjectId,
    pub identity: String,
    pub speaker_name: String,
    pub text: String,
    /// Source language as reported by the speaker's client, if known.
    pub language: Option<String>,
    pub created_at: DateTime,
}

impl TranscriptEntry {
    pub const COLLECTION: &'static str = "transcript_entries";
}
