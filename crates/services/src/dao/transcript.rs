use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use lingoroom_db::models::TranscriptEntry;

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct TranscriptDao {
    pub base: BaseDao<TranscriptEntry>,
}

impl TranscriptDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, TranscriptEntry::COLLECTION),
        }
    }

    pub async fn append(
        &self,
        room_id: ObjectId,
        identity: String,
        speaker_name: String,
        text: String,
        language: Option<String>,
    ) -> DaoResult<TranscriptEntry> {
        let entry = TranscriptEntry {
            id: None,
            room_id,
            identity,
            speaker_name,
            text,
            language,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&entry).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list_by_room(
        &self,
        room_id: ObjectId,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<TranscriptEntry>> {
        self.base
            .find_paginated(
                doc! { "room_id": room_id },
                // _id tie-break keeps same-millisecond entries in insert order
                Some(doc! { "created_at": 1, "_id": 1 }),
                params,
            )
            .await
    }

    /// The full transcript in spoken order, for summarization.
    pub async fn all_by_room(&self, room_id: ObjectId) -> DaoResult<Vec<TranscriptEntry>> {
        self.base
            .find_many(
                doc! { "room_id": room_id },
                Some(doc! { "created_at": 1, "_id": 1 }),
            )
            .await
    }
}
