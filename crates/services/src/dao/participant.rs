use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use lingoroom_db::models::Participant;

use super::base::{BaseDao, DaoResult};

pub struct ParticipantDao {
    pub base: BaseDao<Participant>,
}

impl ParticipantDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Participant::COLLECTION),
        }
    }

    /// Records a join. One record per `(room, identity)`: a re-join
    /// refreshes the existing record instead of inserting a duplicate.
    pub async fn join(
        &self,
        room_id: ObjectId,
        identity: String,
        display_name: String,
        language: Option<String>,
    ) -> DaoResult<Participant> {
        let filter = doc! { "room_id": room_id, "identity": identity.as_str() };

        if let Some(existing) = self.base.find_one(filter.clone()).await? {
            self.base
                .update_one(
                    filter.clone(),
                    doc! {
                        "$set": {
                            "display_name": display_name.clone(),
                            "language": language.clone(),
                            "joined_at": DateTime::now(),
                            "left_at": bson::Bson::Null,
                        }
                    },
                )
                .await?;
            return self
                .base
                .find_by_id(existing.id.ok_or(super::base::DaoError::NotFound)?)
                .await;
        }

        let now = DateTime::now();
        let participant = Participant {
            id: None,
            room_id,
            identity,
            display_name,
            language,
            joined_at: now,
            left_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&participant).await?;
        self.base.find_by_id(id).await
    }

    pub async fn mark_left(&self, room_id: ObjectId, identity: &str) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "room_id": room_id, "identity": identity },
                doc! { "$set": { "left_at": DateTime::now() } },
            )
            .await
    }

    pub async fn list_by_room(&self, room_id: ObjectId) -> DaoResult<Vec<Participant>> {
        self.base
            .find_many(
                doc! { "room_id": room_id },
                Some(doc! { "joined_at": 1 }),
            )
            .await
    }

    pub async fn count_present(&self, room_id: ObjectId) -> DaoResult<u64> {
        self.base
            .count(doc! { "room_id": room_id, "left_at": bson::Bson::Null })
            .await
    }
}
