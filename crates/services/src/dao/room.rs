use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use lingoroom_db::models::{Room, RoomStatus};
use rand::Rng;

use super::base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};

pub struct RoomDao {
    pub base: BaseDao<Room>,
}

impl RoomDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Room::COLLECTION),
        }
    }

    pub async fn create(&self, name: String, owner_identity: String) -> DaoResult<Room> {
        let now = DateTime::now();
        let room = Room {
            id: None,
            name,
            meeting_code: generate_meeting_code(),
            owner_identity,
            status: RoomStatus::Open,
            summary: None,
            created_at: now,
            updated_at: now,
            ended_at: None,
        };

        let id = self.base.insert_one(&room).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_name(&self, name: &str) -> DaoResult<Room> {
        self.base
            .find_one(doc! { "name": name })
            .await?
            .ok_or(DaoError::NotFound)
    }

    /// Finds the room, creating it when absent. A concurrent create racing
    /// on the unique name index resolves to the existing room.
    pub async fn find_or_create(&self, name: &str, owner_identity: &str) -> DaoResult<Room> {
        match self.find_by_name(name).await {
            Ok(room) => Ok(room),
            Err(DaoError::NotFound) => {
                match self.create(name.to_string(), owner_identity.to_string()).await {
                    Ok(room) => Ok(room),
                    Err(DaoError::DuplicateKey(_)) => self.find_by_name(name).await,
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    pub async fn list_open(
        &self,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Room>> {
        self.base
            .find_paginated(
                doc! { "status": "open" },
                Some(doc! { "created_at": -1 }),
                params,
            )
            .await
    }

    /// Ends the room, storing the end-of-call summary when one was
    /// produced.
    pub async fn end(&self, id: ObjectId, summary: Option<String>) -> DaoResult<bool> {
        self.base
            .update_by_id(
                id,
                doc! {
                    "$set": {
                        "status": "ended",
                        "summary": summary,
                        "ended_at": DateTime::now(),
                    }
                },
            )
            .await
    }
}

fn generate_meeting_code() -> String {
    let mut rng = rand::rng();
    let parts: Vec<String> = (0..3)
        .map(|_| {
            let n: u32 = rng.random_range(100..999);
            n.to_string()
        })
        .collect();
    parts.join("-")
}
