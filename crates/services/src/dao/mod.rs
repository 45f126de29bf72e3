pub mod base;
pub mod participant;
pub mod room;
pub mod transcript;

pub use base::BaseDao;
pub use participant::ParticipantDao;
pub use room::RoomDao;
pub use transcript::TranscriptDao;
