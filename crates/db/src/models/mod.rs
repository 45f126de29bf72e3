pub mod participant;
pub mod room;
pub mod transcript_entry;

pub use participant::Participant;
pub use room::{Room, RoomStatus};
pub use transcript_entry::TranscriptEntry;
