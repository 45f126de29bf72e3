pub mod dao;
pub mod media;
pub mod messaging;
pub mod summarizer;

pub use dao::*;
pub use media::{MediaError, MediaService};
pub use messaging::MessagingService;
pub use summarizer::SummarizerService;
