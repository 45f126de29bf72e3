use mongodb::Database;
use lingoroom_config::Settings;
use lingoroom_services::{
    MediaService, MessagingService, SummarizerService,
    dao::{participant::ParticipantDao, room::RoomDao, transcript::TranscriptDao},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub rooms: Arc<RoomDao>,
    pub participants: Arc<ParticipantDao>,
    pub transcripts: Arc<TranscriptDao>,
    pub media: Arc<MediaService>,
    pub messaging: Arc<MessagingService>,
    pub summarizer: SummarizerService,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let rooms = Arc::new(RoomDao::new(&db));
        let participants = Arc::new(ParticipantDao::new(&db));
        let transcripts = Arc::new(TranscriptDao::new(&db));
        let media = Arc::new(MediaService::new(settings.media.clone()));
        let messaging = Arc::new(MessagingService::new(settings.messaging.clone()));
        let summarizer = SummarizerService::new(
            settings.summarizer.api_key.clone(),
            settings.summarizer.model.clone(),
            settings.summarizer.max_tokens,
        );

        Self {
            db,
            settings,
            rooms,
            participants,
            transcripts,
            media,
            messaging,
            summarizer,
        }
    }
}
