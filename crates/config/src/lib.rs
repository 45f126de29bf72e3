pub mod settings;

pub use settings::{
    AppSettings, CaptionSettings, DatabaseSettings, MediaSettings, MessagingSettings, Settings,
    SummarizerSettings, TranslationSettings,
};
