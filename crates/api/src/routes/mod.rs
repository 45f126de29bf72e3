pub mod messaging;
pub mod room;
pub mod transcript;
