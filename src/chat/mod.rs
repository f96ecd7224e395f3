pub mod models;
pub mod normalize;
pub mod session;
pub mod store;

pub use models::{ChatMessage, Role, Transcript};
pub use normalize::extract_message_text;
pub use session::ChatSession;
pub use store::TranscriptStore;
