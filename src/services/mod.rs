pub mod conversation_service;
pub mod messenger;
pub mod scorer;
pub mod selector;

pub use conversation_service::ConversationService;
pub use messenger::{HttpMessenger, Messenger};
