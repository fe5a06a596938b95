pub mod attempt_repository;
pub mod question_repository;
pub mod session_store;

pub use attempt_repository::{AttemptRecorder, LogAttemptRecorder, MongoAttemptRecorder};
pub use question_repository::{HttpQuestionRepository, QuestionRepository};
pub use session_store::{InMemorySessionStore, MongoSessionStore, SessionStore};
