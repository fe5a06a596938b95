pub mod attempt;
pub mod question;
pub mod session;

pub use attempt::Attempt;
pub use question::Question;
pub use session::{Answer, Session, SessionState};
