pub mod messages;

/// Ordered section names for one placement run. Exactly one question is asked
/// per section, in this order.
pub const SECTIONS: [&str; 5] = ["Grammar", "Vocabulary", "Reading", "Listening", "Logic"];

/// Case-insensitive commands that begin a new run from the idle state.
pub const START_COMMANDS: [&str; 3] = ["start", "test", "begin"];
