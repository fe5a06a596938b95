pub mod webhook_handler;

pub use webhook_handler::{health_check, inbound_message};
