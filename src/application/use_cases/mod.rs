mod clear_conversation;
mod open_session;
mod send_message;

pub use clear_conversation::*;
pub use open_session::*;
pub use send_message::*;
