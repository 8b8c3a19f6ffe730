mod chat_model;
mod chat_session;
mod conversation;
mod error_detail;
mod message;

pub use chat_model::*;
pub use chat_session::*;
pub use conversation::*;
pub use error_detail::*;
pub use message::*;
