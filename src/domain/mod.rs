//! # Domain Layer
//!
//! Chat turns, conversation history, model selection and the error taxonomy.
//! This layer is independent of HTTP clients, web frameworks and terminals.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
