//! # Connector Layer
//!
//! External integrations and front-ends:
//! - Inference client (Groq chat completions over HTTP, plus an offline mock)
//! - Session storage (in-memory)
//! - Terminal controllers and the axum web UI

pub mod adapter;
pub mod api;
pub mod web;

pub use adapter::*;
