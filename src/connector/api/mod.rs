pub mod container;
pub mod controller;
pub mod router;

pub use container::{Container, ContainerConfig, DEFAULT_APP_NAME, PLACEHOLDER_API_KEY};
pub use router::Router;
