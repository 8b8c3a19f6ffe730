pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    ChatClient, ClearConversationUseCase, OpenSessionUseCase, SendMessageUseCase, SendOutcome,
    SessionHandle, SessionRepository,
};

pub use connector::api::{Container, ContainerConfig, Router};
pub use connector::{GroqClient, InMemorySessionRepository, MockChatClient};

pub use domain::{
    ChatModel, ChatSession, Conversation, DomainError, ErrorDetail, Message, Role, PERSONA_PROMPT,
};
