use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::{SendOutcome, CLEARED_NOTICE};
use crate::domain::{ChatModel, Conversation};

use super::super::Container;
use super::ModelsController;

const HELP: &str = "Commands: /clear, /model <id>, /models, /help, /quit";

enum ReplCommand<'a> {
    Quit,
    Clear,
    Models,
    Help,
    Model(&'a str),
    Unknown(&'a str),
    Message(&'a str),
}

fn parse_command(line: &str) -> ReplCommand<'_> {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return ReplCommand::Message(line);
    }
    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (trimmed, ""),
    };
    match name {
        "/quit" | "/exit" => ReplCommand::Quit,
        "/clear" => ReplCommand::Clear,
        "/models" => ReplCommand::Models,
        "/help" => ReplCommand::Help,
        "/model" => ReplCommand::Model(arg),
        other => ReplCommand::Unknown(other),
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}

/// Terminal front-end over the same use cases the web UI drives.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    fn resolve_model(&self, model: Option<String>) -> Result<ChatModel> {
        match model {
            Some(name) => Ok(name.parse::<ChatModel>()?),
            None => Ok(self.container.default_model()),
        }
    }

    /// Send one message in a fresh conversation and return the reply.
    pub async fn ask(&self, message: String, model: Option<String>) -> Result<String> {
        let model = self.resolve_model(model)?;
        let mut conversation = Conversation::new();

        match self
            .container
            .send_message_use_case()
            .execute(&mut conversation, model, &message)
            .await?
        {
            SendOutcome::Replied(reply) => Ok(reply),
            SendOutcome::Failed(detail) => Err(anyhow!(detail.transcript_text())),
        }
    }

    /// Read lines from `reader` until EOF or `/quit`, answering each one.
    pub async fn repl<R, W>(&self, model: Option<String>, reader: R, mut writer: W) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let model = self.resolve_model(model)?;
        let send_use_case = self.container.send_message_use_case();
        let clear_use_case = self.container.clear_conversation_use_case();

        let (handle, _) = self.container.open_session_use_case().execute(None).await?;
        let mut session = handle.lock().await;
        session.select_model(model);
        let session_id = session.id().to_string();

        write_line(
            &mut writer,
            &format!("{} ({}). {}", session.title(), session.model(), HELP),
        )
        .await?;
        if let Some(warning) = self.container.credential_warning() {
            write_line(&mut writer, &format!("Warning: {warning}")).await?;
        }
        writer.flush().await?;

        let mut exchanges = 0usize;
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            match parse_command(&line) {
                ReplCommand::Quit => break,
                ReplCommand::Clear => {
                    clear_use_case.execute(session.conversation_mut());
                    write_line(&mut writer, CLEARED_NOTICE).await?;
                }
                ReplCommand::Models => {
                    let listing = ModelsController::new(self.container).list();
                    writer.write_all(listing.as_bytes()).await?;
                }
                ReplCommand::Help => write_line(&mut writer, HELP).await?,
                ReplCommand::Model(name) => match name.parse::<ChatModel>() {
                    Ok(model) => {
                        session.select_model(model);
                        write_line(&mut writer, &format!("Switched to {model}")).await?;
                    }
                    Err(e) => write_line(&mut writer, &e.to_string()).await?,
                },
                ReplCommand::Unknown(name) => {
                    write_line(&mut writer, &format!("Unknown command {name}. {HELP}")).await?
                }
                ReplCommand::Message(text) => {
                    let model = session.model();
                    match send_use_case
                        .execute(session.conversation_mut(), model, text)
                        .await
                    {
                        Ok(outcome) => {
                            exchanges += 1;
                            write_line(
                                &mut writer,
                                &format!("Assistant: {}", outcome.transcript_text()),
                            )
                            .await?;
                        }
                        Err(e) if e.is_invalid_input() => {
                            write_line(&mut writer, "Warning: Please enter a message.").await?
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
            writer.flush().await?;
        }

        drop(session);
        self.container
            .session_repository()
            .delete(&session_id)
            .await?;
        Ok(format!("Session ended after {} exchanges.", exchanges))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::connector::api::ContainerConfig;
    use crate::connector::MockChatClient;
    use crate::domain::DomainError;

    fn container_with(client: Arc<MockChatClient>) -> Container {
        Container::with_chat_client(ContainerConfig::default(), client)
    }

    #[tokio::test]
    async fn repl_answers_switches_models_and_clears() {
        let client = Arc::new(MockChatClient::new());
        let container = container_with(client.clone());
        let controller = ChatController::new(&container);

        let input: &[u8] = b"hi\n\n/model gemma-7b\nagain\n/clear\n/quit\nnever sent\n";
        let mut output = Vec::new();
        let summary = controller.repl(None, input, &mut output).await.unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.starts_with("Groq AI Chatbot (llama3-8b-8192)"));
        assert!(output.contains("Assistant: You said: hi"));
        assert!(output.contains("Warning: Please enter a message."));
        assert!(output.contains("Switched to gemma-7b"));
        assert!(output.contains("Assistant: You said: again"));
        assert!(output.contains(CLEARED_NOTICE));
        assert_eq!(summary, "Session ended after 2 exchanges.");
        assert_eq!(client.call_count(), 2);
        assert_eq!(client.last_model(), Some(ChatModel::Gemma7b));
    }

    #[tokio::test]
    async fn repl_removes_its_session_on_exit() {
        let container = container_with(Arc::new(MockChatClient::new()));
        let controller = ChatController::new(&container);
        let sessions = container.session_repository();

        let input: &[u8] = b"hi\n/quit\n";
        controller.repl(None, input, Vec::<u8>::new()).await.unwrap();
        assert_eq!(sessions.count().await.unwrap(), 0);

        let input: &[u8] = b"hi\n";
        controller.repl(None, input, Vec::<u8>::new()).await.unwrap();
        assert_eq!(sessions.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn repl_rejects_unknown_model_flag() {
        let container = container_with(Arc::new(MockChatClient::new()));
        let controller = ChatController::new(&container);
        let input: &[u8] = b"";

        let result = controller
            .repl(Some("gpt-4".to_string()), input, Vec::<u8>::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn ask_surfaces_api_failures_as_errors() {
        let client = Arc::new(MockChatClient::failing(DomainError::api(
            503,
            "over capacity",
        )));
        let container = container_with(client);
        let controller = ChatController::new(&container);

        let err = controller
            .ask("hi".to_string(), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error: 503, over capacity");
    }

    #[tokio::test]
    async fn ask_returns_reply() {
        let container = container_with(Arc::new(MockChatClient::with_reply("hello")));
        let controller = ChatController::new(&container);

        let reply = controller
            .ask("hi".to_string(), Some("mixtral-8x7b".to_string()))
            .await
            .unwrap();
        assert_eq!(reply, "hello");
    }
}
