use anyhow::{bail, Result};
use tokio::io::BufReader;

use crate::Commands;

use super::container::Container;
use super::controller::{ChatController, ModelsController};

pub struct Router<'a> {
    chat_controller: ChatController<'a>,
    models_controller: ModelsController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_controller: ChatController::new(container),
            models_controller: ModelsController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat { model } => {
                self.chat_controller
                    .repl(model, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                    .await
            }
            Commands::Ask { message, model } => self.chat_controller.ask(message, model).await,
            Commands::Models => Ok(self.models_controller.list()),
            Commands::Serve { .. } => bail!("serve is started from main, not routed"),
        }
    }
}
