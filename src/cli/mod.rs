use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the chat page and JSON API over HTTP
    Serve {
        #[arg(long, default_value = "8501")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Interactive chat in the terminal
    Chat {
        /// Model to start with (defaults to MODEL_NAME / llama3-8b-8192)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Send a single message and print the reply
    Ask {
        message: String,

        #[arg(short, long)]
        model: Option<String>,
    },

    /// List the models offered in the selector
    Models,
}
