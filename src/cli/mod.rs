use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub mod chat;
pub mod history;

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat session
    Chat {},
    /// Print the saved conversation history for a user
    History {
        #[arg(long)]
        username: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Handle each sub command
    match args.command {
        Some(Command::Chat {}) | None => {
            chat::run().await?;
        }
        Some(Command::History { username }) => {
            history::run(&username)?;
        }
    }

    Ok(())
}
