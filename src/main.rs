use anyhow::Result;
use tony::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
