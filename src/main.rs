use clap::Parser;
use workforce_api::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve::run().await,
        Command::Migrate => cli::migrate::run().await,
        Command::CreateUser(args) => cli::user::run(args).await,
    }
}
