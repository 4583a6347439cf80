//! Create-user command - provisions a login account

use clap::Args;
use tracing::{info, warn};

use crate::infrastructure::user::CreateUserRequest;

#[derive(Debug, Args)]
pub struct CreateUserArgs {
    /// Login name (3-150 chars: letters, digits and @.+-_)
    #[arg(long)]
    pub username: String,

    /// Password (8-128 chars)
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: CreateUserArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    if config.storage.backend.eq_ignore_ascii_case("in_memory") {
        warn!("In-memory storage selected; the user will not outlive this command");
    }

    let storage = crate::create_storage(&config).await?;
    let users = crate::create_user_service(&storage);

    let user = users
        .create(CreateUserRequest::new(args.username, args.password))
        .await?;

    info!(user_id = user.id(), username = %user.username(), "User created");
    Ok(())
}
