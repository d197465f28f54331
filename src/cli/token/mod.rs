//! Token command - prints a freshly signed token

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::auth::{JwtService, TokenService};

#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Subject identifier stored in the `user_id` claim
    pub user_id: u32,

    /// Role stored in the `role` claim
    pub role: String,
}

pub fn run(config: &AppConfig, args: TokenArgs) -> anyhow::Result<()> {
    let service = JwtService::new(config.auth.jwt_config()?);
    let token = service.generate_token(args.user_id, &args.role)?;

    info!(
        user_id = args.user_id,
        role = %args.role,
        expires_in_minutes = service.expiration_minutes(),
        "Issued token"
    );

    println!("{}", token);
    Ok(())
}
