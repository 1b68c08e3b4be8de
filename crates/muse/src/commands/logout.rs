//! Logout command - clear stored credentials.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the logout command.
#[derive(Args, Debug)]
pub struct LogoutArgs {}

/// Run the logout command. Safe to run repeatedly.
pub async fn run(_args: LogoutArgs, ctx: &Context) -> Result<()> {
    let flow = ctx.auth_flow();
    let had_tokens = flow.store().tokens().await?.is_some();

    flow.logout().await?;

    if had_tokens {
        println!("Stored credentials removed.");
    } else {
        println!("No stored credentials found.");
    }
    Ok(())
}
