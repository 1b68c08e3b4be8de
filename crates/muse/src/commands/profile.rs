//! Profile command - show the signed-in user's profile.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the profile command.
#[derive(Args, Debug)]
pub struct ProfileArgs {}

/// Run the profile command.
pub async fn run(_args: ProfileArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let profile = client.profile().me().await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!(
        "Signed in as {}",
        profile.display_name.as_deref().unwrap_or(&profile.id)
    );
    println!("  Id: {}", profile.id);
    if let Some(email) = &profile.email {
        println!("  Email: {email}");
    }
    if let Some(product) = &profile.product {
        println!("  Plan: {product}");
    }
    Ok(())
}
