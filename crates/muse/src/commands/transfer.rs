//! Transfer command - move playback to another device.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the transfer command.
#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Target device id (see 'muse devices')
    pub device_id: String,

    /// Transfer without starting playback
    #[arg(long)]
    pub paused: bool,
}

/// Run the transfer command.
pub async fn run(args: TransferArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    client
        .player()
        .transfer(&args.device_id, !args.paused)
        .await?;
    println!("Playback transferred to {}", args.device_id);
    Ok(())
}
