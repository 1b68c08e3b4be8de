//! Play command - start playback of a track or playlist URI.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the play command.
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Track or playlist URI, e.g. spotify:track:... or spotify:playlist:...
    pub uri: String,

    /// Target device id (defaults to the provider's active device)
    #[arg(short, long)]
    pub device: Option<String>,
}

/// Run the play command.
pub async fn run(args: PlayArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    client
        .player()
        .play(&args.uri, args.device.as_deref())
        .await?;
    println!("Playing {}", args.uri);
    Ok(())
}
