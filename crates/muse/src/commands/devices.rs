//! Devices command - list available playback devices.

use anyhow::Result;
use clap::Args;
use console::style;

use super::Context;

/// Arguments for the devices command.
#[derive(Args, Debug)]
pub struct DevicesArgs {}

/// Run the devices command.
pub async fn run(_args: DevicesArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let devices = client.player().devices().await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No playback devices available.");
        println!("Open the provider's app on a device to make it visible.");
        return Ok(());
    }

    for device in devices {
        let marker = if device.is_active { "*" } else { " " };
        let id = device.id.as_deref().unwrap_or("<unaddressable>");
        let volume = device
            .volume_percent
            .map(|v| format!("{v}%"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{marker} {} [{}]  id={}  volume={volume}",
            style(&device.name).bold(),
            device.kind,
            id
        );
    }
    Ok(())
}
