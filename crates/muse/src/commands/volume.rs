//! Volume command - show or set the persisted playback volume.

use anyhow::Result;
use clap::Args;
use muse_player::PlayerPrefs;

use super::Context;

/// Arguments for the volume command.
#[derive(Args, Debug)]
pub struct VolumeArgs {
    /// New volume in the 0.0–1.0 range; omit to show the current value
    pub level: Option<f32>,
}

/// Run the volume command.
pub async fn run(args: VolumeArgs, ctx: &Context) -> Result<()> {
    match args.level {
        Some(level) => {
            if !(0.0..=1.0).contains(&level) {
                anyhow::bail!("volume must be between 0.0 and 1.0");
            }
            PlayerPrefs { volume: level }.save(&ctx.data_dir)?;
            println!("Playback volume set to {level}");
        }
        None => {
            let prefs = PlayerPrefs::load(&ctx.data_dir);
            println!("Playback volume: {}", prefs.clamped_volume());
        }
    }
    Ok(())
}
