//! Status command - authentication status.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Also probe the provider to verify the token is accepted
    #[arg(long)]
    pub probe: bool,
}

/// Run the status command.
pub async fn run(args: StatusArgs, ctx: &Context) -> Result<()> {
    let flow = ctx.auth_flow();
    let guard = ctx.session_guard();

    let status = guard.status().await;
    let tokens = flow.store().tokens().await?;

    let probe_result = if args.probe {
        Some(guard.check_auth().await)
    } else {
        None
    };

    if ctx.json_output {
        let expires = tokens.as_ref().map(expires_in_secs);
        println!(
            "{}",
            serde_json::json!({
                "status": status.to_string(),
                "has_refresh_token": tokens.as_ref().is_some_and(|t| t.refresh_token.is_some()),
                "expires_in_secs": expires,
                "probe_ok": probe_result,
            })
        );
        return Ok(());
    }

    println!("Authentication Status");
    println!("---------------------");
    println!("Session: {status}");

    if let Some(tokens) = &tokens {
        println!("  Expires: {}", expires_display(tokens.expires_at));
        println!(
            "  Refresh token: {}",
            if tokens.refresh_token.is_some() {
                "stored"
            } else {
                "none (implicit grant)"
            }
        );
    } else {
        println!("  Run 'muse login' to authenticate.");
    }

    if let Some(ok) = probe_result {
        println!(
            "  Provider probe: {}",
            if ok { "accepted" } else { "rejected" }
        );
    }

    Ok(())
}

fn expires_in_secs(tokens: &muse_auth::TokenBundle) -> u64 {
    let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
    tokens.expires_at.saturating_sub(now) / 1000
}

fn expires_display(expires_at: u64) -> String {
    let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
    if expires_at <= now {
        return "expired (refresh due on next use)".to_string();
    }
    let secs = (expires_at - now) / 1000;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{hours}h {minutes}m")
}
