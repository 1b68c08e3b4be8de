//! Login command - runs the OAuth flow end to end.

use anyhow::Result;
use clap::Args;
use muse_auth::{CallbackListener, CallbackParams, FlowMode, SessionStatus};

use super::Context;

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Paste the redirect URL manually instead of running the local
    /// callback listener
    #[arg(long)]
    pub paste: bool,
}

/// Run the login command.
pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    let flow = ctx.auth_flow();
    let guard = ctx.session_guard();

    if guard.status().await == SessionStatus::Valid {
        println!("Already authenticated.");
        println!("Run 'muse logout' first to re-authenticate.");
        return Ok(());
    }

    let mode = ctx.config.provider.flow;

    // The implicit grant returns its response in the URL fragment,
    // which never reaches a local listener.
    let use_listener = !args.paste && mode == FlowMode::AuthorizationCode;

    // Bind before the redirect so the provider has something to hit.
    let listener = if use_listener {
        Some(CallbackListener::bind(&ctx.config.provider.redirect_uri).await?)
    } else {
        None
    };

    let auth_url = flow.begin_login().await?;

    println!("Open this URL in your browser to sign in:");
    println!();
    println!("  {auth_url}");
    println!();

    if open_url(&auth_url).is_err() {
        println!("(Could not open the browser automatically)");
        println!();
    }

    let params = match listener {
        Some(listener) => {
            println!(
                "Waiting for the provider redirect on {} ...",
                ctx.config.provider.redirect_uri
            );
            listener.wait().await?
        }
        None => {
            println!("After signing in, paste the full redirect URL here:");
            print!("redirect URL> ");
            use std::io::Write;
            std::io::stdout().flush()?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            let input = input.trim();
            if input.is_empty() {
                anyhow::bail!("no input provided, aborting");
            }
            CallbackParams::parse_redirect_url(input, mode)?
        }
    };

    flow.handle_callback(&params).await?;

    println!();
    println!("Authentication successful.");
    if mode == FlowMode::Implicit {
        println!("Note: the implicit grant cannot issue refresh tokens;");
        println!("you will need to sign in again when the session expires.");
    }

    Ok(())
}

/// Try to open a URL in the default browser.
fn open_url(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).status()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).status()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .status()?;
    }
    Ok(())
}
