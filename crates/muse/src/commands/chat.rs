//! Chat command - interactive assistant REPL.

use anyhow::Result;
use clap::Args;
use console::style;
use muse_assistant::Action;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::Context;

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Target device id for playback (defaults to the active device)
    #[arg(short, long)]
    pub device: Option<String>,
}

/// Run the chat command (REPL).
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let guard = ctx.session_guard();
    if !guard.check_auth().await {
        println!("Not authenticated. Run 'muse login' first.");
        return Ok(());
    }

    let client = ctx.client()?;

    println!(
        "{}",
        style("Hello! I'm your music assistant. What would you like to listen to today?").cyan()
    );
    println!("{}", style("(type 'exit' or press Ctrl-D to quit)").dim());

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }
                let _ = editor.add_history_entry(line);

                let reply = muse_assistant::respond(line);
                println!("{} {}", style("muse>").cyan(), reply.message);

                if let Action::Play { uri } = reply.action {
                    if let Err(e) = client.player().play(&uri, args.device.as_deref()).await {
                        tracing::debug!("playback request failed: {e}");
                        println!(
                            "{} I had trouble playing that. Make sure a playback device \
                             is active and try again.",
                            style("muse>").cyan()
                        );
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye!");
    Ok(())
}
