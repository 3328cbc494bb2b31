use std::future::Future;
use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use sous_application::{ConversationEvent, SendOutcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;

/// Line-oriented chat on stdin. Ctrl-C cancels the reply being streamed and
/// quits at the prompt; an empty line or EOF also quits.
pub async fn run() -> Result<()> {
    let config = super::gemini_config()?;
    let mut kitchen = super::kitchen(&config);
    let session = kitchen.chat();
    let mut events = session.subscribe().await;

    println!("{}", session.transcript().await.last().text.cyan());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".green());
        std::io::stdout().flush()?;

        // Once ctrl_c() has been polled it replaces the default SIGINT
        // handler, so the prompt has to listen for it as well.
        let Some(line) = next_prompt(&mut lines, tokio::signal::ctrl_c()).await? else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            break;
        }

        let mut turn = tokio::spawn({
            let session = session.clone();
            async move { session.send(&line).await }
        });
        let mut printed = 0;

        let outcome = loop {
            tokio::select! {
                Some(event) = events.recv() => render(&event, &mut printed)?,
                outcome = &mut turn => break outcome?,
                _ = tokio::signal::ctrl_c() => {
                    session.cancel().await;
                }
            }
        };
        drain(&mut events, &mut printed)?;

        if outcome == SendOutcome::Ignored {
            println!("{}", "Still answering the previous question.".yellow());
        }
    }

    Ok(())
}

/// Next input line, or `None` on EOF or when `interrupt` fires first.
async fn next_prompt<R>(
    lines: &mut Lines<R>,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    tokio::select! {
        line = lines.next_line() => Ok(line?),
        _ = interrupt => Ok(None),
    }
}

fn drain(events: &mut mpsc::UnboundedReceiver<ConversationEvent>, printed: &mut usize) -> Result<()> {
    while let Ok(event) = events.try_recv() {
        render(&event, printed)?;
    }
    Ok(())
}

/// Prints the part of the cumulative reply that is not on screen yet.
fn render(event: &ConversationEvent, printed: &mut usize) -> Result<()> {
    match event {
        ConversationEvent::Chunk { cumulative } => {
            if let Some(delta) = cumulative.get(*printed..) {
                print!("{delta}");
                std::io::stdout().flush()?;
            }
            *printed = cumulative.len();
        }
        ConversationEvent::Completed { .. } => println!(),
        ConversationEvent::Failed { fallback } => {
            if *printed > 0 {
                println!();
            }
            println!("{}", fallback.red());
        }
        ConversationEvent::Cancelled { .. } => println!(" {}", "[cancelled]".dimmed()),
        ConversationEvent::UserMessage { .. } | ConversationEvent::StreamOpened => {}
    }
    Ok(())
}
