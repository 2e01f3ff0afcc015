// Terminal chat widget: type a message, watch the reply stream in.
use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use portal_assistant::client::assembler::AssemblyState;
use portal_assistant::client::conversation::{Conversation, EntryKind};
use portal_assistant::client::{ChatClient, QUICK_REPLIES};
use portal_assistant::config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    let client = ChatClient::new(reqwest::Client::new(), &config);
    let mut conversation = Conversation::new();

    println!("HIT Assistant ({}). Ask me anything about your courses, marks, or fees!", config.endpoint);
    for (i, reply) in QUICK_REPLIES.iter().enumerate() {
        println!("  [{}] {}", i + 1, reply);
    }
    println!("Type /clear to start over, /quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else { break };
        let input = line.trim();
        let text = match input {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                conversation.clear();
                continue;
            }
            n if n.len() == 1 => n
                .parse::<usize>()
                .ok()
                .and_then(|i| QUICK_REPLIES.get(i.wrapping_sub(1)).copied())
                .unwrap_or(n),
            other => other,
        }
        .to_string();

        let mut printed = 0;
        let mut flushed = Ok(());
        let state = client
            .send_observed(&mut conversation, &text, |entry| match entry.kind {
                EntryKind::Reply => {
                    print!("{}", &entry.text[printed..]);
                    printed = entry.text.len();
                    if flushed.is_ok() {
                        flushed = std::io::stdout().flush();
                    }
                }
                EntryKind::Notice => println!("\n[!] {}", entry.text),
            })
            .await;
        flushed?;

        if state == AssemblyState::Done {
            println!();
        }
    }
    Ok(())
}
