//! Math Tutor - Terminal chat
//!
//! Three panes in one prompt: plain lines talk to the tutor, `/structure`
//! turns the latest answer into a solution record, `/ask` opens a follow-up
//! side question.

use anyhow::Result;
use clap::Parser;
use math_tutor::chat::{ChatSession, Conversation};
use math_tutor::engine::SolutionEngine;
use math_tutor::llm::{HttpLlmClient, Role};
use math_tutor::Config;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tutor")]
#[command(about = "Chat with the Math Tutor")]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Model identifier (overrides config)
    #[arg(long, env = "MODEL_NAME")]
    model: Option<String>,
}

const HELP: &str = "\
Type a math question to start.
  /structure        convert the last answer into a solution record (JSON)
  /ask <question>   follow-up question, kept out of the main conversation
  /history          show the conversation
  /clear            start over
  /quit             exit";

enum Command<'a> {
    Turn(&'a str),
    Structure,
    Ask(&'a str),
    History,
    Clear,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Turn(line);
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "structure" => Command::Structure,
        "ask" => Command::Ask(arg),
        "history" => Command::History,
        "clear" => Command::Clear,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(name),
    }
}

fn print_update(segment: &str) {
    print!("{}", segment);
    let _ = std::io::stdout().flush();
}

fn prompt() {
    print!("\n> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they don't interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,math_tutor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_yaml_and_env(Some(&cli.config))?;
    if let Some(model) = cli.model {
        config.llm.model = model;
    }

    let llm = Arc::new(HttpLlmClient::from_settings(&config.llm));
    let session = ChatSession::new(SolutionEngine::new(llm));
    let mut conversation = Conversation::new();
    let mut follow_ups = Conversation::new();

    println!("Math Tutor ({})", config.llm.model);
    println!("{}", HELP);
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Turn("") => {}
            Command::Turn(question) => {
                if let Err(e) = session
                    .turn(&mut conversation, question, print_update)
                    .await
                {
                    println!("\n[error] {:#}", e);
                }
                println!();
            }
            Command::Structure => match session.structure(&conversation).await {
                Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                Err(e) => println!("[structure] {}", e),
            },
            Command::Ask("") => println!("usage: /ask <question>"),
            Command::Ask(question) => {
                print!("[follow-up] ");
                if let Err(e) = session
                    .follow_up(&conversation, &mut follow_ups, question, print_update)
                    .await
                {
                    println!("\n[error] {:#}", e);
                }
                println!();
            }
            Command::History => {
                for message in conversation.messages() {
                    let who = match message.role {
                        Role::User => "You",
                        _ => "Tutor",
                    };
                    println!("{}: {}\n", who, message.content);
                }
            }
            Command::Clear => {
                conversation.clear();
                follow_ups.clear();
                println!("Conversation cleared.");
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(name) => println!("Unknown command /{} (try /help)", name),
        }
        prompt();
    }

    Ok(())
}
