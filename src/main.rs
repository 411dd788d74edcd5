//! Desk Agent - Entry Point
//!
//! Reads commands in English or Arabic, plans them through the fast or slow
//! path and runs them against the host's capabilities.

use desk_agent::command::{Agent, CancelToken, CommandOutcome, Route};
use desk_agent::core::config::AgentConfig;
use desk_agent::core::error::Result;
use desk_agent::core::types::{Language, Platform};
use desk_agent::platform::StaticProbe;

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Desk Agent - natural-language desktop automation
#[derive(Parser, Debug)]
#[command(name = "desk-agent")]
#[command(about = "Run desktop automation commands written in English or Arabic")]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Language hint for every command (en or ar); detected when omitted
    #[arg(long)]
    lang: Option<Language>,

    /// Host platform override (mac, linux, windows)
    #[arg(long)]
    platform: Option<Platform>,

    /// Run a single command and exit
    #[arg(long)]
    command: Option<String>,

    /// List the capability catalog and exit
    #[arg(long)]
    capabilities: bool,

    /// Treat display, audio and network as absent (everything runs simulated)
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("desk_agent=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };
    if let Some(platform) = args.platform {
        config.platform_override = Some(platform);
    }
    if let Some(lang) = args.lang {
        config.default_language = lang;
    }

    let mut agent = if args.headless {
        Agent::with_probe(&config, Arc::new(StaticProbe::none_available()))?
    } else {
        Agent::from_config(&config)?
    };

    if args.capabilities {
        print_capabilities(&agent);
        return Ok(());
    }

    let rt = Runtime::new()?;

    if let Some(text) = &args.command {
        let outcome = rt.block_on(agent.handle(text, args.lang));
        print_outcome(&outcome);
        return Ok(());
    }

    // Ctrl-C stops the running command before its next step, or exits at the prompt
    let busy = Arc::new(AtomicBool::new(false));
    let token = agent.cancel_token();
    let running = Arc::clone(&busy);
    rt.spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if interrupt(running.load(Ordering::SeqCst), &token) == Interrupt::Exit {
                println!();
                std::process::exit(130);
            }
        }
    });

    println!("\n=== DESK AGENT ===");
    println!("Type a command in English or Arabic.");
    println!();
    println!("Commands:");
    println!("  history         - Show recent steps");
    println!("  reset           - Forget session history and references");
    println!("  quit / q        - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        match input {
            "quit" | "q" | "exit" => break,
            "reset" => {
                agent.reset();
                println!("Session cleared.");
            }
            "history" => print_history(&agent),
            _ => {
                busy.store(true, Ordering::SeqCst);
                let outcome = rt.block_on(agent.handle(input, args.lang));
                busy.store(false, Ordering::SeqCst);
                print_outcome(&outcome);
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    Cancelled,
    Exit,
}

fn interrupt(busy: bool, token: &CancelToken) -> Interrupt {
    if busy {
        token.cancel();
        Interrupt::Cancelled
    } else {
        Interrupt::Exit
    }
}

fn print_outcome(outcome: &CommandOutcome) {
    println!();
    if let CommandOutcome::Executed { route, .. } = outcome {
        let path = match route {
            Route::FastPath => "fast path",
            Route::SlowPath => "planner",
        };
        println!("[{}]", path);
    }
    println!("{}", outcome.message());
    println!();
}

fn print_history(agent: &Agent) {
    let session = agent.session();
    if session.is_empty() {
        println!("No history yet.");
        return;
    }
    for entry in session.recent(session.len()) {
        let tag = if entry.degraded { " (simulated)" } else { "" };
        println!(
            "  {} [{}] {}{}",
            entry.step.description, entry.step.capability, entry.status, tag
        );
    }
}

fn print_capabilities(agent: &Agent) {
    let registry = agent.registry();
    for capability in registry.capabilities() {
        let tags: Vec<String> = registry
            .platforms(&capability.id)
            .iter()
            .map(|t| t.to_string())
            .collect();
        println!("{}", capability.signature());
        println!("    {} [{}]", capability.description, tags.join(", "));
    }
}
