//! Command-line front end for the tern agent.
//!
//! Runs a tool-calling agent confined to one workspace directory against any
//! OpenAI-compatible chat-completions endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session in ./ws
//! OPENAI_API_KEY=xxx cargo run -p tern-cli -- --workspace ./ws
//!
//! # Headless mode (single query, useful for testing/scripting)
//! cargo run -p tern-cli -- --prompt "Create hello.py that prints hi" --quiet
//!
//! # DeepSeek, reading DEEPSEEK_API_KEY
//! DEEPSEEK_API_KEY=xxx cargo run -p tern-cli -- --provider deepseek
//!
//! # Local OpenAI-compatible server
//! TERN_API_KEY=none cargo run -p tern-cli -- --base-url http://localhost:11434/v1 --model qwen3
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tern_agent::{Agent, HCons, SessionState};
use tern_cli::{DebugHook, Provider};
use tern_core::llm::Role;
use tern_openai::OpenAI;
use tern_sandbox::SandboxConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

type CliAgent = Agent<OpenAI, HCons<DebugHook, ()>>;

/// Tool-calling coding agent confined to a workspace directory.
#[derive(Parser, Debug)]
#[command(name = "tern", version, about)]
struct Args {
    /// Workspace directory. Every file path and shell command is confined to it.
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Provider preset selecting the endpoint, default model and API key variable.
    #[arg(long, value_enum, default_value_t)]
    provider: Provider,

    /// Model to use.
    #[arg(short, long)]
    model: Option<String>,

    /// Custom API base URL (for OpenAI-compatible endpoints, proxies, etc.)
    #[arg(short, long)]
    base_url: Option<String>,

    /// System prompt replacing the built-in instructions.
    #[arg(short, long)]
    system: Option<String>,

    /// Single prompt to run (headless mode). Runs query and exits.
    #[arg(long)]
    prompt: Option<String>,

    /// Quiet mode. Only output the response (useful with --prompt for scripting).
    #[arg(short, long)]
    quiet: bool,

    /// Do not offer the todoWrite tool to the model.
    #[arg(long)]
    no_todo: bool,

    /// Shell command timeout in seconds.
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Stop a session after this many model calls.
    #[arg(long)]
    max_turns: Option<usize>,

    /// Append a Markdown transcript of the session to this file.
    #[arg(long)]
    transcript: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let model = build_model(&args)?;
    let model_name = model.config().model.clone();
    let mut agent = build_agent(model, &args)?;
    tracing::info!(
        provider = %args.provider,
        model = %model_name,
        workspace = %agent.sandbox().workspace().root().display(),
        headless = args.prompt.is_some(),
        "session started"
    );

    if !args.quiet {
        eprintln!("Tern Agent CLI");
        eprintln!("Provider: {}", args.provider);
        eprintln!("Model: {model_name}");
        eprintln!("Workspace: {}", agent.sandbox().workspace().root().display());
        if args.prompt.is_none() {
            eprintln!("Commands: /quit, /clear, /tasks, /history");
        }
        eprintln!();
    }

    // Headless mode: run single prompt and exit
    if let Some(ref prompt) = args.prompt {
        return run_headless(&mut agent, prompt).await;
    }

    run_repl(&mut agent).await
}

fn build_model(args: &Args) -> Result<OpenAI> {
    let provider = args.provider;
    let Some(api_key) = provider.api_key(|name| std::env::var(name).ok()) else {
        bail!("no API key found; set {}", provider.env_vars().join(" or "));
    };

    let mut model = provider.create(api_key);
    let base_url = args.base_url.clone().or_else(|| {
        (provider == Provider::OpenAI)
            .then(|| std::env::var("OPENAI_BASE_URL").ok())
            .flatten()
            .filter(|url| !url.trim().is_empty())
    });
    if let Some(url) = base_url {
        model = model.with_base_url(url);
    }
    if let Some(ref name) = args.model {
        model = model.with_model(name);
    }
    Ok(model)
}

fn build_agent(model: OpenAI, args: &Args) -> Result<CliAgent> {
    let sandbox_config = SandboxConfig::default().with_timeout(Duration::from_secs(args.timeout));

    let mut builder = Agent::builder(model)
        .workspace(&args.workspace)
        .sandbox_config(sandbox_config)
        .todo(!args.no_todo);
    if let Some(ref system) = args.system {
        builder = builder.system_prompt(system);
    }
    if let Some(limit) = args.max_turns {
        builder = builder.max_turns(limit);
    }
    if let Some(ref path) = args.transcript {
        builder = builder.transcript(path);
    }

    builder
        .hook(DebugHook::new(!args.quiet))
        .build()
        .with_context(|| format!("failed to open workspace {}", args.workspace.display()))
}

/// Run a single prompt and exit (headless mode).
async fn run_headless(agent: &mut CliAgent, prompt: &str) -> Result<()> {
    match agent.query(prompt).await {
        Ok(response) => {
            println!("{response}");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "headless query failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run_repl(agent: &mut CliAgent) -> Result<()> {
    eprintln!("Agent ready. Type your message or a command.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("You> ");
        io::stderr().flush()?;
        let Some(input) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        // Handle commands
        if input.starts_with('/') {
            match input {
                "/quit" | "/exit" | "/q" => break,
                "/clear" => {
                    agent.reset();
                    eprintln!("Session cleared.");
                }
                "/tasks" => println!("{}", agent.todos().render()),
                "/history" => print_history(agent),
                cmd => {
                    eprintln!("Unknown command: {cmd}");
                    eprintln!("Available: /quit, /clear, /tasks, /history");
                }
            }
            continue;
        }

        let outcome = agent.send(input).await;
        tracing::debug!(
            turns = outcome.turns,
            tool_calls = outcome.tool_calls,
            state = ?outcome.state,
            "turn finished"
        );
        match &outcome.state {
            SessionState::Failed { error } => {
                tracing::warn!(%error, "turn failed");
                eprintln!("\x1b[31mError: {error}\x1b[0m");
            }
            _ => {
                println!("\n{}", outcome.final_text);
                if let Some(warning) = outcome.warning() {
                    eprintln!("\x1b[33mNote: {warning}\x1b[0m");
                }
            }
        }
        println!();
    }

    eprintln!("Goodbye!");
    Ok(())
}

fn print_history(agent: &CliAgent) {
    let history = agent.messages();
    if history.is_empty() {
        println!("No conversation history.");
        return;
    }

    println!("Conversation history ({} messages):", history.len());
    for msg in history {
        let role = match msg.role() {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
            Role::Tool => "Tool",
        };
        let calls = msg.tool_calls().len();
        let content = truncate(msg.content(), 100).replace('\n', " ");
        if calls > 0 {
            println!("  [{role}] {content} ({calls} tool call(s))");
        } else {
            println!("  [{role}] {content}");
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_owned(),
    }
}
