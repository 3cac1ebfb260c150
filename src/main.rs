use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use rag_search::client::{ClientError, LaunchCommand};
use rag_search::config::{ClientConfig, DEFAULT_BIND, bind_address};
use rag_search::logging::{LogTarget, init_tracing};
use rag_search::utils::get_log_path;

/// rag-search - answers questions from live web search results
#[derive(Parser)]
#[command(name = "rag-search")]
#[command(about = "Answer questions from live web search results with an LLM")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the query service HTTP API
    Serve(ServeCommand),
    /// Launch the interactive terminal chat client
    Chat(ChatCommand),
    /// Ask a single question and print the answer with its sources
    Ask(AskCommand),
}

/// Run the query service
#[derive(Parser)]
struct ServeCommand {
    /// Address to listen on
    #[arg(long, value_name = "HOST:PORT", default_value = DEFAULT_BIND)]
    bind: String,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Options shared by the client commands
#[derive(Args)]
struct ClientArgs {
    /// Query service URL [env: RAG_SEARCH_URL] [default: http://localhost:5000]
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Never start the query service; fail if it is not running
    #[arg(long)]
    no_launch: bool,

    /// Command used to start the query service (default: `rag-search serve`)
    #[arg(long, value_name = "COMMAND", conflicts_with = "no_launch")]
    server_cmd: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Launch the chat client
#[derive(Parser)]
struct ChatCommand {
    #[command(flatten)]
    client: ClientArgs,
}

/// Ask a single question
#[derive(Parser)]
struct AskCommand {
    /// The question to ask
    #[arg(value_name = "QUERY")]
    query: String,

    #[command(flatten)]
    client: ClientArgs,
}

fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Serve(cmd) => handle_serve(cmd),
        Commands::Chat(cmd) => handle_chat(cmd),
        Commands::Ask(cmd) => handle_ask(cmd),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        // Client errors already carry their user-facing wording
        if let Some(client_error) = e.downcast_ref::<ClientError>() {
            eprintln!("{client_error}");
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors include empty input and missing configuration. Internal errors
/// include connectivity and I/O failures.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        let msg = cause.to_string();
        msg.contains("cannot be empty") || msg.contains("Missing API key")
    })
}

fn handle_serve(cmd: &ServeCommand) -> Result<()> {
    let target = match &cmd.log_file {
        Some(path) => LogTarget::File(path.clone()),
        None => LogTarget::Stderr,
    };
    init_tracing(cmd.verbose, target)?;

    rag_search::server::run(&cmd.bind)
}

fn handle_chat(cmd: &ChatCommand) -> Result<()> {
    let config = client_config(&cmd.client)?;
    init_tracing(cmd.client.verbose, LogTarget::File(get_log_path("client")?))?;

    rag_search::tui::run(&config)
}

fn handle_ask(cmd: &AskCommand) -> Result<()> {
    let query = cmd.query.trim();
    if query.is_empty() {
        anyhow::bail!("Query cannot be empty");
    }

    let config = client_config(&cmd.client)?;
    init_tracing(cmd.client.verbose, LogTarget::File(get_log_path("client")?))?;

    let mut connection = config.connect()?;
    let result = connection.ask(query);
    connection.shutdown();
    let answer = result?;

    println!("{}", answer.response());
    if !answer.sources().is_empty() {
        println!();
        println!("Sources:");
        for (i, source) in answer.sources().iter().enumerate() {
            println!("{}. {}", i + 1, source);
        }
    }

    Ok(())
}

/// Resolves the client configuration, including how to launch the service.
fn client_config(args: &ClientArgs) -> Result<ClientConfig> {
    let config = ClientConfig::resolve(args.endpoint.clone())?;
    if args.no_launch {
        return Ok(config);
    }

    let command = match &args.server_cmd {
        Some(line) => LaunchCommand::parse(line).context("--server-cmd cannot be empty")?,
        None => {
            let bind = bind_address(&config.endpoint)?;
            let log_file = get_log_path("server")?;
            LaunchCommand::current_exe_serve(&bind, Some(&log_file))?
        }
    };

    Ok(config.with_launch(command))
}
