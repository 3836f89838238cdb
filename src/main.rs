use std::cell::RefCell;
use std::io;

use clap::{ArgAction, Parser, Subcommand};
use memory_tree::console::render_sidebar;
use memory_tree::{ConfigError, ConnectionArgs, Console, HttpTreeApi, shell};
use nodes::view::sidebar_view;
use nodes::{ApiError, Expansion, Session, TreeApi, TreeState, forest_from_flat};
use tracing::Level;

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client init failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "memory-tree", about = "Browse and branch an AI memory tree from the terminal")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log more to stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Interactive shell (default).
    Shell,
    /// Print the tree once and exit.
    Tree,
    /// Print every node as JSON.
    Nodes {
        /// Nest the flat listing into a forest before printing.
        #[arg(long)]
        nested: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.connection.into_config()?;
    let api = HttpTreeApi::new(&config)?;
    tracing::debug!(backend = %api.base_url(), "backend configured");

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => run_shell(api).await,
        Command::Tree => print_tree(&api).await,
        Command::Nodes { nested } => print_nodes(&api, nested).await,
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose))
        .with_writer(io::stderr)
        .init();
}

async fn run_shell(api: HttpTreeApi) -> Result<(), CliError> {
    let console = Console::new(io::stdin().lock(), io::stdout());
    let session = Session::new(api, console, RefCell::new(TreeState::default()));
    shell::run(&session).await?;
    Ok(())
}

async fn print_tree(api: &HttpTreeApi) -> Result<(), CliError> {
    let forest = api.fetch_tree().await?;
    let view = sidebar_view(false, &forest, &Expansion::default(), None);
    println!("{}", render_sidebar(&view));
    Ok(())
}

async fn print_nodes(api: &HttpTreeApi, nested: bool) -> Result<(), CliError> {
    let nodes = api.fetch_nodes().await?;
    let nodes = if nested { forest_from_flat(nodes) } else { nodes };
    let rendered = serde_json::to_string_pretty(&nodes)?;
    println!("{rendered}");
    Ok(())
}
