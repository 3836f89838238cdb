//! Interactive shell: one command per input line, driving the session.
//!
//! The shell never talks to the backend itself. Every action goes through
//! [`Session`], which already alerts on failure through the console, so the
//! loop only renders results and keeps going.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use nodes::view::APP_TITLE;
use nodes::{NodeId, Session, SessionError, Store, TreeApi};

use crate::console::{Console, render_panel, render_sidebar};

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;

pub const PROMPT: &str = "memory-tree> ";

pub const HELP: &str = "\
Commands:
  tree | ls          show the conversation tree
  refresh            reload the tree from the backend
  select <id>        select a node and show it
  toggle <id>        expand or collapse a node
  show               show the selected node
  draft <text>       set the message for the next branch
  send               branch from the selected node with the draft
  say <text>         draft and send in one step
  delete             delete the selected branch
  clear              delete the entire tree
  help               show this help
  quit | exit        leave";

// =============================================================================
// COMMANDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Tree,
    Refresh,
    Select(NodeId),
    Toggle(NodeId),
    Show,
    Draft(String),
    Send,
    Say(String),
    Delete,
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a node id")]
    InvalidId(String),
}

impl FromStr for ShellCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = rest.trim();
        match verb.to_ascii_lowercase().as_str() {
            "tree" | "ls" => Ok(Self::Tree),
            "refresh" => Ok(Self::Refresh),
            "select" => parse_id("select", arg).map(Self::Select),
            "toggle" => parse_id("toggle", arg).map(Self::Toggle),
            "show" => Ok(Self::Show),
            // Draft text is kept verbatim apart from the separating space.
            "draft" => Ok(Self::Draft(rest.to_owned())),
            "send" => Ok(Self::Send),
            "say" if arg.is_empty() => Err(CommandError::MissingArgument("say")),
            "say" => Ok(Self::Say(rest.to_owned())),
            "delete" => Ok(Self::Delete),
            "clear" => Ok(Self::Clear),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_owned())),
        }
    }
}

fn parse_id(verb: &'static str, arg: &str) -> Result<NodeId, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(verb));
    }
    arg.parse().map_err(|_| CommandError::InvalidId(arg.to_owned()))
}

// =============================================================================
// LOOP
// =============================================================================

type ShellSession<A, R, W, S> = Session<A, Console<R, W>, S>;

/// Run until `quit` or end of input.
///
/// # Errors
///
/// Only console I/O failures end the loop with an error.
pub async fn run<A, R, W, S>(session: &ShellSession<A, R, W, S>) -> io::Result<()>
where
    A: TreeApi,
    R: BufRead,
    W: Write,
    S: Store,
{
    let console = session.dialogs();
    console.print(APP_TITLE)?;
    session.fetch_tree().await;
    print_tree(session)?;

    loop {
        console.prompt(PROMPT)?;
        let Some(line) = console.read_line()? else {
            console.print("")?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(error) => {
                console.print(&error.to_string())?;
                continue;
            }
        };
        tracing::trace!(?command, "shell command");
        if command == ShellCommand::Quit {
            break;
        }
        execute(session, command).await?;
    }
    Ok(())
}

async fn execute<A, R, W, S>(session: &ShellSession<A, R, W, S>, command: ShellCommand) -> io::Result<()>
where
    A: TreeApi,
    R: BufRead,
    W: Write,
    S: Store,
{
    let console = session.dialogs();
    match command {
        ShellCommand::Tree => print_tree(session),
        ShellCommand::Refresh => {
            session.fetch_tree().await;
            print_tree(session)
        }
        ShellCommand::Select(id) => {
            if !session.store().read(|s| s.contains(id)) {
                return console.print(&format!("No node #{id} in the tree"));
            }
            session.select(Some(id));
            print_panel(session)
        }
        ShellCommand::Toggle(id) => {
            if !session.store().read(|s| s.contains(id)) {
                return console.print(&format!("No node #{id} in the tree"));
            }
            session.toggle(id);
            print_tree(session)
        }
        ShellCommand::Show => print_panel(session),
        ShellCommand::Draft(text) => {
            session.set_message(text);
            console.print("Draft saved")
        }
        ShellCommand::Send => send(session).await,
        ShellCommand::Say(text) => {
            session.set_message(text);
            send(session).await
        }
        ShellCommand::Delete => match session.clear_branch().await {
            Ok(_) => print_tree(session),
            Err(error) => report(console, &error),
        },
        ShellCommand::Clear => match session.clear_tree().await {
            Ok(()) => print_tree(session),
            Err(error) => report(console, &error),
        },
        ShellCommand::Help => console.print(HELP),
        ShellCommand::Quit => Ok(()),
    }
}

async fn send<A, R, W, S>(session: &ShellSession<A, R, W, S>) -> io::Result<()>
where
    A: TreeApi,
    R: BufRead,
    W: Write,
    S: Store,
{
    match session.send_message().await {
        Ok(_) => {
            print_tree(session)?;
            print_panel(session)
        }
        Err(error) => report(session.dialogs(), &error),
    }
}

/// Session failures were already alerted; only a cancel needs a word.
fn report<R: BufRead, W: Write>(console: &Console<R, W>, error: &SessionError) -> io::Result<()> {
    tracing::debug!(%error, "shell command did not complete");
    if matches!(error, SessionError::Cancelled) {
        console.print("Cancelled")?;
    }
    Ok(())
}

fn print_tree<A, R, W, S>(session: &ShellSession<A, R, W, S>) -> io::Result<()>
where
    A: TreeApi,
    R: BufRead,
    W: Write,
    S: Store,
{
    let text = session.store().read(|s| render_sidebar(&s.sidebar()));
    session.dialogs().print(&text)
}

fn print_panel<A, R, W, S>(session: &ShellSession<A, R, W, S>) -> io::Result<()>
where
    A: TreeApi,
    R: BufRead,
    W: Write,
    S: Store,
{
    let text = session.store().read(|s| render_panel(s.panel().as_ref()));
    session.dialogs().print(&text)
}
