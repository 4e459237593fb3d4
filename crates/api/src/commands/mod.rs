//! Kiosk commands - operator input to session operations

mod navigation;
mod output;

use std::str::FromStr;
use std::time::Instant;

use anyhow::{anyhow, bail};
use chrono::NaiveDate;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

pub use navigation::*;
pub use output::*;

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    /// 1-based position or exact report name
    Goto(String),
    List,
    Auto(bool),
    Window { start: NaiveDate, end: NaiveDate },
    Refresh,
    Export,
    Snapshot,
    Help,
    Quit,
}

impl Command {
    /// Stable identifier used in command logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Next => "navigation::next",
            Self::Previous => "navigation::previous",
            Self::Goto(_) => "navigation::goto",
            Self::List => "navigation::list",
            Self::Auto(_) => "navigation::auto",
            Self::Window { .. } => "navigation::window",
            Self::Refresh => "navigation::refresh",
            Self::Export => "output::export",
            Self::Snapshot => "output::snapshot",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match verb.to_ascii_lowercase().as_str() {
            "next" | "n" => Self::Next,
            "prev" | "previous" | "p" => Self::Previous,
            "goto" | "g" if !rest.is_empty() => Self::Goto(rest.to_string()),
            "goto" | "g" => bail!("usage: goto <n|nome>"),
            "list" | "ls" => Self::List,
            "auto" => match rest.to_ascii_lowercase().as_str() {
                "on" => Self::Auto(true),
                "off" => Self::Auto(false),
                _ => bail!("usage: auto on|off"),
            },
            "window" | "w" => {
                let mut dates = rest.split_whitespace();
                let (Some(start), Some(end), None) = (dates.next(), dates.next(), dates.next())
                else {
                    bail!("usage: window <YYYY-MM-DD> <YYYY-MM-DD>");
                };
                Self::Window { start: parse_date(start)?, end: parse_date(end)? }
            }
            "refresh" | "r" => Self::Refresh,
            "export" | "e" => Self::Export,
            "snapshot" | "s" => Self::Snapshot,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(command)
    }
}

fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow!("invalid date '{value}': {e} (expected YYYY-MM-DD)"))
}

/// What the kiosk should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text and keep running
    Show(String),
    Quit,
}

/// Run `command` against the context.
///
/// Failures are returned to the caller; a failed render leaves rotation
/// stopped until the next successful one.
pub async fn execute(
    ctx: &mut AppContext,
    command: Command,
    now: Instant,
    today: NaiveDate,
) -> anyhow::Result<Reply> {
    let name = command.name();
    let started = Instant::now();

    let result = match command {
        Command::Next => next_report(ctx, now).await,
        Command::Previous => previous_report(ctx, now).await,
        Command::Goto(target) => goto_report(ctx, &target, now).await,
        Command::List => Ok(list_reports(ctx)),
        Command::Auto(enabled) => set_auto_rotate(ctx, enabled, now).await,
        Command::Window { start, end } => change_window(ctx, start, end, now).await,
        Command::Refresh => refresh(ctx, now).await,
        Command::Export => export_document(ctx, today).await,
        Command::Snapshot => snapshot_chart(ctx).await,
        Command::Help => Ok(Reply::Show(crate::utils::display::HELP.to_string())),
        Command::Quit => Ok(Reply::Quit),
    };

    log_command_execution(name, started.elapsed(), result.is_ok());
    result
}
