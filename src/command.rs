use thiserror::Error;

use crate::github::PageTarget;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (type `help` for a list)")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: String,
        expected: &'static str,
    },

    #[error("Invalid number for `{command}`: {value}")]
    InvalidNumber { command: String, value: String },
}

/// One line of input at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    /// Open the repository at this one-based position of the listed page.
    Open(usize),
    Repositories(PageTarget),
    Contributors(PageTarget),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  search <text> | / <text>   search repositories by name
  open <n> | <n>             show contributors of the n-th listed repository
  next | prev | first | last page through repositories
  page <n>                   jump to repository page n
  cnext | cprev | cfirst | clast
                             page through contributors
  cpage <n>                  jump to contributor page n
  show                       redraw the current view
  help                       this text
  quit                       leave";

impl Command {
    /// Parse a prompt line. Blank lines redraw the view.
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Show);
        }

        if let Some(rest) = line.strip_prefix('/') {
            return search(rest, "/");
        }
        if line.chars().all(|c| c.is_ascii_digit()) {
            return position("open", Some(line)).map(Command::Open);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, Some(rest.trim())),
            None => (line, None),
        };

        match word.to_ascii_lowercase().as_str() {
            "search" | "s" => search(rest.unwrap_or_default(), word),
            "open" | "o" => position(word, rest).map(Command::Open),
            "next" | "n" => Ok(Command::Repositories(PageTarget::Next)),
            "prev" | "p" => Ok(Command::Repositories(PageTarget::Prev)),
            "first" => Ok(Command::Repositories(PageTarget::First)),
            "last" => Ok(Command::Repositories(PageTarget::Last)),
            "page" => position(word, rest)
                .map(|n| Command::Repositories(PageTarget::Page(n as u32))),
            "cnext" => Ok(Command::Contributors(PageTarget::Next)),
            "cprev" => Ok(Command::Contributors(PageTarget::Prev)),
            "cfirst" => Ok(Command::Contributors(PageTarget::First)),
            "clast" => Ok(Command::Contributors(PageTarget::Last)),
            "cpage" => position(word, rest)
                .map(|n| Command::Contributors(PageTarget::Page(n as u32))),
            "show" | "ls" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

fn search(text: &str, command: &str) -> Result<Command, CommandError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommandError::MissingArgument {
            command: command.to_string(),
            expected: "search text",
        });
    }
    Ok(Command::Search(text.to_string()))
}

/// A positive, one-based number argument.
fn position(command: &str, arg: Option<&str>) -> Result<usize, CommandError> {
    let value = arg
        .filter(|arg| !arg.is_empty())
        .ok_or_else(|| CommandError::MissingArgument {
            command: command.to_string(),
            expected: "a number",
        })?;

    value
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .map(|n| n as usize)
        .ok_or_else(|| CommandError::InvalidNumber {
            command: command.to_string(),
            value: value.to_string(),
        })
}
