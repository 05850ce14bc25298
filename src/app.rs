use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::command::{Command, HELP};
use crate::explorer::{execute, Completion, Explorer, Outcome, Request};
use crate::github::GitHubApi;
use crate::view::{self, Format, ViewError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),

    #[error("Failed to render view: {0}")]
    View(#[from] ViewError),
}

/// What a one-shot run should do.
#[derive(Debug, Clone)]
pub struct OneShot {
    pub query: String,
    pub page: u32,
    /// One-based position of the repository whose contributors to show.
    pub open: Option<usize>,
}

/// Run a request to completion and fold its result into the explorer.
async fn settle(explorer: &mut Explorer, api: &dyn GitHubApi, request: Request) -> Outcome {
    let completion = execute(api, request).await;
    let outcome = explorer.complete(completion);
    debug!(?outcome, "request settled");
    outcome
}

/// Search once, optionally open one repository, and render the result.
pub async fn run_once(
    explorer: &mut Explorer,
    api: &dyn GitHubApi,
    job: &OneShot,
    format: Format,
    output: Option<&Path>,
) -> Result<(), AppError> {
    if let Some(request) = explorer.submit_page(&job.query, job.page) {
        settle(explorer, api, request).await;
    }

    if let Some(position) = job.open {
        match explorer.open(position.saturating_sub(1)) {
            Some(request) => {
                settle(explorer, api, request).await;
            }
            None => warn!(position, "no repository at that position"),
        }
    }

    view::output(explorer, format, output)?;
    Ok(())
}

/// Interactive session: one event loop reading commands from stdin and
/// applying completed requests as they arrive.
///
/// Every request runs on its own task; nothing is cancelled when a newer
/// request supersedes it.
pub async fn run_interactive(
    explorer: &mut Explorer,
    api: Arc<dyn GitHubApi>,
) -> Result<(), AppError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    view::print_terminal(explorer);
    prompt().await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{}", HELP),
                    Ok(command) => {
                        if let Some(request) = dispatch(explorer, command) {
                            spawn_request(Arc::clone(&api), request, tx.clone());
                        }
                        view::print_terminal(explorer);
                    }
                    Err(err) => eprintln!("{}", err),
                }
                prompt().await?;
            }
            Some(completion) = rx.recv() => {
                let outcome = explorer.complete(completion);
                debug!(?outcome, "request settled");
                if outcome != Outcome::Discarded {
                    view::print_terminal(explorer);
                    prompt().await?;
                }
            }
        }
    }

    info!("session ended");
    Ok(())
}

/// Apply a parsed command to the explorer.
fn dispatch(explorer: &mut Explorer, command: Command) -> Option<Request> {
    match command {
        Command::Search(text) => explorer.submit(&text),
        Command::Open(position) => {
            let request = explorer.open(position.saturating_sub(1));
            if request.is_none() && explorer.search().items().len() < position {
                eprintln!("No repository #{} on this page.", position);
            }
            request
        }
        Command::Repositories(target) => explorer.navigate_search(target),
        Command::Contributors(target) => explorer.navigate_contributors(target),
        Command::Show | Command::Help | Command::Quit => None,
    }
}

fn spawn_request(api: Arc<dyn GitHubApi>, request: Request, tx: mpsc::UnboundedSender<Completion>) {
    tokio::spawn(async move {
        let completion = execute(api.as_ref(), request).await;
        if tx.send(completion).is_err() {
            debug!("session closed before request completed");
        }
    });
}

async fn prompt() -> Result<(), AppError> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    Ok(())
}
