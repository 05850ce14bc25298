pub mod types;

pub use types::{status_label, Snapshot};

use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::explorer::{Explorer, FlowStatus};
use crate::github::PageDescriptor;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Failed to write view file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to encode view as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format for a one-shot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Terminal,
    Markdown,
    Json,
}

/// Output the current view to the terminal (default) or to a file.
/// A file always gets Markdown unless JSON was asked for.
#[instrument(skip(explorer))]
pub fn output(explorer: &Explorer, format: Format, path: Option<&Path>) -> Result<(), ViewError> {
    let text = match format {
        Format::Terminal if path.is_none() => {
            debug!("writing view to terminal");
            print_terminal(explorer);
            return Ok(());
        }
        Format::Json => serde_json::to_string_pretty(&Snapshot::capture(explorer))?,
        Format::Terminal | Format::Markdown => render_markdown(explorer),
    };

    match path {
        Some(path) => {
            debug!(path = %path.display(), "writing view to file");
            std::fs::write(path, text)?;
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Pagination controls for `page`, showing only those the API offered.
///
/// `« 1  ‹ 3  [4]  5 ›  9 »`
pub fn pagination_bar(page: &PageDescriptor) -> String {
    let mut parts = Vec::new();
    if let Some(first) = page.first {
        parts.push(format!("« {}", first));
    }
    if let Some(prev) = page.prev {
        parts.push(format!("‹ {}", prev));
    }
    parts.push(format!("[{}]", page.current));
    if let Some(next) = page.next {
        parts.push(format!("{} ›", next));
    }
    if let Some(last) = page.last {
        parts.push(format!("{} »", last));
    }
    parts.join("  ")
}

/// Print the whole view: repository list, the selected repository's
/// contributors nested under it, and both pagination bars.
pub fn print_terminal(explorer: &Explorer) {
    let search = explorer.search();
    println!();

    let Some(query) = search.scope() else {
        println!("{}", "Type `search <text>` to find repositories.".dimmed());
        return;
    };

    match search.status() {
        FlowStatus::Idle => {}
        FlowStatus::Loading => {
            println!("{} \"{}\"", "Searching".cyan(), query);
            return;
        }
        FlowStatus::Failed => {
            println!(
                "{} {}",
                "Search failed:".red().bold(),
                search.error().unwrap_or("unknown error")
            );
            return;
        }
        FlowStatus::Populated if search.items().is_empty() => {
            println!("No repositories match \"{}\".", query);
            return;
        }
        FlowStatus::Populated => {}
    }

    println!("{} \"{}\"", "Repositories matching".bold(), query);
    for (i, repo) in search.items().iter().enumerate() {
        let selected = explorer.selection().is_selected(repo);
        let marker = if selected { "▾" } else { "▸" };
        let label = if selected {
            repo.label().green().bold()
        } else {
            repo.label().normal()
        };
        println!(
            "{:>3}. {} {}  {}",
            i + 1,
            marker,
            label,
            format!("★ {}", repo.stargazers_count).yellow()
        );

        if selected {
            print_contributors(explorer, &repo.html_url, &repo.label());
        }
    }

    if let Some(page) = search.page() {
        println!();
        println!("  {}", pagination_bar(page));
    }
}

fn print_contributors(explorer: &Explorer, html_url: &str, label: &str) {
    let contributors = explorer.contributors();
    match contributors.status() {
        FlowStatus::Idle => {}
        FlowStatus::Loading => println!("       {}", "loading contributors…".cyan()),
        FlowStatus::Failed => println!(
            "       {} {}",
            "Contributors unavailable:".red(),
            contributors.error().unwrap_or("unknown error")
        ),
        FlowStatus::Populated if contributors.items().is_empty() => {
            println!("       {}", "No contributors.".dimmed())
        }
        FlowStatus::Populated => {
            println!("       {} contributors ({})", label, html_url.dimmed());
            for contributor in contributors.items() {
                println!(
                    "         • {} {}",
                    contributor.login,
                    contributor.html_url.dimmed()
                );
            }
            if let Some(page) = contributors.page() {
                println!("         {}", pagination_bar(page));
            }
        }
    }
}

/// Render the view as a Markdown document.
pub fn render_markdown(explorer: &Explorer) -> String {
    let search = explorer.search();
    let mut md = String::new();

    let Some(query) = search.scope() else {
        md.push_str("No search yet.\n");
        return md;
    };
    md.push_str(&format!("# Repositories matching \"{}\"\n\n", query));

    if search.status() != FlowStatus::Populated {
        md.push_str(&format!("**Status: {}**", status_label(search.status())));
        if let Some(error) = search.error() {
            md.push_str(&format!(" ({})", error));
        }
        md.push('\n');
        return md;
    }
    if search.items().is_empty() {
        md.push_str("No repositories found.\n");
    }

    for repo in search.items() {
        md.push_str(&format!("- [{}]({})", repo.label(), repo.html_url));
        if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
            md.push_str(&format!(": {}", description));
        }
        md.push('\n');

        if explorer.selection().is_selected(repo) {
            let contributors = explorer.contributors();
            match contributors.status() {
                FlowStatus::Populated => {
                    for contributor in contributors.items() {
                        md.push_str(&format!(
                            "  - [{}]({})\n",
                            contributor.login, contributor.html_url
                        ));
                    }
                    if let Some(page) = contributors.page() {
                        md.push_str(&format!("  - _contributors page {}_\n", pagination_bar(page)));
                    }
                }
                status => md.push_str(&format!("  - _contributors: {}_\n", status_label(status))),
            }
        }
    }

    if let Some(page) = search.page() {
        md.push_str(&format!("\nPage: `{}`\n", pagination_bar(page)));
    }
    md
}
