mod app;
mod command;
mod config;
mod explorer;
mod github;
mod view;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use github::mock::MockGitHub;
use github::{GitHubApi, GitHubClient};

/// repo-scout: search GitHub repositories by name and browse their
/// contributors page by page.
///
/// With a QUERY it searches once, prints the result and exits; without one it
/// starts an interactive prompt.
#[derive(Parser, Debug)]
#[command(name = "repo-scout", version, about)]
struct Cli {
    /// Repository name to search for (omit for interactive mode)
    query: Option<String>,

    /// Results page to show in one-shot mode
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,

    /// Show contributors of the N-th repository on the page (one-shot mode)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    open: Option<u64>,

    /// Write a Markdown snapshot to this file instead of the terminal
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the one-shot result as JSON
    #[arg(long)]
    json: bool,

    /// Config file (defaults to ./.repo-scout.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve synthetic data instead of calling GitHub (no token needed)
    #[arg(long)]
    r#mock: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load(cli.config.as_deref())?;
    debug!(
        api_url = %config.api_url(),
        per_page = config.per_page(),
        discard_stale = config.session.discard_stale_responses,
        "configuration loaded"
    );

    let api: Arc<dyn GitHubApi> = if cli.r#mock {
        info!("using mock GitHub data");
        Arc::new(MockGitHub::new(config.per_page()))
    } else {
        Arc::new(GitHubClient::new(&config))
    };

    let mut explorer = explorer::Explorer::new(config.session.discard_stale_responses);

    match cli.query {
        Some(query) => {
            let _span = info_span!("one_shot", query = %query, page = cli.page).entered();
            let format = if cli.json {
                view::Format::Json
            } else if cli.output.is_some() {
                view::Format::Markdown
            } else {
                view::Format::Terminal
            };
            let job = app::OneShot {
                query,
                page: cli.page,
                open: cli.open.map(|n| n as usize),
            };
            app::run_once(
                &mut explorer,
                api.as_ref(),
                &job,
                format,
                cli.output.as_deref(),
            )
            .await?;
        }
        None => {
            info!("starting interactive session");
            app::run_interactive(&mut explorer, api).await?;
        }
    }

    Ok(())
}
