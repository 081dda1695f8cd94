// In --json mode stdout carries one snapshot per line and nothing else.
// Status messages and logs always go to stderr.
#![deny(clippy::print_stdout)]

mod cli;
mod config;
mod interactive;
mod output;
mod viewport;

use std::io;
use std::sync::Arc;

use anyhow::Context;
use scrollsearch_client::HttpSearchTransport;
use scrollsearch_controller::SearchController;
use scrollsearch_controller::SearchHandle;
use scrollsearch_controller::SearchSnapshot;
use supports_color::Stream;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub use cli::Cli;
pub use cli::Color;
pub use config::CONFIG_TOML_FILE;
pub use config::Config;
pub use config::ConfigOverrides;
pub use config::ConfigToml;
pub use config::SCROLLSEARCH_HOME_ENV;
pub use config::find_scrollsearch_home;
pub use config::load_config_toml;
pub use viewport::TerminalViewport;

use crate::interactive::InteractiveCommand;
use crate::output::HumanOutput;
use crate::output::JsonOutput;
use crate::output::SnapshotWriter;

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        query,
        pages,
        interactive,
        json,
        base_url,
        debounce_ms,
        timeout_ms,
        color,
    } = cli;

    let (stdout_with_ansi, stderr_with_ansi) = match color {
        Color::Always => (true, true),
        Color::Never => (false, false),
        Color::Auto => (
            supports_color::on_cached(Stream::Stdout).is_some(),
            supports_color::on_cached(Stream::Stderr).is_some(),
        ),
    };

    let default_level = "warn";
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(stderr_with_ansi)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();

    let config = Config::load(ConfigOverrides {
        base_url,
        debounce_ms,
        request_timeout_ms: timeout_ms,
        initial_query: query,
    })
    .context("failed to load configuration")?;
    debug!(
        base_url = %config.base_url,
        debounce = ?config.controller.debounce,
        request_timeout = ?config.controller.request_timeout,
        "starting search"
    );

    let http = reqwest::Client::builder()
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
    let transport = Arc::new(
        HttpSearchTransport::new(http, config.base_url).with_user_agent(config.user_agent),
    );

    let (snapshot_tx, snapshots) = mpsc::unbounded_channel();
    let viewport = TerminalViewport::default();
    let handle = SearchController::spawn(
        config.controller,
        transport,
        viewport.clone(),
        move |snapshot: &SearchSnapshot| {
            let _ = snapshot_tx.send(snapshot.clone());
        },
    );

    let output: Box<dyn SnapshotWriter + Send> = if json {
        Box::new(JsonOutput::new(io::stdout()))
    } else {
        Box::new(HumanOutput::new(io::stdout(), stdout_with_ansi))
    };

    let result = if interactive {
        run_interactive(&handle, snapshots, &viewport, output).await
    } else {
        run_one_shot(snapshots, &viewport, output, pages).await
    };
    handle.shutdown().await;
    result
}

/// Loads up to `pages` pages of the initial query, scrolling to the end of
/// the list after each one.
async fn run_one_shot(
    mut snapshots: mpsc::UnboundedReceiver<SearchSnapshot>,
    viewport: &TerminalViewport,
    mut output: Box<dyn SnapshotWriter + Send>,
    pages: u32,
) -> anyhow::Result<()> {
    while let Some(snapshot) = snapshots.recv().await {
        output
            .write_snapshot(&snapshot)
            .context("failed to write results")?;
        if snapshot.loading {
            continue;
        }
        if snapshot.error {
            anyhow::bail!(
                "search for {:?} failed on page {}",
                snapshot.query,
                snapshot.page
            );
        }
        if !snapshot.has_more || snapshot.page >= pages || !viewport.scroll_to_end() {
            break;
        }
    }
    Ok(())
}

async fn run_interactive(
    handle: &SearchHandle,
    mut snapshots: mpsc::UnboundedReceiver<SearchSnapshot>,
    viewport: &TerminalViewport,
    mut output: Box<dyn SnapshotWriter + Send>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            snapshot = snapshots.recv() => {
                let Some(snapshot) = snapshot else {
                    break;
                };
                output
                    .write_snapshot(&snapshot)
                    .context("failed to write results")?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match InteractiveCommand::parse(&line) {
                    InteractiveCommand::Input(text) => handle.input(text),
                    InteractiveCommand::More => {
                        if !viewport.scroll_to_end() {
                            debug!("nothing to load while a page is loading or the list is empty");
                        }
                    }
                    InteractiveCommand::Retry => handle.retry(),
                    InteractiveCommand::Quit => break,
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
    Ok(())
}
