//! gh-notify CLI

use std::io;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use gh_notify::actions::ensure_binary;
use gh_notify::{
    present, tui, Cli, FileCache, FixSuggestion, GitHubClient, NotificationFetcher, NotifyConfig,
    NotifyError, Presentation,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let fix = e
            .downcast_ref::<NotifyError>()
            .and_then(|e| e.fix_suggestion());
        match fix {
            Some(fix) => eprintln!("{} {} ({})", "ERROR:".red().bold(), e, fix),
            None => eprintln!("{} {}", "ERROR:".red().bold(), e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Flag conflicts fail before config, network or helper checks
    cli.validate()?;

    let config = NotifyConfig::load()?;
    init_tracing(&config);

    ensure_binary("gh")?;
    let api = GitHubClient::from_gh(&config.api_url)?;
    let cache = FileCache::from_config(&config);
    tracing::debug!(
        api = %config.api_url,
        cache = %cache.dir().display(),
        enabled = cache.is_enabled(),
        "starting"
    );
    let fetcher = NotificationFetcher::new(Arc::new(api), Arc::new(cache));

    let presentation = present(&cli, &fetcher, &mut io::stdout().lock()).await?;
    match presentation {
        Presentation::Done => Ok(()),
        Presentation::Interactive(records) => {
            tui::run(fetcher, cli.fetch_options(), records, &config, cli.preview).await
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the configured level
fn init_tracing(config: &NotifyConfig) {
    let default = if config.debug {
        "warn,gh_notify=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
