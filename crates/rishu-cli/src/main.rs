use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rishu_client::RecommendClient;
use rishu_core::{present, Provider, QueryController, QueryInput, ResultView, RishuConfig};

/// rishu — course registration recommender.
///
/// Describe what you want to study; the recommendation service searches the
/// course catalogue and an AI model explains which courses fit.
#[derive(Parser, Debug)]
#[command(name = "rishu", version, about)]
struct Cli {
    /// Interests to ask about (can also be typed in the TUI).
    #[arg(short, long)]
    query: Option<String>,

    /// AI model that writes the recommendation comment.
    #[arg(short, long, value_enum)]
    provider: Option<ProviderArg>,

    /// Base URL of the recommendation service (overrides the config file).
    #[arg(long)]
    backend_url: Option<String>,

    /// Config file to use instead of ~/.config/rishu/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Submit the query once, print the result and exit without the TUI.
    #[arg(long, requires = "query")]
    once: bool,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderArg {
    Local,
    Gemini,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Local => Provider::Local,
            ProviderArg::Gemini => Provider::Gemini,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Load config.
    let loaded = match &cli.config {
        Some(path) => RishuConfig::load_from(path),
        None => RishuConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
        RishuConfig::default()
    });
    if let Some(url) = cli.backend_url.clone() {
        config.backend.base_url = url;
    }

    tracing::info!(
        backend = %config.backend.base_url,
        "Starting rishu v{}",
        env!("CARGO_PKG_VERSION")
    );

    let provider = cli
        .provider
        .map(Provider::from)
        .unwrap_or(config.query.default_provider);
    let input = QueryInput::new(cli.query.clone().unwrap_or_default(), provider);
    let client = RecommendClient::from_config(&config.backend);

    if cli.once {
        let ok = run_once(&input, &client).await?;
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut app = rishu_tui::App::new(client, input);
    app.run().await?;

    tracing::info!("rishu exited cleanly");
    Ok(())
}

/// Log to a file to avoid corrupting the TUI output. If the log file
/// can't be opened, silently discard logs rather than polluting the
/// alternate screen buffer.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rishu");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("rishu.log"));

    match log_file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
                )
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .with_writer(std::io::sink)
                .init();
        }
    }
}

/// Submit once and print the result. Returns whether a result was shown.
async fn run_once(input: &QueryInput, client: &RecommendClient) -> Result<bool> {
    let mut controller = QueryController::new();
    if !controller.submit(input, client).await {
        eprintln!("Nothing to submit: the query is empty.");
        return Ok(false);
    }

    let view = present(controller.status());
    match &view {
        ResultView::Error(_) => {
            eprint!("{}", view.to_plain_text());
            Ok(false)
        }
        _ => {
            print!("{}", view.to_plain_text());
            Ok(true)
        }
    }
}
