use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use logwatch::{App, Page, Settings, ThemeChoice};

#[derive(Parser, Debug)]
#[command(name = "logwatch")]
#[command(about = "Console for a log-analytics backend")]
struct Args {
    /// Page to fetch
    #[arg(value_enum, default_value_t = Page::Dashboard)]
    page: Page,

    /// Settings file (defaults to ./logwatch.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(short, long)]
    base_url: Option<String>,

    /// Rows per page for logs and recent errors
    #[arg(long)]
    page_size: Option<u32>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Export the page state to a JSON file instead of printing it
    #[arg(short, long)]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        settings.api_base_url = base_url;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    settings.validate()?;

    let client = settings.client()?;
    info!(base_url = %client.base_url(), page = args.page.label(), "starting");

    let theme = settings.theme.resolve();
    let mut app = App::new(Arc::new(client), settings, theme);
    app.open(args.page);
    app.settled().await;

    if let Some(export_path) = args.export {
        app.export_state(&export_path)
            .with_context(|| format!("failed to export to {}", export_path.display()))?;
        println!("Exported state to {}", export_path.display());
        return Ok(());
    }

    let snapshot = app.snapshot().context("no page open")?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    app.quit();
    Ok(())
}
