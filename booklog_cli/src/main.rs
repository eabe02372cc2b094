mod commands;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use booklog_lib::{ScrapeClient, ScrapeConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "booklog")]
#[command(about = "Find books online and pull their details for a reading log")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Page load timeout in seconds (overrides BOOKLOG_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Search endpoint (overrides BOOKLOG_SEARCH_URL)
    #[arg(long, global = true)]
    search_url: Option<String>,

    /// Render pages in headless Chrome (needs the `headless` feature)
    #[arg(long, global = true)]
    headless: bool,

    /// Recent-searches log file (overrides BOOKLOG_HISTORY_PATH)
    #[arg(long, global = true)]
    history_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a product page
    Product(commands::product::ProductArgs),
    /// Find a retailer link for a book
    Search(commands::search::SearchArgs),
    /// Search, scrape the result, and suggest emoji
    ///
    /// Product details are read with Amazon page rules; links to other
    /// stores mostly come back as "Not found".
    Lookup(commands::lookup::LookupArgs),
    /// Suggest two emoji for a book
    Emoji(commands::emoji::EmojiArgs),
    /// Show recent searches
    History(commands::history::HistoryArgs),
}

impl Cli {
    fn scrape_config(&self) -> ScrapeConfig {
        let mut config = ScrapeConfig::from_env();
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(url) = &self.search_url {
            config.search_url = url.clone();
        }
        if self.headless {
            config.headless = true;
        }
        if let Some(path) = &self.history_path {
            config.history_path = path.clone();
        }
        config
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("booklog=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let json = std::env::var("BOOKLOG_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "md" | "markdown" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let config = cli.scrape_config();
    let client = ScrapeClient::with_config(config.clone());

    match &cli.command {
        Commands::Product(args) => commands::product::run(args, &client, &format).await?,
        Commands::Search(args) => commands::search::run(args, &client, &config, &format).await?,
        Commands::Lookup(args) => commands::lookup::run(args, &client, &config, &format).await?,
        Commands::Emoji(args) => commands::emoji::run(args, &format).await?,
        Commands::History(args) => commands::history::run(args, &config, &format)?,
    }

    Ok(())
}
