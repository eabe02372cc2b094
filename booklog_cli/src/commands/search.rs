use anyhow::Result;
use booklog_lib::validation;
use booklog_lib::{ScrapeClient, ScrapeConfig, SearchEntry, SearchHistory};
use clap::Args;

use crate::output::{
    print_json, print_links_csv, print_links_markdown, print_links_table, OutputFormat,
};

#[derive(Args)]
pub struct SearchArgs {
    /// Book title, optionally with the author
    pub query: String,

    /// Preferred store: amazon, goodreads, barnesnoble (bn), bookshop
    #[arg(long)]
    pub store: Option<String>,

    /// Do not add the result to the recent-searches log
    #[arg(long)]
    pub no_history: bool,
}

pub async fn run(
    args: &SearchArgs,
    client: &ScrapeClient,
    config: &ScrapeConfig,
    format: &OutputFormat,
) -> Result<()> {
    let query = validation::validate_query(&args.query)?;
    let store = args
        .store
        .as_deref()
        .map(validation::validate_store)
        .transpose()?;

    let link = client.search_for_book_link(&query, store).await?;
    if let Some(wanted) = store {
        if link.store_type != wanted {
            eprintln!(
                "No {} result found, showing {} instead.",
                wanted, link.store_type
            );
        }
    }

    if !args.no_history {
        SearchHistory::new(&config.history_path).record(&SearchEntry::new(&query, store, &link));
    }

    match format {
        OutputFormat::Table => print_links_table(&[link]),
        OutputFormat::Json => print_json(&link),
        OutputFormat::Csv => print_links_csv(&[link])?,
        OutputFormat::Markdown => print_links_markdown(&[link]),
    }
    Ok(())
}
