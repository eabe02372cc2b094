use anyhow::Result;
use booklog_lib::validation;
use booklog_lib::{
    BookLink, EmojiSuggester, ScrapeClient, ScrapeConfig, SearchEntry, SearchHistory, StoreType,
};
use clap::Args;

use crate::output::{
    print_json, print_lookups_csv, print_lookups_markdown, print_lookups_table, LookupResult,
    OutputFormat,
};

#[derive(Args)]
pub struct LookupArgs {
    /// Book title, optionally with the author
    pub query: String,

    /// Preferred store: amazon, goodreads, barnesnoble (bn), bookshop
    #[arg(long)]
    pub store: Option<String>,

    /// Skip the emoji suggestion
    #[arg(long)]
    pub no_emoji: bool,

    /// Do not add the result to the recent-searches log
    #[arg(long)]
    pub no_history: bool,
}

pub async fn run(
    args: &LookupArgs,
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
    tracing::info!("found {} link: {}", link.store_type, link.url);
    if let Some(notice) = non_amazon_notice(&link) {
        eprintln!("{}", notice);
    }

    let product = client.scrape_product(&link.url).await?;

    let emoji = if args.no_emoji {
        None
    } else {
        Some(
            EmojiSuggester::from_env()
                .suggest(&product.title, &product.description)
                .await,
        )
    };

    if !args.no_history {
        SearchHistory::new(&config.history_path).record(&SearchEntry::new(&query, store, &link));
    }

    let result = LookupResult {
        link,
        product,
        emoji,
    };
    match format {
        OutputFormat::Table => print_lookups_table(&[result]),
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => print_lookups_csv(&[result])?,
        OutputFormat::Markdown => print_lookups_markdown(&[result]),
    }
    Ok(())
}

/// Product pages are scraped with Amazon rules only.
fn non_amazon_notice(link: &BookLink) -> Option<String> {
    if link.store_type == StoreType::Amazon {
        return None;
    }
    Some(format!(
        "Note: best link is on {}; product details are read with Amazon page rules and may come back as \"Not found\".",
        link.store_type
    ))
}
