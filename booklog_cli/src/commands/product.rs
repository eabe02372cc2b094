use anyhow::Result;
use booklog_lib::validation;
use booklog_lib::ScrapeClient;
use clap::Args;

use crate::output::{
    print_json, print_products_csv, print_products_markdown, print_products_table, OutputFormat,
};

#[derive(Args)]
pub struct ProductArgs {
    /// Product page URL (e.g. https://www.amazon.com/dp/0441172717)
    pub url: String,
}

pub async fn run(args: &ProductArgs, client: &ScrapeClient, format: &OutputFormat) -> Result<()> {
    let url = validation::validate_url(&args.url)?;
    let record = client.scrape_product(&url).await?;

    match format {
        OutputFormat::Table => print_products_table(&[record]),
        OutputFormat::Json => print_json(&record),
        OutputFormat::Csv => print_products_csv(&[record])?,
        OutputFormat::Markdown => print_products_markdown(&[record]),
    }
    Ok(())
}
