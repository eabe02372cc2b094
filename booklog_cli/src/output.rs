use anyhow::Result;
use booklog_lib::{BookLink, ProductRecord, SearchEntry};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Descriptions longer than this are cut in table and markdown output.
const TABLE_DESCRIPTION_CHARS: usize = 80;

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

/// Everything `lookup` found for one book.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub link: BookLink,
    pub product: ProductRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<[String; 2]>,
}

#[derive(Tabled, Serialize)]
struct ProductRow {
    #[tabled(rename = "ASIN")]
    #[serde(rename = "ASIN")]
    asin: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    #[serde(rename = "Author")]
    author: String,
    #[tabled(rename = "Year")]
    #[serde(rename = "Year")]
    year: String,
    #[tabled(rename = "Pages")]
    #[serde(rename = "Pages")]
    pages: String,
    #[tabled(rename = "Description")]
    #[serde(rename = "Description")]
    description: String,
}

#[derive(Tabled, Serialize)]
struct LinkRow {
    #[tabled(rename = "Store")]
    #[serde(rename = "Store")]
    store: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "URL")]
    #[serde(rename = "URL")]
    url: String,
}

#[derive(Tabled, Serialize)]
struct LookupRow {
    #[tabled(rename = "Emoji")]
    #[serde(rename = "Emoji")]
    emoji: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    #[serde(rename = "Author")]
    author: String,
    #[tabled(rename = "Year")]
    #[serde(rename = "Year")]
    year: String,
    #[tabled(rename = "Pages")]
    #[serde(rename = "Pages")]
    pages: String,
    #[tabled(rename = "Store")]
    #[serde(rename = "Store")]
    store: String,
    #[tabled(rename = "URL")]
    #[serde(rename = "URL")]
    url: String,
}

#[derive(Tabled, Serialize)]
struct HistoryRow {
    #[tabled(rename = "When")]
    #[serde(rename = "When")]
    when: String,
    #[tabled(rename = "Query")]
    #[serde(rename = "Query")]
    query: String,
    #[tabled(rename = "Wanted")]
    #[serde(rename = "Wanted")]
    wanted: String,
    #[tabled(rename = "Store")]
    #[serde(rename = "Store")]
    store: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "URL")]
    #[serde(rename = "URL")]
    url: String,
}

#[derive(Tabled, Serialize)]
struct EmojiRow {
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Emoji")]
    #[serde(rename = "Emoji")]
    emoji: String,
}

// -- Row builders --

fn build_product_rows(products: &[ProductRecord], shorten: bool) -> Vec<ProductRow> {
    products
        .iter()
        .map(|p| ProductRow {
            asin: p.asin.clone(),
            title: p.title.clone(),
            author: p.author.clone(),
            year: p.year_published.clone(),
            pages: p.page_length.clone(),
            description: if shorten {
                truncate(&p.description, TABLE_DESCRIPTION_CHARS)
            } else {
                p.description.clone()
            },
        })
        .collect()
}

fn build_link_rows(links: &[BookLink]) -> Vec<LinkRow> {
    links
        .iter()
        .map(|l| LinkRow {
            store: l.store_type.to_string(),
            title: l.title.clone(),
            url: l.url.clone(),
        })
        .collect()
}

fn build_lookup_rows(results: &[LookupResult]) -> Vec<LookupRow> {
    results
        .iter()
        .map(|r| LookupRow {
            emoji: r.emoji.as_ref().map(|e| e.join(" ")).unwrap_or_default(),
            title: r.product.title.clone(),
            author: r.product.author.clone(),
            year: r.product.year_published.clone(),
            pages: r.product.page_length.clone(),
            store: r.link.store_type.to_string(),
            url: r.product.source_url.clone(),
        })
        .collect()
}

fn build_history_rows(entries: &[SearchEntry]) -> Vec<HistoryRow> {
    entries
        .iter()
        .map(|e| HistoryRow {
            when: e.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            query: e.query.clone(),
            wanted: e.store.map(|s| s.to_string()).unwrap_or_else(|| "any".to_string()),
            store: e.store_type.to_string(),
            title: e.title.clone(),
            url: e.url.clone(),
        })
        .collect()
}

fn build_emoji_row(title: &str, emoji: &[String; 2]) -> EmojiRow {
    EmojiRow {
        title: title.to_string(),
        emoji: emoji.join(" "),
    }
}

// -- Table output --

pub fn print_products_table(products: &[ProductRecord]) {
    println!("{}", Table::new(build_product_rows(products, true)));
}

pub fn print_links_table(links: &[BookLink]) {
    println!("{}", Table::new(build_link_rows(links)));
}

pub fn print_lookups_table(results: &[LookupResult]) {
    println!("{}", Table::new(build_lookup_rows(results)));
}

pub fn print_history_table(entries: &[SearchEntry]) {
    println!("{}", Table::new(build_history_rows(entries)));
}

pub fn print_emoji_table(title: &str, emoji: &[String; 2]) {
    println!("{}", Table::new([build_emoji_row(title, emoji)]));
}

// -- Markdown output --

pub fn print_products_markdown(products: &[ProductRecord]) {
    let mut table = Table::new(build_product_rows(products, true));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_links_markdown(links: &[BookLink]) {
    let mut table = Table::new(build_link_rows(links));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_lookups_markdown(results: &[LookupResult]) {
    let mut table = Table::new(build_lookup_rows(results));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_history_markdown(entries: &[SearchEntry]) {
    let mut table = Table::new(build_history_rows(entries));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_emoji_markdown(title: &str, emoji: &[String; 2]) {
    let mut table = Table::new([build_emoji_row(title, emoji)]);
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

fn write_csv<R: Serialize>(rows: Vec<R>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_products_csv(products: &[ProductRecord]) -> Result<()> {
    write_csv(build_product_rows(products, false))
}

pub fn print_links_csv(links: &[BookLink]) -> Result<()> {
    write_csv(build_link_rows(links))
}

pub fn print_lookups_csv(results: &[LookupResult]) -> Result<()> {
    write_csv(build_lookup_rows(results))
}

pub fn print_history_csv(entries: &[SearchEntry]) -> Result<()> {
    write_csv(build_history_rows(entries))
}

pub fn print_emoji_csv(title: &str, emoji: &[String; 2]) -> Result<()> {
    write_csv(vec![build_emoji_row(title, emoji)])
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Cuts `s` to at most `max` characters, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
