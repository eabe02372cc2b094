use anyhow::Result;
use booklog_lib::validation;
use booklog_lib::EmojiSuggester;
use clap::Args;
use serde_json::json;

use crate::output::{
    print_emoji_csv, print_emoji_markdown, print_emoji_table, print_json, OutputFormat,
};

const MAX_DESCRIPTION_LENGTH: usize = 4000;

#[derive(Args)]
pub struct EmojiArgs {
    /// Book title
    pub title: String,

    /// Short description or blurb
    #[arg(long, default_value = "")]
    pub description: String,
}

pub async fn run(args: &EmojiArgs, format: &OutputFormat) -> Result<()> {
    let title = validation::validate_query(&args.title)?;
    let description = if args.description.trim().is_empty() {
        String::new()
    } else {
        validation::sanitize_text(&args.description, MAX_DESCRIPTION_LENGTH)?
    };

    let emoji = EmojiSuggester::from_env().suggest(&title, &description).await;

    match format {
        OutputFormat::Table => print_emoji_table(&title, &emoji),
        OutputFormat::Json => print_json(&json!({ "title": title, "emoji": emoji })),
        OutputFormat::Csv => print_emoji_csv(&title, &emoji)?,
        OutputFormat::Markdown => print_emoji_markdown(&title, &emoji),
    }
    Ok(())
}
