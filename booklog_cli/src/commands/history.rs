use anyhow::Result;
use booklog_lib::{ScrapeConfig, SearchHistory};
use clap::Args;

use crate::output::{
    print_history_csv, print_history_markdown, print_history_table, print_json, OutputFormat,
};

#[derive(Args)]
pub struct HistoryArgs {
    /// Number of entries to show, newest first
    #[arg(long, default_value = "10")]
    pub limit: usize,
}

pub fn run(args: &HistoryArgs, config: &ScrapeConfig, format: &OutputFormat) -> Result<()> {
    let entries = SearchHistory::new(&config.history_path).recent(args.limit);
    if entries.is_empty() && matches!(format, OutputFormat::Table | OutputFormat::Markdown) {
        eprintln!("No recent searches in {}", config.history_path.display());
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_history_table(&entries),
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Csv => print_history_csv(&entries)?,
        OutputFormat::Markdown => print_history_markdown(&entries),
    }
    Ok(())
}
