//! CLI subcommand implementations.

pub mod emoji;
pub mod history;
pub mod lookup;
pub mod product;
pub mod search;
