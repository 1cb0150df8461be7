//! SwingScore Runner: universe screening on top of `swingscore-core`.
//!
//! This crate provides:
//! - Universe files (sector → tickers)
//! - Price/news loading from flat files with a synthetic fallback
//! - The per-ticker screening pipeline, sequential or rayon-parallel
//! - Blacklist filtering and skip bookkeeping
//! - CSV and JSON export of screen results

pub mod data_loader;
pub mod export;
pub mod screen;
pub mod universe;

pub use data_loader::{
    dataset_hash, load_inputs, load_news, load_prices, synthetic_bars, LoadError, LoadOptions,
    NewsSnippets,
};
pub use export::{export_csv, export_json, import_json, write_report};
pub use screen::{
    screen, ScreenReport, ScreenRow, Screener, SkipReason, SkippedTicker, TickerInput,
};
pub use universe::Universe;
