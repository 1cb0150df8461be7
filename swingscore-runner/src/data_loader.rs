//! Price and news loading for the screener.
//!
//! Flat-file layout, one file per ticker:
//! - `<prices_dir>/<TICKER>.csv` with header `date,open,high,low,close,volume`
//! - `<news_dir>/<TICKER>.txt`, snippets separated by blank lines
//!
//! Fallback policy:
//! 1. If the price file exists → parse, sort, deduplicate
//! 2. If it doesn't and `synthetic` is set → generate synthetic bars (tagged)
//! 3. Otherwise → skip the ticker with a clear reason
//!
//! A missing news file is not an error: the ticker gets the synthetic
//! placeholder snippet, which the news scorer floors at the minimum certainty.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use swingscore_core::PriceBar;
use thiserror::Error;
use tracing::{debug, warn};

use crate::screen::{SkipReason, SkippedTicker, TickerInput};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse price CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse universe TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no usable price bars in {path}")]
    NoBars { path: PathBuf },
}

/// Where to find per-ticker files and what to do when they're missing.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub prices_dir: PathBuf,
    pub news_dir: PathBuf,
    /// Generate synthetic bars when no price file exists.
    pub synthetic: bool,
    /// Bars generated per synthetic ticker.
    pub synthetic_bars: usize,
    /// Snippet substituted for a missing news file.
    pub news_placeholder: String,
}

/// News text for one ticker, with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsSnippets {
    pub snippets: Vec<String>,
    /// True when the placeholder was substituted for a missing file.
    pub placeholder: bool,
}

fn ticker_file(dir: &Path, ticker: &str, ext: &str) -> PathBuf {
    dir.join(format!("{ticker}.{ext}"))
}

/// Load `<dir>/<TICKER>.csv`.
///
/// Rows are sorted by date; for duplicate dates the last row wins. Rows
/// with NaN or inconsistent prices are dropped.
pub fn load_prices(dir: &Path, ticker: &str) -> Result<Vec<PriceBar>, LoadError> {
    let path = ticker_file(dir, ticker, "csv");
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(|source| LoadError::Csv {
            path: path.clone(),
            source,
        })?;

    let mut by_date: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
    let mut dropped = 0usize;
    for record in reader.deserialize::<PriceBar>() {
        let bar = record.map_err(|source| LoadError::Csv {
            path: path.clone(),
            source,
        })?;
        if bar.is_sane() {
            by_date.insert(bar.date, bar);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!(ticker, dropped, "dropped malformed price rows");
    }
    if by_date.is_empty() {
        return Err(LoadError::NoBars { path });
    }
    Ok(by_date.into_values().collect())
}

/// Load `<dir>/<TICKER>.txt` split into snippets on blank lines.
pub fn load_news(dir: &Path, ticker: &str, placeholder: &str) -> Result<NewsSnippets, LoadError> {
    let path = ticker_file(dir, ticker, "txt");
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(ticker, "no news file, using placeholder");
            return Ok(NewsSnippets {
                snippets: vec![placeholder.to_string()],
                placeholder: true,
            });
        }
        Err(source) => return Err(LoadError::Io { path, source }),
    };

    let snippets = split_snippets(&content);
    Ok(NewsSnippets {
        snippets,
        placeholder: false,
    })
}

fn split_snippets(content: &str) -> Vec<String> {
    let mut snippets = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                snippets.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        snippets.push(current.join("\n"));
    }
    snippets
}

/// Generate synthetic bars for testing/development.
///
/// A weekday random walk from 100.0 seeded by the BLAKE3 hash of the ticker,
/// so the same ticker always gets the same series. Clearly fake; results
/// built on it are tagged.
pub fn synthetic_bars(ticker: &str, n: usize) -> Vec<PriceBar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0_f64;
    let mut current = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default();

    while bars.len() < n {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(PriceBar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}

/// BLAKE3 over every bar, for tagging which data a screen ran on.
pub fn dataset_hash(bars: &[PriceBar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Load prices and news for every ticker. Tickers whose data cannot be
/// loaded are returned as skipped rather than failing the batch.
pub fn load_inputs(tickers: &[String], opts: &LoadOptions) -> (Vec<TickerInput>, Vec<SkippedTicker>) {
    let mut inputs = Vec::with_capacity(tickers.len());
    let mut skipped = Vec::new();

    for ticker in tickers {
        let price_path = ticker_file(&opts.prices_dir, ticker, "csv");
        let (bars, synthetic_prices) = if price_path.exists() || !opts.synthetic {
            match load_prices(&opts.prices_dir, ticker) {
                Ok(bars) => (bars, false),
                Err(e) => {
                    warn!(ticker = ticker.as_str(), error = %e, "skipping ticker: price load failed");
                    skipped.push(SkippedTicker {
                        ticker: ticker.clone(),
                        reason: SkipReason::LoadFailed(e.to_string()),
                    });
                    continue;
                }
            }
        } else {
            warn!(
                ticker = ticker.as_str(),
                "generating synthetic prices, results will be tagged as synthetic"
            );
            (synthetic_bars(ticker, opts.synthetic_bars), true)
        };

        let news = match load_news(&opts.news_dir, ticker, &opts.news_placeholder) {
            Ok(news) => news,
            Err(e) => {
                warn!(ticker = ticker.as_str(), error = %e, "news unreadable, using placeholder");
                NewsSnippets {
                    snippets: vec![opts.news_placeholder.clone()],
                    placeholder: true,
                }
            }
        };

        debug!(
            ticker = ticker.as_str(),
            bars = bars.len(),
            dataset = %dataset_hash(&bars),
            "loaded inputs"
        );
        inputs.push(TickerInput {
            ticker: ticker.clone(),
            bars,
            news: news.snippets,
            synthetic_prices,
            placeholder_news: news.placeholder,
        });
    }

    (inputs, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippets_split_on_blank_lines() {
        let s = split_snippets("Headline one\nbody line\n\n\n  \nHeadline two  \n");
        assert_eq!(s, vec!["Headline one\nbody line", "Headline two"]);
        assert!(split_snippets("\n\n").is_empty());
    }

    #[test]
    fn synthetic_bars_are_deterministic_and_sane() {
        let a = synthetic_bars("RELIANCE", 120);
        let b = synthetic_bars("RELIANCE", 120);
        let c = synthetic_bars("TCS", 120);
        assert_eq!(a.len(), 120);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(PriceBar::is_sane));
        assert!(a.windows(2).all(|w| w[0].date < w[1].date));
        assert!(a
            .iter()
            .all(|bar| !matches!(bar.date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)));
    }

    #[test]
    fn dataset_hash_tracks_content() {
        let bars = synthetic_bars("ABC", 10);
        let mut changed = bars.clone();
        changed[3].close += 0.01;
        assert_eq!(dataset_hash(&bars), dataset_hash(&bars.clone()));
        assert_ne!(dataset_hash(&bars), dataset_hash(&changed));
    }
}
