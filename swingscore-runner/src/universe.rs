//! Universe configuration: sector-organized ticker lists.
//!
//! ```toml
//! [sectors]
//! Energy = ["RELIANCE", "ONGC"]
//! Banks = ["HDFCBANK", "ICICIBANK"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::data_loader::LoadError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(content)?)
    }

    /// Build a single-sector universe from an ad hoc ticker list.
    pub fn from_tickers<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sectors = BTreeMap::new();
        sectors.insert(
            "Custom".to_string(),
            tickers.into_iter().map(Into::into).collect(),
        );
        Self { sectors }
    }

    /// All tickers in sector order, trimmed, uppercased, and deduplicated
    /// (a ticker listed under two sectors appears once).
    pub fn all_tickers(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.sectors
            .values()
            .flatten()
            .map(|t| t.trim().to_ascii_uppercase())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect()
    }

    /// Sector a ticker is listed under, first sector in name order for duplicates.
    pub fn sector_of(&self, ticker: &str) -> Option<&str> {
        self.sectors
            .iter()
            .find(|(_, tickers)| tickers.iter().any(|t| t.trim().eq_ignore_ascii_case(ticker)))
            .map(|(name, _)| name.as_str())
    }
}
