//! NewsCertaintyScorer: catalyst, sentiment, deal value and certainty from
//! raw news text.
//!
//! Scoring never fails. Empty or junk input produces a neutral result at
//! the base certainty.

pub mod amount;
pub mod certainty;
pub mod lexicon;
pub mod matchers;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use amount::{Currency, DealAmount, FxRates, Magnitude};
pub use certainty::{CertaintyBreakdown, CertaintyWeights, TokenCounts};
pub use matchers::{CatalystDetection, CatalystMatch, CatalystMatcher, KeywordMatcher};

/// Literal the runner substitutes when no news was collected for a ticker.
pub const DEFAULT_SYNTHETIC_MARKER: &str = "[SYNTHETIC] no news collected";

/// Catalyst categories. Declaration order is the tie-break priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CatalystType {
    Earnings,
    Acquisition,
    Ipo,
    Investment,
    Expansion,
    Contract,
    Strategic,
    Regulatory,
    Dividend,
    Product,
    #[default]
    None,
}

impl CatalystType {
    /// Every real category, highest priority first.
    pub const PRIORITY: [CatalystType; 10] = [
        CatalystType::Earnings,
        CatalystType::Acquisition,
        CatalystType::Ipo,
        CatalystType::Investment,
        CatalystType::Expansion,
        CatalystType::Contract,
        CatalystType::Strategic,
        CatalystType::Regulatory,
        CatalystType::Dividend,
        CatalystType::Product,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CatalystType::Earnings => "earnings",
            CatalystType::Acquisition => "acquisition",
            CatalystType::Ipo => "ipo",
            CatalystType::Investment => "investment",
            CatalystType::Expansion => "expansion",
            CatalystType::Contract => "contract",
            CatalystType::Strategic => "strategic",
            CatalystType::Regulatory => "regulatory",
            CatalystType::Dividend => "dividend",
            CatalystType::Product => "product",
            CatalystType::None => "none",
        }
    }
}

impl fmt::Display for CatalystType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalystType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::PRIORITY
            .iter()
            .copied()
            .chain(std::iter::once(CatalystType::None))
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| format!("unknown catalyst type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    fn from_counts(positive: usize, negative: usize) -> Self {
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

/// News-derived signals for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsMetrics {
    pub ticker: String,
    pub catalyst_type: CatalystType,
    /// Mentions of the winning catalyst category.
    pub catalyst_count: usize,
    /// Largest parsed amount, in crore of local currency.
    pub deal_value_local_currency: f64,
    pub sentiment: Sentiment,
    /// In [20, 100].
    pub certainty: f64,
}

impl NewsMetrics {
    /// What scoring returns for a ticker with no text at all.
    pub fn neutral(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            catalyst_type: CatalystType::None,
            catalyst_count: 0,
            deal_value_local_currency: 0.0,
            sentiment: Sentiment::Neutral,
            certainty: CertaintyWeights::default().base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Placeholder phrases, matched case-insensitively anywhere in the text.
    pub synthetic_markers: Vec<String>,
    pub fx: FxRates,
    pub certainty: CertaintyWeights,
    /// Additional keywords per category name, checked after the built-ins.
    pub extra_keywords: BTreeMap<String, Vec<String>>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            synthetic_markers: vec![DEFAULT_SYNTHETIC_MARKER.to_string()],
            fx: FxRates::default(),
            certainty: CertaintyWeights::default(),
            extra_keywords: BTreeMap::new(),
        }
    }
}

/// Full scoring output, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsAssessment {
    pub metrics: NewsMetrics,
    pub breakdown: CertaintyBreakdown,
    pub matches: Vec<CatalystMatch>,
    pub amounts: Vec<DealAmount>,
}

pub struct NewsCertaintyScorer {
    config: NewsConfig,
    matchers: Vec<Box<dyn CatalystMatcher>>,
    markers: Vec<String>,
}

impl fmt::Debug for NewsCertaintyScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsCertaintyScorer")
            .field("config", &self.config)
            .field("matchers", &self.matchers.len())
            .finish()
    }
}

impl Default for NewsCertaintyScorer {
    fn default() -> Self {
        Self::new(NewsConfig::default())
    }
}

impl NewsCertaintyScorer {
    /// Build the scorer with the built-in matchers plus any configured extra
    /// keywords. Extra groups naming an unknown category are ignored here;
    /// `ScreenConfig::validate` rejects them up front.
    pub fn new(config: NewsConfig) -> Self {
        let mut matchers = matchers::default_matchers();
        for (name, words) in &config.extra_keywords {
            let Ok(category) = name.parse::<CatalystType>() else {
                continue;
            };
            if category == CatalystType::None {
                continue;
            }
            if let Ok(m) = KeywordMatcher::new(category, words, matchers::CUSTOM_KEYWORD_CONFIDENCE) {
                matchers.push(Box::new(m));
            }
        }
        let markers = config
            .synthetic_markers
            .iter()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        Self {
            config,
            matchers,
            markers,
        }
    }

    /// Append a matcher after the existing ones.
    pub fn with_matcher(mut self, matcher: Box<dyn CatalystMatcher>) -> Self {
        self.matchers.push(matcher);
        self
    }

    pub fn config(&self) -> &NewsConfig {
        &self.config
    }

    pub fn is_synthetic(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.markers.iter().any(|m| lowered.contains(m.as_str()))
    }

    pub fn assess<S: AsRef<str>>(&self, texts: &[S], ticker: &str) -> NewsAssessment {
        let text = normalize(texts);
        let detection = matchers::detect(&self.matchers, &text);
        let amounts = amount::parse_amounts(&text, &self.config.fx);
        let synthetic = self.is_synthetic(&text);
        let breakdown = certainty::score(
            &text,
            &detection,
            &amounts,
            synthetic,
            &self.config.certainty,
        );
        let sentiment = Sentiment::from_counts(
            lexicon::count_matches(&lexicon::POSITIVE, &text),
            lexicon::count_matches(&lexicon::NEGATIVE, &text),
        );

        let metrics = NewsMetrics {
            ticker: ticker.to_string(),
            catalyst_type: detection.category,
            catalyst_count: detection.mentions,
            deal_value_local_currency: amount::largest_local_crore(&amounts),
            sentiment,
            certainty: breakdown.certainty,
        };
        NewsAssessment {
            metrics,
            breakdown,
            matches: detection.matches,
            amounts,
        }
    }

    pub fn score_breakdown<S: AsRef<str>>(&self, texts: &[S], ticker: &str) -> CertaintyBreakdown {
        self.assess(texts, ticker).breakdown
    }

    pub fn score<S: AsRef<str>>(&self, texts: &[S], ticker: &str) -> NewsMetrics {
        self.assess(texts, ticker).metrics
    }
}

/// Join snippets on newlines and blank out control characters.
fn normalize<S: AsRef<str>>(texts: &[S]) -> String {
    let mut joined = String::new();
    for (i, t) in texts.iter().enumerate() {
        if i > 0 {
            joined.push('\n');
        }
        joined.extend(t.as_ref().chars().map(|c| {
            if c.is_control() && c != '\n' && c != '\t' {
                ' '
            } else {
                c
            }
        }));
    }
    joined
}
