//! Catalyst matchers.
//!
//! Each matcher owns one catalyst category and reports every span of a text
//! that mentions it. Detection runs all matchers independently and then
//! picks the category with the most mentions; ties go to the category that
//! comes first in [`CatalystType::PRIORITY`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

use super::CatalystType;

/// One mention of a catalyst category in a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalystMatch {
    pub category: CatalystType,
    /// How specific the matched phrase is, in (0, 1].
    pub confidence: f64,
    /// Byte range of the match in the scored text.
    pub matched_span: Range<usize>,
}

/// A source of catalyst mentions for a single category.
pub trait CatalystMatcher: Send + Sync {
    fn category(&self) -> CatalystType;

    /// All mentions of this matcher's category in `text`, in order.
    fn find(&self, text: &str) -> Vec<CatalystMatch>;
}

/// Case-insensitive whole-word keyword matcher.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    category: CatalystType,
    confidence: f64,
    pattern: Regex,
}

impl KeywordMatcher {
    /// Build a matcher from literal keywords. Spaces inside a keyword match
    /// any run of whitespace.
    pub fn new<S: AsRef<str>>(
        category: CatalystType,
        keywords: &[S],
        confidence: f64,
    ) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(|k| {
                k.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();
        // An empty alternation would match everywhere; use a pattern that never matches.
        let pattern = if alternatives.is_empty() {
            r"[^\s\S]".to_string()
        } else {
            format!(r"(?i)\b(?:{})\b", alternatives.join("|"))
        };
        Ok(Self {
            category,
            confidence: confidence.clamp(0.0, 1.0),
            pattern: Regex::new(&pattern)?,
        })
    }
}

impl CatalystMatcher for KeywordMatcher {
    fn category(&self) -> CatalystType {
        self.category
    }

    fn find(&self, text: &str) -> Vec<CatalystMatch> {
        self.pattern
            .find_iter(text)
            .map(|m| CatalystMatch {
                category: self.category,
                confidence: self.confidence,
                matched_span: m.range(),
            })
            .collect()
    }
}

/// Built-in keyword groups: (category, specific phrases, generic words).
const KEYWORD_GROUPS: &[(CatalystType, &[&str], &[&str])] = &[
    (
        CatalystType::Earnings,
        &["quarterly results", "net profit", "profit after tax", "earnings per share"],
        &["earnings", "results", "revenue", "ebitda", "eps"],
    ),
    (
        CatalystType::Acquisition,
        &["definitive agreement", "open offer", "controlling stake"],
        &["acquisition", "acquire", "acquires", "acquiring", "merger", "merge", "takeover", "buyout", "amalgamation"],
    ),
    (
        CatalystType::Ipo,
        &["initial public offering", "public issue", "draft red herring"],
        &["ipo", "listing", "debut"],
    ),
    (
        CatalystType::Investment,
        &["preferential allotment", "qualified institutional placement", "rights issue"],
        &["investment", "invest", "invests", "funding", "fundraise", "qip", "capex"],
    ),
    (
        CatalystType::Expansion,
        &["capacity addition", "new plant", "new facility", "greenfield"],
        &["expansion", "expand", "expands", "foray"],
    ),
    (
        CatalystType::Contract,
        &["order win", "letter of award", "letter of intent", "order book"],
        &["contract", "contracts", "order", "orders", "tender"],
    ),
    (
        CatalystType::Strategic,
        &["joint venture", "strategic partnership", "memorandum of understanding"],
        &["partnership", "collaboration", "alliance", "mou", "tie-up", "strategic"],
    ),
    (
        CatalystType::Regulatory,
        &["regulatory approval", "environmental clearance", "usfda approval"],
        &["sebi", "rbi", "regulator", "approval", "license", "licence", "clearance", "usfda", "nod"],
    ),
    (
        CatalystType::Dividend,
        &["bonus issue", "stock split", "record date", "share buyback"],
        &["dividend", "buyback"],
    ),
    (
        CatalystType::Product,
        &["product launch", "new product", "commercial launch"],
        &["launch", "launches", "unveils", "unveiled", "rollout"],
    ),
];

pub const SPECIFIC_PHRASE_CONFIDENCE: f64 = 1.0;
pub const GENERIC_WORD_CONFIDENCE: f64 = 0.6;
pub const CUSTOM_KEYWORD_CONFIDENCE: f64 = 0.8;

/// The built-in matchers in priority order, specific phrases before generic words.
pub fn default_matchers() -> Vec<Box<dyn CatalystMatcher>> {
    let mut matchers: Vec<Box<dyn CatalystMatcher>> = Vec::with_capacity(KEYWORD_GROUPS.len() * 2);
    for &(category, specific, generic) in KEYWORD_GROUPS {
        for (words, confidence) in [
            (specific, SPECIFIC_PHRASE_CONFIDENCE),
            (generic, GENERIC_WORD_CONFIDENCE),
        ] {
            let matcher = KeywordMatcher::new(category, words, confidence)
                .expect("built-in catalyst keywords are escaped literals");
            matchers.push(Box::new(matcher));
        }
    }
    matchers
}

/// Outcome of running every matcher over a text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalystDetection {
    pub category: CatalystType,
    /// Mentions of the winning category.
    pub mentions: usize,
    /// Every mention found, all categories, ordered by position.
    pub matches: Vec<CatalystMatch>,
}

/// Run `matchers` over `text` and pick the winning category.
///
/// Overlapping mentions of the same category (a specific phrase and a
/// generic word inside it) count once, keeping the more specific match.
pub fn detect(matchers: &[Box<dyn CatalystMatcher>], text: &str) -> CatalystDetection {
    let mut matches: Vec<CatalystMatch> = Vec::new();
    for matcher in matchers {
        for found in matcher.find(text) {
            let overlaps = matches.iter().any(|m| {
                m.category == found.category
                    && m.matched_span.start < found.matched_span.end
                    && found.matched_span.start < m.matched_span.end
            });
            if !overlaps {
                matches.push(found);
            }
        }
    }
    matches.sort_by_key(|m| m.matched_span.start);

    let mut counts: BTreeMap<CatalystType, usize> = BTreeMap::new();
    for m in &matches {
        *counts.entry(m.category).or_default() += 1;
    }
    // BTreeMap iterates in priority order; keep the first maximum.
    let winner = counts
        .iter()
        .fold(None::<(CatalystType, usize)>, |best, (&cat, &n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((cat, n)),
        });

    match winner {
        Some((category, mentions)) => CatalystDetection {
            category,
            mentions,
            matches,
        },
        None => CatalystDetection::default(),
    }
}
