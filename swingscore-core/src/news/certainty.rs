//! Certainty scoring: six bounded additive components.
//!
//! | component            | range  | per item                                  |
//! |----------------------|--------|-------------------------------------------|
//! | base                 | 20     | fixed                                     |
//! | specificity          | 0–25   | +2 number, +3 percentage, +5 amount       |
//! | temporal specificity | 0–15   | +5 date, +3 fiscal period, +2 year        |
//! | action certainty     | 0–15   | +3 confirmed verb, −2 speculation marker  |
//! | catalyst strength    | 0–15   | +5 per mention of the winning category    |
//! | deal-value           | 0–10   | 10 parsed amount, 5 money language        |
//!
//! The sum is clamped to [0,100]. Text carrying a synthetic-content marker
//! loses a further 40 points and is floored at 20.

use serde::{Deserialize, Serialize};

use super::amount::DealAmount;
use super::lexicon;
use super::matchers::CatalystDetection;

/// Point values and caps of the certainty formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertaintyWeights {
    pub base: f64,
    pub per_numeric: f64,
    pub per_percentage: f64,
    pub per_currency_amount: f64,
    pub specificity_cap: f64,
    pub per_date: f64,
    pub per_fiscal_period: f64,
    pub per_year: f64,
    pub temporal_cap: f64,
    pub per_confirmed_action: f64,
    pub per_speculation: f64,
    pub action_cap: f64,
    pub per_catalyst_mention: f64,
    pub catalyst_cap: f64,
    /// Multiplier on catalyst strength when speculation outweighs confirmation.
    pub speculative_catalyst_factor: f64,
    pub parsed_deal_value: f64,
    pub money_language: f64,
    pub synthetic_penalty: f64,
    pub floor: f64,
}

impl Default for CertaintyWeights {
    fn default() -> Self {
        Self {
            base: 20.0,
            per_numeric: 2.0,
            per_percentage: 3.0,
            per_currency_amount: 5.0,
            specificity_cap: 25.0,
            per_date: 5.0,
            per_fiscal_period: 3.0,
            per_year: 2.0,
            temporal_cap: 15.0,
            per_confirmed_action: 3.0,
            per_speculation: 2.0,
            action_cap: 15.0,
            per_catalyst_mention: 5.0,
            catalyst_cap: 15.0,
            speculative_catalyst_factor: 0.5,
            parsed_deal_value: 10.0,
            money_language: 5.0,
            synthetic_penalty: 40.0,
            floor: 20.0,
        }
    }
}

/// Token counts behind each component, kept for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenCounts {
    pub numeric: usize,
    pub percentages: usize,
    pub currency_amounts: usize,
    pub dates: usize,
    pub fiscal_periods: usize,
    pub years: usize,
    pub confirmed_actions: usize,
    pub speculation_markers: usize,
    pub catalyst_mentions: usize,
    pub money_language: bool,
}

/// Every component of one certainty score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertaintyBreakdown {
    pub counts: TokenCounts,
    pub base: f64,
    pub specificity: f64,
    pub temporal: f64,
    pub action: f64,
    pub catalyst: f64,
    pub deal_value: f64,
    /// Sum of components clamped to [0,100], before any synthetic penalty.
    pub unpenalized: f64,
    pub synthetic: bool,
    pub certainty: f64,
}

/// Score `text` given the catalyst detection and parsed amounts already run on it.
pub fn score(
    text: &str,
    detection: &CatalystDetection,
    amounts: &[DealAmount],
    synthetic: bool,
    w: &CertaintyWeights,
) -> CertaintyBreakdown {
    let counts = TokenCounts {
        numeric: lexicon::distinct_matches(&lexicon::NUMERIC, text).len(),
        percentages: lexicon::distinct_matches(&lexicon::PERCENTAGE, text).len(),
        currency_amounts: amounts.len(),
        dates: lexicon::distinct_matches(&lexicon::EXPLICIT_DATE, text).len(),
        fiscal_periods: lexicon::distinct_matches(&lexicon::FISCAL_PERIOD, text).len(),
        years: lexicon::distinct_matches(&lexicon::YEAR, text).len(),
        confirmed_actions: lexicon::distinct_matches(&lexicon::CONFIRMED_ACTION, text).len(),
        speculation_markers: lexicon::speculation_markers(text).len(),
        catalyst_mentions: detection.mentions,
        money_language: lexicon::MONEY_LANGUAGE.is_match(text),
    };

    let specificity = (counts.numeric as f64 * w.per_numeric
        + counts.percentages as f64 * w.per_percentage
        + counts.currency_amounts as f64 * w.per_currency_amount)
        .min(w.specificity_cap);

    let temporal = (counts.dates as f64 * w.per_date
        + counts.fiscal_periods as f64 * w.per_fiscal_period
        + counts.years as f64 * w.per_year)
        .min(w.temporal_cap);

    let action = (counts.confirmed_actions as f64 * w.per_confirmed_action
        - counts.speculation_markers as f64 * w.per_speculation)
        .clamp(0.0, w.action_cap);

    let speculative = counts.speculation_markers > counts.confirmed_actions;
    let mut catalyst = (counts.catalyst_mentions as f64 * w.per_catalyst_mention).min(w.catalyst_cap);
    if speculative {
        catalyst *= w.speculative_catalyst_factor;
    }

    let deal_value = if !amounts.is_empty() {
        w.parsed_deal_value
    } else if counts.money_language {
        w.money_language
    } else {
        0.0
    };

    let unpenalized =
        (w.base + specificity + temporal + action + catalyst + deal_value).clamp(0.0, 100.0);
    let certainty = if synthetic {
        (unpenalized - w.synthetic_penalty).max(w.floor)
    } else {
        unpenalized.max(w.floor)
    }
    .min(100.0);

    CertaintyBreakdown {
        counts,
        base: w.base,
        specificity,
        temporal,
        action,
        catalyst,
        deal_value,
        unpenalized,
        synthetic,
        certainty,
    }
}
