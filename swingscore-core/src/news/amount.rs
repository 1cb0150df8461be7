//! Deal-value parsing.
//!
//! Recognises amounts written with a currency marker (₹/Rs/INR, $/USD,
//! €/EUR) and an optional magnitude word, plus bare crore/lakh amounts,
//! and normalises them to crore of local currency. Foreign currencies go
//! through fixed approximate rates taken from configuration.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::LazyLock;

const MAGNITUDE: &str =
    r"thousand|k|lakhs|lakh|lacs|lac|crores|crore|cr|million|mn|m|billion|bn|b";

static SYMBOL_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(₹|\brs\b\.?|\binr\b|\bus\$|\$|\busd\b|€|\beur\b)\s*(\d[\d,]*(?:\.\d+)?)(?:\s*({MAGNITUDE})\b)?"
    ))
    .expect("symbol amount pattern must compile")
});

static SUFFIX_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d[\d,]*(?:\.\d+)?)\s*(lakhs|lakh|lacs|lac|crores|crore|cr|million|mn|billion|bn)\b(?:\s*(rupees|rs\b\.?|inr|dollars|usd|euros|euro|eur)\b)?",
    )
    .expect("suffix amount pattern must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Local,
    Usd,
    Eur,
}

impl Currency {
    fn from_marker(marker: &str) -> Self {
        match marker.trim_end_matches('.').to_lowercase().as_str() {
            "$" | "us$" | "usd" | "dollars" => Currency::Usd,
            "€" | "eur" | "euro" | "euros" => Currency::Eur,
            _ => Currency::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Magnitude {
    Unit,
    Thousand,
    Lakh,
    Crore,
    Million,
    Billion,
}

impl Magnitude {
    fn from_word(word: &str) -> Self {
        match word.to_lowercase().as_str() {
            "thousand" | "k" => Magnitude::Thousand,
            "lakh" | "lakhs" | "lac" | "lacs" => Magnitude::Lakh,
            "crore" | "crores" | "cr" => Magnitude::Crore,
            "million" | "mn" | "m" => Magnitude::Million,
            "billion" | "bn" | "b" => Magnitude::Billion,
            _ => Magnitude::Unit,
        }
    }

    /// Crores per one unit of this magnitude (1 crore = 10^7).
    pub fn in_crore(self) -> f64 {
        match self {
            Magnitude::Unit => 1e-7,
            Magnitude::Thousand => 1e-4,
            Magnitude::Lakh => 1e-2,
            Magnitude::Crore => 1.0,
            Magnitude::Million => 0.1,
            Magnitude::Billion => 100.0,
        }
    }

    /// Lakh and crore only appear in local-currency amounts.
    fn implies_local(self) -> bool {
        matches!(self, Magnitude::Lakh | Magnitude::Crore)
    }
}

/// Fixed conversion rates into local currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxRates {
    pub usd_to_local: f64,
    pub eur_to_local: f64,
}

impl Default for FxRates {
    fn default() -> Self {
        Self {
            usd_to_local: 83.0,
            eur_to_local: 90.0,
        }
    }
}

impl FxRates {
    pub fn to_local(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Local => 1.0,
            Currency::Usd => self.usd_to_local,
            Currency::Eur => self.eur_to_local,
        }
    }
}

/// One parsed money amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealAmount {
    pub currency: Currency,
    pub magnitude: Magnitude,
    /// The number as written, separators removed.
    pub value: f64,
    /// Normalised value in crore of local currency.
    pub local_crore: f64,
    pub span: Range<usize>,
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite())
}

fn build(
    caps: &Captures<'_>,
    number: usize,
    magnitude: usize,
    currency: Option<Currency>,
    rates: &FxRates,
) -> Option<DealAmount> {
    let whole = caps.get(0)?;
    let value = parse_number(caps.get(number)?.as_str())?;
    let magnitude = caps
        .get(magnitude)
        .map_or(Magnitude::Unit, |m| Magnitude::from_word(m.as_str()));
    let currency = currency.unwrap_or(Currency::Local);
    Some(DealAmount {
        currency,
        magnitude,
        value,
        local_crore: value * magnitude.in_crore() * rates.to_local(currency),
        span: whole.range(),
    })
}

/// Every parseable amount in `text`, ordered by position.
///
/// Suffix-only amounts need either a lakh/crore magnitude or a trailing
/// currency word; a bare "5 million" is ambiguous and is skipped.
pub fn parse_amounts(text: &str, rates: &FxRates) -> Vec<DealAmount> {
    let mut amounts: Vec<DealAmount> = SYMBOL_AMOUNT
        .captures_iter(text)
        .filter_map(|caps| {
            let currency = Currency::from_marker(caps.get(1)?.as_str());
            build(&caps, 2, 3, Some(currency), rates)
        })
        .collect();

    for caps in SUFFIX_AMOUNT.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if amounts
            .iter()
            .any(|a| a.span.start < whole.end() && whole.start() < a.span.end)
        {
            continue;
        }
        let magnitude = caps
            .get(2)
            .map_or(Magnitude::Unit, |m| Magnitude::from_word(m.as_str()));
        let currency = match caps.get(3) {
            Some(word) => Currency::from_marker(word.as_str()),
            None if magnitude.implies_local() => Currency::Local,
            None => continue,
        };
        if let Some(amount) = build(&caps, 1, 2, Some(currency), rates) {
            amounts.push(amount);
        }
    }

    amounts.sort_by_key(|a| a.span.start);
    amounts
}

/// Largest normalised amount, or 0 when nothing parsed.
pub fn largest_local_crore(amounts: &[DealAmount]) -> f64 {
    amounts
        .iter()
        .map(|a| a.local_crore)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<DealAmount> {
        parse_amounts(text, &FxRates::default())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn rupee_crore() {
        let found = parse("a signed ₹5,000 crore acquisition");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].currency, Currency::Local);
        assert_eq!(found[0].magnitude, Magnitude::Crore);
        assert!(approx(found[0].local_crore, 5000.0));
    }

    #[test]
    fn rs_prefix_and_lakh() {
        let found = parse("order worth Rs. 250 lakh");
        assert_eq!(found.len(), 1);
        assert!(approx(found[0].local_crore, 2.5));
    }

    #[test]
    fn dollars_convert_at_fixed_rate() {
        let found = parse("a $1.2 billion deal");
        assert_eq!(found[0].currency, Currency::Usd);
        // 1.2 × 100 crore × 83
        assert!(approx(found[0].local_crore, 9960.0));
    }

    #[test]
    fn usd_word_prefix_and_million() {
        let found = parse("raised USD 50 million");
        assert!(approx(found[0].local_crore, 50.0 * 0.1 * 83.0));
    }

    #[test]
    fn euro_thousand() {
        let found = parse("grant of €500 thousand");
        assert!(approx(found[0].local_crore, 500.0 * 1e-4 * 90.0));
    }

    #[test]
    fn bare_crore_is_local() {
        let found = parse("capex of 1,200 crores planned");
        assert_eq!(found.len(), 1);
        assert!(approx(found[0].local_crore, 1200.0));
    }

    #[test]
    fn suffix_with_currency_word() {
        let found = parse("valued at 2 billion dollars");
        assert_eq!(found[0].currency, Currency::Usd);
        assert!(approx(found[0].local_crore, 2.0 * 100.0 * 83.0));
    }

    #[test]
    fn bare_million_is_ambiguous() {
        assert!(parse("5 million users signed up").is_empty());
    }

    #[test]
    fn symbol_match_is_not_double_counted() {
        assert_eq!(parse("₹300 crore and Rs 20 cr").len(), 2);
    }

    #[test]
    fn largest_wins() {
        let found = parse("₹300 crore now, ₹1,000 crore later");
        assert!(approx(largest_local_crore(&found), 1000.0));
        assert_eq!(largest_local_crore(&[]), 0.0);
    }

    #[test]
    fn custom_rates_apply() {
        let rates = FxRates {
            usd_to_local: 80.0,
            eur_to_local: 1.0,
        };
        let found = parse_amounts("$1 billion", &rates);
        assert!(approx(found[0].local_crore, 8000.0));
    }

    #[test]
    fn plain_numbers_are_not_amounts() {
        assert!(parse("sold 5,000 units in 2025").is_empty());
    }
}
