//! Word lists and token patterns used by the certainty scorer.
//!
//! Every pattern is case-insensitive and anchored on word boundaries so a
//! marker inside a longer word ("mayor", "reportedly") does not count.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in lexicon pattern must compile")
}

/// "May" only counts as a month when capitalised; lowercase "may" is the modal.
const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|(?-i:May)|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

/// Runs of digits with an optional decimal part. "5,000" yields "5" and "000".
pub static NUMERIC: LazyLock<Regex> = LazyLock::new(|| compile(r"\d+(?:\.\d+)?"));

pub static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\d+(?:\.\d+)?\s?(?:%|\bper\s?cent\b)"));

/// ISO dates, numeric day/month/year, and month-name dates in either order.
pub static EXPLICIT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?i)\b\d{{4}}-\d{{2}}-\d{{2}}\b|\b\d{{1,2}}[/.]\d{{1,2}}[/.]\d{{2,4}}\b|\b{MONTH}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b|\b\d{{1,2}}(?:st|nd|rd|th)?\s+{MONTH}\.?,?\s+\d{{4}}\b"
    ))
});

/// Quarter, half-year, and fiscal-year references.
pub static FISCAL_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bq[1-4]\b|\bh[12]\b|\b(?:first|second|third|fourth|1st|2nd|3rd|4th)\s+quarter\b|\bfy\s?'?\d{2,4}\b")
});

pub static YEAR: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(?:19|20)\d{2}\b"));

pub static CONFIRMED_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:announced|signed|approved|completed|filed|declared|awarded|acquired|reported|launched|secured|finalised|finalized|received|commissioned)\b")
});

pub static SPECULATION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:may|might|could|possibly|potentially|expects|plans|considering|consider|exploring|mulls|likely|rumou?red|speculation)\b")
});

/// Capitalised "May" next to a day number or a year.
static MONTH_MAY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\bMay\.?,?\s+\d|\d(?:st|nd|rd|th)?\s+May\b"));

/// Distinct speculation markers, ignoring "May" where it names the month.
pub fn speculation_markers(text: &str) -> BTreeSet<String> {
    let undated = EXPLICIT_DATE.replace_all(text, " ");
    let undated = MONTH_MAY.replace_all(&undated, " ");
    distinct_matches(&SPECULATION, &undated)
}

/// Money talk without necessarily a parseable amount.
pub static MONEY_LANGUAGE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)[₹$€]|\b(?:rs|inr|usd|eur|rupees?|dollars?|euros?|crores?|lakhs?|million|billion|worth|valued|valuation|deal\s+size|consideration)\b")
});

pub static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:surges?|surged|soars?|soared|jumps?|jumped|gains?|gained|rally|rallies|growth|grew|profits?|record|beats?|strong|stronger|upgraded?|outperforms?|bullish|robust|rises?|rose|higher|boosts?|boosted|wins?|won)\b")
});

pub static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:loss|losses|declines?|declined|fell|falls?|drops?|dropped|plunges?|plunged|slumps?|slumped|miss|misses|missed|weak|weaker|downgraded?|lawsuit|fraud|penalty|probe|defaults?|defaulted|cuts?|bearish|lower|resigns?|resigned|raid|raided)\b")
});

/// Distinct matched strings, lowercased.
pub fn distinct_matches(re: &Regex, text: &str) -> BTreeSet<String> {
    re.find_iter(text).map(|m| m.as_str().to_lowercase()).collect()
}

pub fn count_matches(re: &Regex, text: &str) -> usize {
    re.find_iter(text).count()
}
