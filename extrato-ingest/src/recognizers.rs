//! Named recognizers for the statement text grammar.
//!
//! Each function matches one token shape and is tested on its own. The two
//! shapes that need backtracking (amounts and the period heading) are
//! compiled once into [`Recognizers`]; the rest are plain string checks.

use extrato_core::DayMonth;
use regex::Regex;

use crate::layout::StatementLayout;

/// Amount: `-?` then either `\d{1,3}(\.\d{3})*` or `\d+`, a `.` or `,`,
/// exactly two digits and an optional trailing `-`.
const AMOUNT_PATTERN: &str = r"-?(?:\d{1,3}(?:\.\d{3})*|\d+)[.,]\d{2}-?";

#[derive(Debug, Clone)]
pub struct Recognizers {
    amount: Regex,
    period: Regex,
}

impl Recognizers {
    pub fn new(layout: &StatementLayout) -> Result<Self, regex::Error> {
        let amount = Regex::new(AMOUNT_PATTERN)?;
        // `<marker> - <letters>/<yyyy>`, case-insensitive
        let period = Regex::new(&format!(
            r"(?i){}\s*-\s*(\p{{L}}+/\d{{4}})",
            regex::escape(&layout.summary_marker)
        ))?;
        Ok(Self { amount, period })
    }

    /// Leftmost amount token in `content` that is not directly followed by
    /// a `.` (which would make it the head of a longer number).
    pub fn find_amount<'t>(&self, content: &'t str) -> Option<&'t str> {
        self.amount
            .find_iter(content)
            .find(|m| !content[m.end()..].starts_with('.'))
            .map(|m| m.as_str())
    }

    /// The `mês/aaaa` label following the summary marker.
    pub fn period_label<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.period
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

/// `^dd/mm`: a line opening with a date. Returns the date and the rest of
/// the line, trimmed.
pub fn leading_day_month(line: &str) -> Option<(DayMonth, &str)> {
    let head = line.get(..5)?;
    let date = head.parse::<DayMonth>().ok()?;
    Some((date, line[5..].trim()))
}

/// `[\d.,]+` over the whole word.
pub fn is_numeric_token(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

/// `<label>dd/mm` as one word, ignoring embedded spaces.
pub fn anchor_date(word: &str, label: &str) -> Option<DayMonth> {
    let compact: String = word.chars().filter(|c| *c != ' ').collect();
    compact.strip_prefix(label)?.parse().ok()
}

pub fn is_block_header(line: &str, keyword: &str) -> bool {
    line.contains(keyword)
}

pub fn is_balance_row(stripped: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| stripped.starts_with(p.as_str()))
}

/// Prefix match with spaces removed on both sides, case-insensitive.
pub fn is_block_trailer(stripped: &str, marker: &str) -> bool {
    let squash = |s: &str| -> String {
        s.chars()
            .filter(|c| *c != ' ')
            .collect::<String>()
            .to_lowercase()
    };
    let marker = squash(marker);
    !marker.is_empty() && squash(stripped).starts_with(&marker)
}

pub fn has_continuation_marker(line: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| line.contains(m.as_str()))
}
