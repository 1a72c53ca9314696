//! Localized money parsing.
//!
//! Statements print amounts as `1.234,56` with a trailing `-` for outflows,
//! reference sheets carry `R$ 1.234,56` or occasionally `1,234.56`.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::FormatError;

/// Parse a localized amount into a two-place decimal.
///
/// Accepted after trimming: an optional leading `-`, digits grouped with `.`
/// and `,`, an optional trailing `-`. Either sign marker makes the value
/// negative.
///
/// Separator resolution:
/// - both `.` and `,` present: the rightmost one is the decimal separator
/// - only `,`: one occurrence is decimal, several are thousands groups
/// - only `.`: several occurrences are thousands groups, a single one is
///   decimal unless exactly three digits follow it
pub fn parse_localized_amount(text: &str) -> Result<Decimal, FormatError> {
    let fail = || FormatError::NoAmount(text.to_string());

    let s = text.trim();
    let (s, trailing_neg) = match s.strip_suffix('-') {
        Some(rest) => (rest.trim_end(), true),
        None => (s, false),
    };
    let (s, leading_neg) = match s.strip_prefix('-') {
        Some(rest) => (rest.trim_start(), true),
        None => (s, false),
    };

    if !s.starts_with(|c: char| c.is_ascii_digit())
        || !s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return Err(fail());
    }

    let normalized = normalize_separators(s).ok_or_else(fail)?;
    let value = Decimal::from_str(&normalized).map_err(|_| fail())?.round_dp(2);

    Ok(if trailing_neg || leading_neg { -value } else { value })
}

fn normalize_separators(s: &str) -> Option<String> {
    let (decimal, thousands) = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => (Some(','), '.'),
        (Some(_), Some(_)) => (Some('.'), ','),
        (None, Some(_)) if s.matches(',').count() == 1 => (Some(','), '.'),
        (None, Some(_)) => (None, ','),
        (Some(dot), None) if s.matches('.').count() == 1 && s.len() - dot - 1 != 3 => {
            (Some('.'), ',')
        }
        (Some(_), None) => (None, '.'),
        (None, None) => (None, '.'),
    };

    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == thousands {
            continue;
        }
        if Some(c) == decimal {
            out.push('.');
        } else {
            out.push(c);
        }
    }

    if out.matches('.').count() > 1 || out.ends_with('.') {
        return None;
    }
    Some(out)
}

/// Render an amount the way the ledger stores it: two places, leading `-`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_statement_amounts() {
        assert_eq!(parse_localized_amount("150,00").unwrap(), dec("150.00"));
        assert_eq!(parse_localized_amount("1.234,56").unwrap(), dec("1234.56"));
        assert_eq!(parse_localized_amount("1.234,56-").unwrap(), dec("-1234.56"));
        assert_eq!(parse_localized_amount("12.345.678,90").unwrap(), dec("12345678.90"));
    }

    #[test]
    fn test_reverse_convention() {
        assert_eq!(parse_localized_amount("1,234.56").unwrap(), dec("1234.56"));
        assert_eq!(parse_localized_amount("1,234,567").unwrap(), dec("1234567"));
        assert_eq!(parse_localized_amount("150.00").unwrap(), dec("150.00"));
        assert_eq!(parse_localized_amount("1.500").unwrap(), dec("1500"));
    }

    #[test]
    fn test_leading_sign_is_negative_too() {
        assert_eq!(parse_localized_amount("-80,10").unwrap(), dec("-80.10"));
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(parse_localized_amount("").is_err());
        assert!(parse_localized_amount("abc").is_err());
        assert!(parse_localized_amount("R$ 10,00").is_err());
        assert!(parse_localized_amount("1.234,56,78").is_err());
        assert!(parse_localized_amount("10,").is_err());
        assert!(parse_localized_amount(",50").is_err());
    }

    #[test]
    fn test_format_reparses_to_same_value() {
        for raw in ["0,01", "150,00", "1.234,56-", "99.999,99", "7,5"] {
            let parsed = parse_localized_amount(raw).unwrap();
            let formatted = format_amount(parsed);
            assert_eq!(parse_localized_amount(&formatted).unwrap(), parsed, "{raw}");
        }
        assert_eq!(format_amount(dec("-1234.5")), "-1234.50");
    }
}
