//! Calendar labels used by statements: `dd/mm` transaction dates and
//! `mês/aaaa` statement periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;

const MONTH_NAMES: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// A `dd/mm` date as printed on the statement; the year comes from the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayMonth {
    month: u32,
    day: u32,
}

impl DayMonth {
    pub fn new(day: u32, month: u32) -> Result<Self, FormatError> {
        if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
            return Err(FormatError::InvalidDayMonth(format!("{day:02}/{month:02}")));
        }
        Ok(Self { month, day })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Zero-padded month, the key the reconciler groups by.
    pub fn month_key(&self) -> String {
        format!("{:02}", self.month)
    }

    pub fn with_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl FromStr for DayMonth {
    type Err = FormatError;

    /// Exactly `dd/mm`, two ASCII digits on each side.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::InvalidDayMonth(s.to_string());
        let (d, m) = s.split_once('/').ok_or_else(invalid)?;
        let two_digits = |p: &str| p.len() == 2 && p.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(d) || !two_digits(m) {
            return Err(invalid());
        }
        let day = d.parse().map_err(|_| invalid())?;
        let month = m.parse().map_err(|_| invalid())?;
        Self::new(day, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for DayMonth {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayMonth> for String {
    fn from(value: DayMonth) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.day, self.month)
    }
}

/// Statement period (`março/2025`). Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, FormatError> {
        if !(1..=12).contains(&month) {
            return Err(FormatError::InvalidPeriod(format!("{month:02}/{year}")));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// `MM/YYYY`, used when reporting gaps.
    pub fn numeric_label(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }

    fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }
}

impl FromStr for Period {
    type Err = FormatError;

    /// Case-insensitive `mês/aaaa`; `marco` is accepted for `março`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::InvalidPeriod(s.to_string());
        let (name, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        let name = name.trim().to_lowercase();
        let name = if name == "marco" { "março".to_string() } else { name };

        let month = MONTH_NAMES
            .iter()
            .position(|m| *m == name)
            .ok_or_else(invalid)? as u32
            + 1;
        let year: i32 = year.trim().parse().map_err(|_| invalid())?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for Period {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month_name(), self.year)
    }
}

/// Months absent between consecutive entries of a sorted period list.
pub fn missing_periods(sorted: &[Period]) -> Vec<Period> {
    let mut gaps = Vec::new();
    for pair in sorted.windows(2) {
        let mut cur = pair[0].next();
        while cur < pair[1] {
            gaps.push(cur);
            cur = cur.next();
        }
    }
    gaps
}
