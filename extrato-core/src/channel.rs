//! Deterministic channel classification for statement lines.
//!
//! Keyword rules only, evaluated in a fixed order. Some descriptions carry
//! more than one keyword (a PIX refund of a debit, say), so the first rule
//! that matches wins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::FormatError;

/// Transaction mechanism, serialized with the ledger's `via` vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Channel {
    #[serde(rename = "pix")]
    Pix,
    #[serde(rename = "debito")]
    Debit,
    #[serde(rename = "rendimentos")]
    Yield,
    #[serde(rename = "tarifa")]
    Fee,
    #[serde(rename = "outro")]
    Other,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Pix => "pix",
            Channel::Debit => "debito",
            Channel::Yield => "rendimentos",
            Channel::Fee => "tarifa",
            Channel::Other => "outro",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pix" => Ok(Channel::Pix),
            "debito" => Ok(Channel::Debit),
            "rendimentos" => Ok(Channel::Yield),
            "tarifa" => Ok(Channel::Fee),
            "outro" => Ok(Channel::Other),
            other => Err(FormatError::UnknownLabel {
                kind: "channel",
                value: other.to_string(),
            }),
        }
    }
}

/// Money flow relative to the account holder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "recebido")]
    Received,
    #[serde(rename = "enviado")]
    Sent,
}

impl Direction {
    /// Strictly positive amounts are received; zero counts as sent.
    pub fn from_amount(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Direction::Received
        } else {
            Direction::Sent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Received => "recebido",
            Direction::Sent => "enviado",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a statement line (date already stripped) into a channel.
pub fn classify_channel(text: &str) -> Channel {
    let t = text.to_lowercase();

    // PIX first: "PIXENVIADO ... DEBITO AUTOMATICO" is still a PIX
    if t.contains("pixenviado") || t.contains("pixrecebido") {
        return Channel::Pix;
    }

    if t.contains("debito") || t.contains("débito") {
        return Channel::Debit;
    }

    if t.contains("remuneracao") || t.contains("remuneração") {
        return Channel::Yield;
    }

    if t.contains("tarifa") {
        return Channel::Fee;
    }

    Channel::Other
}
