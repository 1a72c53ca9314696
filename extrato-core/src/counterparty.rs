//! Counterparty names from PIX lines.
//!
//! Grammar: `PIX` `ENVIADO|RECEBIDO` then an uppercase letter, at least one
//! more letter, and further letter runs joined by single spaces. Digits,
//! punctuation or a double space end the name.

use crate::channel::Channel;

const PIX_MARKERS: [&str; 2] = ["PIXENVIADO", "PIXRECEBIDO"];

/// Return the counterparty for a PIX line, or an empty string.
///
/// Every occurrence of a marker is tried in text order; the first one
/// followed by a name wins.
pub fn extract_counterparty(text: &str, channel: Channel) -> String {
    if channel != Channel::Pix {
        return String::new();
    }

    let mut starts: Vec<usize> = PIX_MARKERS
        .iter()
        .flat_map(|m| text.match_indices(m).map(move |(i, _)| i + m.len()))
        .collect();
    starts.sort_unstable();

    starts
        .into_iter()
        .find_map(|start| name_run(&text[start..]))
        .unwrap_or_default()
}

fn name_run(rest: &str) -> Option<String> {
    let mut chars = rest.chars().peekable();
    let first = chars.next()?;
    if !first.is_uppercase() {
        return None;
    }

    let mut name = String::from(first);
    let mut letters_after_first = 0;
    while let Some(&c) = chars.peek() {
        if c.is_alphabetic() {
            name.push(c);
            letters_after_first += 1;
            chars.next();
        } else if c == ' ' && letters_after_first > 0 {
            chars.next();
            match chars.peek() {
                Some(&next) if next.is_alphabetic() => name.push(' '),
                _ => break,
            }
        } else {
            break;
        }
    }

    (letters_after_first > 0).then_some(name)
}
