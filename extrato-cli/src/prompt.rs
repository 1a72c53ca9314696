use extrato_core::format_amount;
use extrato_recon::{Decision, DisambiguationRequest, Disambiguator, parse_decision};
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Asks the operator to pick among equally plausible ledger rows.
pub struct ConsoleDisambiguator<R, W> {
    input: R,
    output: W,
    description_width: usize,
}

impl ConsoleDisambiguator<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(description_width: usize) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), description_width)
    }
}

impl<R: BufRead, W: Write> ConsoleDisambiguator<R, W> {
    pub fn new(input: R, output: W, description_width: usize) -> Self {
        Self {
            input,
            output,
            description_width,
        }
    }

    fn ask(&mut self, request: &DisambiguationRequest<'_>) -> io::Result<String> {
        let entry = request.entry;
        writeln!(
            self.output,
            "\nReference line {} (month {}, amount {}) matches {} rows:",
            entry.row + 2,
            entry.expected_month,
            format_amount(entry.expected_amount),
            request.candidates.len()
        )?;
        for (i, c) in request.candidates.iter().enumerate() {
            writeln!(
                self.output,
                "  {}) line {} | {} | {} | {}",
                i + 1,
                c.statement_line(),
                c.date,
                format_amount(c.amount),
                truncate(&c.raw_description, self.description_width)
            )?;
        }
        write!(self.output, "Pick 1-{} (Enter to skip): ", request.candidates.len())?;
        self.output.flush()?;

        let mut s = String::new();
        self.input.read_line(&mut s)?;
        Ok(s)
    }
}

impl<R: BufRead, W: Write> Disambiguator for ConsoleDisambiguator<R, W> {
    fn choose(&mut self, request: &DisambiguationRequest<'_>) -> Decision {
        match self.ask(request) {
            Ok(answer) => parse_decision(&answer, request.candidates.len()),
            Err(e) => {
                warn!(error = %e, "prompt failed, leaving entry unmatched");
                Decision::Abstain
            }
        }
    }
}

fn truncate(s: &str, width: usize) -> &str {
    match s.char_indices().nth(width) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extrato_recon::{LedgerEntry, ReferenceEntry};
    use rust_decimal::Decimal;
    use std::io::Cursor;

    fn ledger_row(row: usize, description: &str) -> LedgerEntry {
        LedgerEntry {
            row,
            date: "07/03".to_string(),
            month: "03".to_string(),
            amount: Decimal::new(-4500, 2),
            raw_description: description.to_string(),
            period: None,
            source_document: "mar.pdf".to_string(),
        }
    }

    #[test]
    fn test_lists_candidates_and_reads_answer() {
        let entry = ReferenceEntry {
            row: 0,
            values: vec!["Tarifa".to_string(), "45,00".to_string(), "03".to_string()],
            expected_amount: Decimal::new(-4500, 2),
            expected_month: "03".to_string(),
        };
        let a = ledger_row(1, "07/03 TARIFA MENSALIDADE PACOTE SERVICOS 45,00-");
        let b = ledger_row(4, "07/03 TARIFA AVULSA 45,00-");
        let request = DisambiguationRequest {
            entry: &entry,
            candidates: vec![&a, &b],
        };

        let mut out = Vec::new();
        let decision = ConsoleDisambiguator::new(Cursor::new("2\n"), &mut out, 20).choose(&request);
        assert_eq!(decision, Decision::Pick(2));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Reference line 2 (month 03, amount -45.00) matches 2 rows"));
        assert!(text.contains("  1) line 3 | 07/03 | -45.00 | 07/03 TARIFA MENSALI\n"));
        assert!(text.contains("  2) line 6 | 07/03 | -45.00 | 07/03 TARIFA AVULSA \n"));
    }

    #[test]
    fn test_eof_abstains() {
        let entry = ReferenceEntry {
            row: 3,
            values: Vec::new(),
            expected_amount: Decimal::ONE,
            expected_month: "01".to_string(),
        };
        let a = ledger_row(0, "x");
        let request = DisambiguationRequest {
            entry: &entry,
            candidates: vec![&a, &a],
        };
        let mut console = ConsoleDisambiguator::new(Cursor::new(""), io::sink(), 10);
        assert_eq!(console.choose(&request), Decision::Abstain);
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("ação rápida", 4), "ação");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
