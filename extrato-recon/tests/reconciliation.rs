use std::fs;

use extrato_ingest::{ExtractOptions, StatementExtractor};
use extrato_recon::{
    MatchOptions, MatchOutcome, ReconciliationSummary, ScriptedDisambiguator, load_reference,
    read_ledger, reconcile, write_ledger, write_report,
};

const STATEMENT: &str = "\
Resumo - março/2025
SaldodeContaCorrenteem28/02 1.000,00
SaldodeContaCorrenteem31/03 810,00
Movimentação
05/03 TARIFA MENSALIDADE 45,00-
12/03 TARIFA MENSALIDADE 45,00-
20/03 PIXENVIADOJOAO SOUZA 100,00-
Se você não tem dúvidas
";

const REFERENCE: &str = "\
Conta,Valor,Mês
Tarifa,\"45,00\",3
Tarifa,\"45,00\",3
Tarifa,\"45,00\",3
Pix,\"R$ 100,00\",03
Aluguel,\"900,00\",3
";

#[test]
fn test_extract_then_reconcile_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("2025-03.txt"), STATEMENT).unwrap();

    let extractor = StatementExtractor::new(ExtractOptions::default()).unwrap();
    let batch = extractor.extract_directory(&input).unwrap();
    assert!(batch.skipped.is_empty());
    assert_eq!(batch.mismatched().count(), 0);

    let ledger_path = dir.path().join("planilhas").join("movimentacoes.csv");
    write_ledger(&ledger_path, &batch.transactions()).unwrap();
    let ledger = read_ledger(&ledger_path).unwrap();
    assert_eq!(ledger.len(), 3);
    assert!(ledger.iter().all(|e| e.month == "03"));

    let reference_path = dir.path().join("referencia.csv");
    fs::write(&reference_path, REFERENCE).unwrap();
    let table = load_reference(&reference_path, "Valor", "Mês").unwrap();
    assert_eq!(table.entries.len(), 5);

    let mut answers = ScriptedDisambiguator::new(["2"]);
    let results = reconcile(&table, &ledger, MatchOptions::default(), &mut answers);

    // Only the first tariff row sees both ledger tariffs.
    assert_eq!(answers.requests, [2]);

    let outcomes: Vec<MatchOutcome> = results.iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        [
            MatchOutcome::Chosen,
            MatchOutcome::Unique,
            MatchOutcome::NotFound,
            MatchOutcome::Unique,
            MatchOutcome::NotFound,
        ]
    );

    let lines: Vec<Option<usize>> = results
        .iter()
        .map(|r| r.matched.as_ref().map(|m| m.statement_line()))
        .collect();
    assert_eq!(lines, [Some(3), Some(2), None, Some(4), None]);

    let summary = ReconciliationSummary::from_results(&results);
    assert_eq!(summary.found(), 3);
    assert_eq!(summary.not_found, 2);

    let report_path = dir.path().join("planilhas").join("verificacao_saida.csv");
    write_report(&report_path, &table, &results).unwrap();

    let mut rdr = csv::Reader::from_path(&report_path).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(
        headers,
        ["Conta", "Valor", "Mês", "Encontrado", "Linha_extrato", "valor_extrato", "descricao_raw"]
    );

    let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(&rows[0][3], "Sim");
    assert_eq!(&rows[0][4], "3");
    assert_eq!(&rows[0][5], "-45.00");
    assert!(rows[0][6].contains("12/03"));
    assert_eq!(&rows[2][2], "03");
    assert_eq!(&rows[2][3], "Não");
    assert_eq!(&rows[2][4], "");
    assert!(rows[3][6].contains("PIXENVIADOJOAO"));
}
