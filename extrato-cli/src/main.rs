use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use extrato_core::format_amount;
use extrato_ingest::{Document, StatementExtractor};
use extrato_recon::{
    AbstainDisambiguator, Disambiguator, ReconciliationSummary, backup_ledger, load_reference,
    period_report, read_ledger, reconcile, write_ledger, write_report,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod prompt;

use config::{Config, config_path, init_config, load_config};
use prompt::ConsoleDisambiguator;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("EXTRATO_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "extrato", version = VERSION, about = "Bank statement extraction and reconciliation")]
struct Cli {
    /// Config file (default: ./extrato.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract every statement in the input directory into the ledger CSV
    Extract {
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long)]
        output: Option<PathBuf>,

        /// Overwrite the ledger without moving the previous one aside
        #[arg(long)]
        no_backup: bool,
    },

    /// Match a reference spreadsheet against the ledger and write the report
    Reconcile {
        #[arg(long)]
        reference: Option<PathBuf>,

        #[arg(long)]
        ledger: Option<PathBuf>,

        #[arg(long)]
        output: Option<PathBuf>,

        /// Never prompt; ambiguous entries are left unmatched
        #[arg(long)]
        no_prompt: bool,
    },

    /// List statement periods in the ledger, gaps, and missing documents
    Periods {
        #[arg(long)]
        ledger: Option<PathBuf>,

        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print the extracted text of one document, page by page
    Dump { file: PathBuf },

    /// Write the default config file
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg_path = config_path(cli.config.as_deref());
    if let Command::InitConfig = cli.command {
        return init_config(&cfg_path);
    }
    let cfg = load_config(&cfg_path)?;

    match cli.command {
        Command::Extract {
            input,
            output,
            no_backup,
        } => {
            let input = input.unwrap_or_else(|| cfg.paths.input_dir.clone());
            let output = output.unwrap_or_else(|| cfg.paths.ledger_csv.clone());
            extract(&cfg, &input, &output, no_backup)?;
        }

        Command::Reconcile {
            reference,
            ledger,
            output,
            no_prompt,
        } => {
            let reference = reference.unwrap_or_else(|| cfg.paths.reference_csv.clone());
            let ledger = ledger.unwrap_or_else(|| cfg.paths.ledger_csv.clone());
            let output = output.unwrap_or_else(|| cfg.paths.report_csv.clone());
            run_reconcile(&cfg, &reference, &ledger, &output, no_prompt)?;
        }

        Command::Periods { ledger, input } => {
            let ledger = ledger.unwrap_or_else(|| cfg.paths.ledger_csv.clone());
            let input = input.unwrap_or_else(|| cfg.paths.input_dir.clone());
            periods(&ledger, &input)?;
        }

        Command::Dump { file } => dump(&file)?,

        Command::InitConfig => {}
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn extract(cfg: &Config, input: &Path, output: &Path, no_backup: bool) -> Result<()> {
    if !input.is_dir() {
        bail!("Input directory not found: {} (pass --input <dir>)", input.display());
    }

    if !no_backup {
        if let Some(moved) = backup_ledger(output, &cfg.paths.backup_dir)
            .with_context(|| format!("backing up {}", output.display()))?
        {
            println!("Previous ledger moved to {}", moved.display());
        }
    }

    let extractor = StatementExtractor::new(cfg.extract_options()).context("invalid layout")?;
    let batch = extractor
        .extract_directory(input)
        .with_context(|| format!("reading {}", input.display()))?;

    for s in &batch.statements {
        println!("{} | {} | {} transactions", s.document, s.period, s.transactions.len());
    }
    for s in batch.mismatched() {
        println!(
            "WARNING {}: extracted total {} differs from balance anchors by {}",
            s.document,
            format_amount(s.balance.extracted_total),
            format_amount(s.balance.difference)
        );
    }
    for skipped in &batch.skipped {
        println!("SKIPPED {}: {}", skipped.document, skipped.reason);
    }

    let txns = batch.transactions();
    write_ledger(output, &txns).with_context(|| format!("writing {}", output.display()))?;
    println!("\nWrote {} transactions to {}", txns.len(), output.display());

    Ok(())
}

fn run_reconcile(
    cfg: &Config,
    reference: &Path,
    ledger: &Path,
    output: &Path,
    no_prompt: bool,
) -> Result<()> {
    let rc = &cfg.reconciliation;
    let table = load_reference(reference, &rc.amount_column, &rc.month_column)
        .with_context(|| format!("loading {}", reference.display()))?;
    let entries = read_ledger(ledger).with_context(|| format!("reading {}", ledger.display()))?;

    println!(
        "Reference: {} rows ({} dropped) | Ledger: {} rows",
        table.entries.len(),
        table.dropped,
        entries.len()
    );

    let mut disambiguator: Box<dyn Disambiguator> = if no_prompt {
        Box::new(AbstainDisambiguator)
    } else {
        Box::new(ConsoleDisambiguator::stdio(rc.description_width))
    };

    let results = reconcile(&table, &entries, cfg.match_options(), disambiguator.as_mut());
    write_report(output, &table, &results).with_context(|| format!("writing {}", output.display()))?;

    let summary = ReconciliationSummary::from_results(&results);
    println!("\nFound: {} (unique {}, chosen {})", summary.found(), summary.unique, summary.chosen);
    println!("Not found: {}", summary.not_found);
    println!("Skipped (ambiguous): {}", summary.abstained);
    println!("Report: {}", output.display());

    Ok(())
}

fn periods(ledger: &Path, input: &Path) -> Result<()> {
    let entries = read_ledger(ledger).with_context(|| format!("reading {}", ledger.display()))?;
    let report = period_report(&entries, input);

    if report.periods.is_empty() {
        println!("No periods in {}", ledger.display());
        return Ok(());
    }

    println!("## Periods\n");
    for p in &report.periods {
        println!("- {}", p);
    }

    if !report.gaps.is_empty() {
        println!("\n## Missing months\n");
        for p in &report.gaps {
            println!("- {}", p.numeric_label());
        }
    }

    if !report.missing_documents.is_empty() {
        println!("\n## Documents no longer in {}\n", input.display());
        for (doc, period) in &report.missing_documents {
            match period {
                Some(p) => println!("- {} ({})", doc, p),
                None => println!("- {}", doc),
            }
        }
    }

    Ok(())
}

fn dump(file: &Path) -> Result<()> {
    let doc = Document::load(file).with_context(|| format!("loading {}", file.display()))?;
    for (i, page) in doc.pages.iter().enumerate() {
        println!("=== {} page {} ===", doc.name, i + 1);
        println!("{}", page.text());
    }
    Ok(())
}
