use anyhow::{Context, Result};
use extrato_ingest::{ExtractOptions, StatementLayout};
use extrato_recon::MatchOptions;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "extrato.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsSection,
    pub extraction: ExtractionSection,
    pub reconciliation: ReconciliationSection,
    pub layout: StatementLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Directory scanned for statement PDFs (and `.txt` dumps).
    pub input_dir: PathBuf,
    pub ledger_csv: PathBuf,
    pub reference_csv: PathBuf,
    pub report_csv: PathBuf,
    /// The previous ledger is moved here before each extraction.
    pub backup_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSection {
    pub balance_threshold: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationSection {
    pub tolerance: Decimal,
    pub amount_column: String,
    pub month_column: String,
    /// Characters of description shown per candidate when prompting.
    pub description_width: usize,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            ledger_csv: PathBuf::from("planilhas/movimentacoes.csv"),
            reference_csv: PathBuf::from("planilhas/referencia.csv"),
            report_csv: PathBuf::from("planilhas/verificacao_saida.csv"),
            backup_dir: PathBuf::from("last_planilhas"),
        }
    }
}

impl Default for ExtractionSection {
    fn default() -> Self {
        Self {
            balance_threshold: ExtractOptions::default().balance_threshold,
        }
    }
}

impl Default for ReconciliationSection {
    fn default() -> Self {
        Self {
            tolerance: MatchOptions::default().tolerance,
            amount_column: "Valor".to_string(),
            month_column: "Mês".to_string(),
            description_width: 60,
        }
    }
}

impl Config {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            layout: self.layout.clone(),
            balance_threshold: self.extraction.balance_threshold,
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            tolerance: self.reconciliation.tolerance,
        }
    }
}

pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.reconciliation.month_column, "Mês");
    }

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extrato.toml");
        init_config(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extrato.toml");
        fs::write(
            &path,
            "[paths]\ninput_dir = \"extratos\"\n\n[reconciliation]\ntolerance = \"0.10\"\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.paths.input_dir, PathBuf::from("extratos"));
        assert_eq!(cfg.paths.backup_dir, PathBuf::from("last_planilhas"));
        assert_eq!(cfg.match_options().tolerance, Decimal::new(10, 2));
        assert_eq!(cfg.layout, StatementLayout::default());
    }
}
