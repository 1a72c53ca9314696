//! Page-segmented statement text.
//!
//! PDFs go through `pdf-extract` page by page; `.txt` files (already
//! extracted text, one page per form feed) are read as-is, which is what the
//! tests use.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IngestError;

const PAGE_BREAK: char = '\u{c}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    text: String,
}

impl Page {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Whitespace-separated word tokens in reading order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub pages: Vec<Page>,
}

impl Document {
    /// One page per string, as the PDF extractor returns them.
    pub fn from_pages<S: Into<String>>(name: impl Into<String>, pages: Vec<S>) -> Self {
        Self {
            name: name.into(),
            pages: pages.into_iter().map(Page::new).collect(),
        }
    }

    /// Split `text` into pages on form feeds.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let mut pages: Vec<Page> = text.split(PAGE_BREAK).map(Page::new).collect();
        // a trailing form feed closes the last page rather than opening a new one
        if pages.len() > 1 && pages.last().is_some_and(|p| p.text.trim().is_empty()) {
            pages.pop();
        }
        Self {
            name: name.into(),
            pages,
        }
    }

    pub fn load(path: &Path) -> Result<Self, IngestError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let io_err = |source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        };

        match extension(path).as_deref() {
            Some("pdf") => {
                let bytes = fs::read(path).map_err(io_err)?;
                let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
                    IngestError::Pdf {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    }
                })?;
                Ok(Self::from_pages(name, pages))
            }
            Some("txt") => {
                let text = fs::read_to_string(path).map_err(io_err)?;
                Ok(Self::from_text(name, &text))
            }
            _ => Err(IngestError::UnsupportedDocument(path.to_path_buf())),
        }
    }

    /// Every line of every page, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.lines())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// Statement files (`.pdf`, `.txt`) directly inside `dir`, sorted by name.
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let entries = fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| IngestError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_file() && matches!(extension(&path).as_deref(), Some("pdf" | "txt")) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_split_on_form_feed() {
        let doc = Document::from_text("a.txt", "one\ntwo\u{c}three\u{c}");
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.lines().collect::<Vec<_>>(), ["one", "two", "three"]);
    }

    #[test]
    fn test_pages_kept_as_extracted() {
        let doc = Document::from_pages("a.pdf", vec!["one\ntwo", "", "three"]);
        assert_eq!(doc.pages.len(), 3);
        assert_eq!(doc.pages[2].text(), "three");
        assert_eq!(doc.lines().collect::<Vec<_>>(), ["one", "two", "three"]);
    }

    #[test]
    fn test_unreadable_pdf_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, "not a pdf").unwrap();
        assert!(matches!(Document::load(&path), Err(IngestError::Pdf { .. })));
    }

    #[test]
    fn test_single_page_without_form_feed() {
        let doc = Document::from_text("a.txt", "SaldodeContaCorrenteem01/03   1.000,00\nx");
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(
            doc.pages[0].words().collect::<Vec<_>>(),
            ["SaldodeContaCorrenteem01/03", "1.000,00", "x"]
        );
    }

    #[test]
    fn test_list_and_load_text_documents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "page b").unwrap();
        fs::write(dir.path().join("a.TXT"), "page a").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let docs = list_documents(dir.path()).unwrap();
        let names: Vec<_> = docs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.TXT", "b.txt"]);

        let doc = Document::load(&docs[1]).unwrap();
        assert_eq!(doc.name, "b.txt");
        assert_eq!(doc.pages[0].text(), "page b");

        assert!(matches!(
            Document::load(&dir.path().join("notes.md")),
            Err(IngestError::UnsupportedDocument(_))
        ));
    }
}
