use std::borrow::Cow;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod docx;

pub use citecheck_core::{BackendError, CheckResult};
use citecheck_parsing::CitationChecker;

/// Extensions read directly as UTF-8 text.
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "tex", "latex"];

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported file format: {0}. Supported formats: .txt, .md, .docx, .pdf")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("DOCX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("PDF extraction error: {0}")]
    Backend(#[from] BackendError),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of citecheck-ingest)")]
    NoPdfSupport,
}

/// Read a manuscript into plain text.
///
/// Dispatches on file extension:
/// - `.txt`, `.md`, `.markdown`, `.tex`, `.latex` → UTF-8 text, invalid bytes dropped
/// - `.docx` → body paragraphs, table cells, then footnotes and endnotes
/// - `.pdf` → MuPDF (requires `pdf` feature)
/// - anything else → read as text if it looks like text
///
/// Line endings are normalized to `\n`.
pub fn read_document(path: &Path) -> Result<String, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match ext.as_str() {
        e if TEXT_EXTENSIONS.contains(&e) => read_text(path)?,
        "docx" => docx::read_docx(path)?,
        "pdf" => extract_pdf(path)?,
        _ => {
            let bytes = std::fs::read(path)?;
            if looks_binary(&bytes) {
                let shown = if ext.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{}", ext)
                };
                return Err(IngestError::UnsupportedFormat(shown));
            }
            decode_lossy(&bytes)
        }
    };

    tracing::debug!(path = %path.display(), chars = text.len(), "document read");
    Ok(normalize_newlines(text))
}

/// Read `path` and cross-check it with the default parsing configuration.
pub fn check_file(
    path: &Path,
    bibliography_section_name: Option<&str>,
) -> Result<CheckResult, IngestError> {
    check_file_with(&CitationChecker::new(), path, bibliography_section_name)
}

/// Read `path` and cross-check it with a configured checker.
pub fn check_file_with(
    checker: &CitationChecker,
    path: &Path,
    bibliography_section_name: Option<&str>,
) -> Result<CheckResult, IngestError> {
    let text = read_document(path)?;
    Ok(checker.check(&text, bibliography_section_name))
}

fn read_text(path: &Path) -> Result<String, IngestError> {
    let bytes = std::fs::read(path)?;
    Ok(decode_lossy(&bytes))
}

/// Decode UTF-8, dropping invalid sequences instead of substituting them.
fn decode_lossy(bytes: &[u8]) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => {
            tracing::debug!("dropping invalid UTF-8 sequences");
            s.replace('\u{FFFD}', "")
        }
    }
}

/// NUL bytes in the first 8 KiB mean the file is not text.
fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(8192).any(|&b| b == 0)
}

fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> Result<String, IngestError> {
    use citecheck_core::DocumentBackend;

    let backend = citecheck_pdf_mupdf::MupdfBackend::default();
    Ok(backend.extract_text(path)?)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path) -> Result<String, IngestError> {
    Err(IngestError::NoPdfSupport)
}
