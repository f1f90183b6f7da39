use std::path::Path;

use mupdf::{Document, TextPageFlags};

use citecheck_core::{BackendError, DocumentBackend};

/// MuPDF-based implementation of [`DocumentBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency so
/// that plain-text and DOCX code paths do not transitively depend on it.
///
/// By default, text in the bottom 5% of each page (footers) and top 4%
/// (headers) is excluded. Journal running heads such as
/// "Smith et al. (2020) / Journal of Things" would otherwise show up as
/// narrative citations on every page.
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    header_exclusion_ratio: Option<f32>,
    /// Rejoin words split across lines with a trailing hyphen.
    dehyphenate: bool,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self {
            footer_exclusion_ratio: Some(0.05),
            header_exclusion_ratio: Some(0.04),
            dehyphenate: true,
        }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    pub fn with_dehyphenation(mut self, enabled: bool) -> Self {
        self.dehyphenate = enabled;
        self
    }
}

impl DocumentBackend for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let page_bounds = page
                .bounds()
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let page_height = page_bounds.y1 - page_bounds.y0;

            let header_threshold = self
                .header_exclusion_ratio
                .map(|r| page_bounds.y0 + page_height * r);
            let footer_threshold = self
                .footer_exclusion_ratio
                .map(|r| page_bounds.y1 - page_height * r);

            let mut lines = Vec::new();
            for block in text_page.blocks() {
                let block_bounds = block.bounds();

                if header_threshold.is_some_and(|t| block_bounds.y1 <= t) {
                    continue;
                }
                if footer_threshold.is_some_and(|t| block_bounds.y0 >= t) {
                    continue;
                }

                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    lines.push(line_text);
                }
            }
            pages_text.push(join_lines(&lines, self.dehyphenate));
        }

        tracing::debug!(path = %path.display(), pages = pages_text.len(), "pdf text extracted");
        Ok(pages_text.join("\n"))
    }
}

/// Join extracted lines with newlines. With `dehyphenate`, a line ending in
/// `letter-` followed by a line starting with a lowercase letter is merged
/// ("cita-" + "tion" becomes "citation").
pub fn join_lines(lines: &[String], dehyphenate: bool) -> String {
    let mut out = String::new();
    let mut glue_next = false;

    for line in lines {
        let line = line.trim_end();
        let starts_lower = line.chars().next().is_some_and(|c| c.is_lowercase());
        if glue_next && starts_lower {
            out.pop(); // the hyphen
        } else if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);

        let mut tail = line.chars().rev();
        glue_next = dehyphenate
            && matches!((tail.next(), tail.next()), (Some('-'), Some(c)) if c.is_alphabetic());
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_join_plain_lines() {
        let text = join_lines(&lines(&["References", "Smith, J. (2020)."]), true);
        assert_eq!(text, "References\nSmith, J. (2020).\n");
    }

    #[test]
    fn test_dehyphenate_lowercase_continuation() {
        let text = join_lines(&lines(&["the cita-", "tion was (Smith, 2020)."]), true);
        assert_eq!(text, "the citation was (Smith, 2020).\n");
    }

    #[test]
    fn test_keeps_hyphen_before_capital_or_when_disabled() {
        let text = join_lines(&lines(&["Smith-", "Jones (2020)"]), true);
        assert_eq!(text, "Smith-\nJones (2020)\n");

        let text = join_lines(&lines(&["the cita-", "tion"]), false);
        assert_eq!(text, "the cita-\ntion\n");
    }

    #[test]
    fn test_range_dash_not_joined() {
        let text = join_lines(&lines(&["pages 1-", "10"]), true);
        assert_eq!(text, "pages 1-\n10\n");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(join_lines(&[], true), "");
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = MupdfBackend::new()
            .extract_text(Path::new("/nonexistent/paper.pdf"))
            .unwrap_err();
        assert!(matches!(err, BackendError::OpenError(_)));
    }
}
