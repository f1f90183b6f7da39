use std::path::Path;

use thiserror::Error;

pub mod authors;
pub mod bibliography;
pub mod citations;
pub mod config;
pub mod section;
pub mod suppression;

pub use bibliography::{BibliographyExtractor, ParsedBibliography};
pub use citations::{CitationExtractor, ClaimedSpans};
pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use section::{BibliographySection, find_bibliography_section, find_notes_sections};
pub use suppression::{SuppressionKind, SuppressionTable};
// Re-export domain types from core (canonical definitions live there)
pub use citecheck_core::{
    BackendError, BibEntry, CheckResult, Citation, CitationKind, CitationType, DocumentBackend,
    YearMismatch,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Cross-check the citations in `text` against its bibliography.
///
/// `bibliography_section_name` replaces the default header list
/// (References, Bibliography, Works Cited, ...) when given.
pub fn check(text: &str, bibliography_section_name: Option<&str>) -> CheckResult {
    CitationChecker::new().check(text, bibliography_section_name)
}

/// Extract a document's text with `backend`, then [`check`] it.
pub fn check_document(
    path: &Path,
    backend: &dyn DocumentBackend,
    bibliography_section_name: Option<&str>,
) -> Result<CheckResult, ParsingError> {
    let text = backend.extract_text(path)?;
    Ok(check(&text, bibliography_section_name))
}

/// The full pipeline: locate the bibliography, extract citations from the
/// rest of the document, then aggregate the cross-check findings.
pub struct CitationChecker {
    citations: CitationExtractor,
    bibliography: BibliographyExtractor,
}

impl Default for CitationChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationChecker {
    pub fn new() -> Self {
        Self::with_config(ParsingConfig::default())
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        Self {
            citations: CitationExtractor::with_config(config.clone()),
            bibliography: BibliographyExtractor::with_config(config),
        }
    }

    pub fn config(&self) -> &ParsingConfig {
        self.citations.config()
    }

    pub fn check(&self, text: &str, bibliography_section_name: Option<&str>) -> CheckResult {
        let parsed = self.bibliography.extract(text, bibliography_section_name);
        let excluded: Vec<_> = parsed.span.iter().cloned().collect();
        let citations = self.citations.extract_excluding(text, &excluded);
        tracing::debug!(
            citations = citations.len(),
            entries = parsed.entries.len(),
            "extraction complete"
        );
        citecheck_core::aggregate(citations, parsed.entries)
    }
}

impl From<&citecheck_core::config_file::ParsingSection> for ParsingConfig {
    /// Extra words from a config file extend the built-in tables.
    fn from(section: &citecheck_core::config_file::ParsingSection) -> Self {
        let mut builder = ParsingConfigBuilder::new();
        for word in section.non_author_words.iter().flatten() {
            builder = builder.add_non_author_word(word.clone(), SuppressionKind::Custom);
        }
        for keyword in section.numeric_keywords.iter().flatten() {
            builder = builder.add_numeric_keyword(keyword.clone());
        }
        // No patterns are set, so compilation cannot fail.
        builder.build().unwrap_or_default()
    }
}
