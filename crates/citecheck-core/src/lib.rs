use std::fmt;

use serde::Serialize;

pub mod authors;
pub mod backend;
pub mod checker;
pub mod config_file;
pub mod matching;

// Re-export for convenience
pub use authors::normalize_last_name;
pub use backend::{BackendError, DocumentBackend};
pub use checker::aggregate;
pub use matching::{authors_match_bib, matches_bib};

/// Citation style of an in-text citation or bibliography entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CitationType {
    #[serde(rename = "author-year")]
    AuthorYear,
    #[serde(rename = "mla")]
    Mla,
    #[serde(rename = "numeric")]
    Numeric,
}

impl CitationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorYear => "author-year",
            Self::Mla => "mla",
            Self::Numeric => "numeric",
        }
    }
}

impl fmt::Display for CitationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style-specific payload of a [`Citation`].
///
/// Authors are surname tokens as they appeared in the text (e.g. `"Smith"`);
/// comparisons go through [`normalize_last_name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum CitationKind {
    AuthorYear { authors: Vec<String>, year: String },
    Mla { authors: Vec<String>, page: String },
    Numeric { number: u32 },
}

/// One in-text citation occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    /// Exact text of the citation as it appeared in the document.
    pub raw_text: String,
    /// Character offset of the citation in the scanned text.
    pub position: usize,
    #[serde(flatten)]
    pub kind: CitationKind,
}

impl Citation {
    pub fn author_year(
        raw_text: impl Into<String>,
        position: usize,
        authors: Vec<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            position,
            kind: CitationKind::AuthorYear {
                authors,
                year: year.into(),
            },
        }
    }

    pub fn mla(
        raw_text: impl Into<String>,
        position: usize,
        authors: Vec<String>,
        page: impl Into<String>,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            position,
            kind: CitationKind::Mla {
                authors,
                page: page.into(),
            },
        }
    }

    pub fn numeric(raw_text: impl Into<String>, position: usize, number: u32) -> Self {
        Self {
            raw_text: raw_text.into(),
            position,
            kind: CitationKind::Numeric { number },
        }
    }

    /// Author surnames; empty for numeric citations.
    pub fn authors(&self) -> &[String] {
        match &self.kind {
            CitationKind::AuthorYear { authors, .. } | CitationKind::Mla { authors, .. } => {
                authors
            }
            CitationKind::Numeric { .. } => &[],
        }
    }

    pub fn year(&self) -> Option<&str> {
        match &self.kind {
            CitationKind::AuthorYear { year, .. } => Some(year),
            _ => None,
        }
    }

    pub fn page(&self) -> Option<&str> {
        match &self.kind {
            CitationKind::Mla { page, .. } => Some(page),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<u32> {
        match self.kind {
            CitationKind::Numeric { number } => Some(number),
            _ => None,
        }
    }

    pub fn citation_type(&self) -> CitationType {
        match self.kind {
            CitationKind::AuthorYear { .. } => CitationType::AuthorYear,
            CitationKind::Mla { .. } => CitationType::Mla,
            CitationKind::Numeric { .. } => CitationType::Numeric,
        }
    }

    /// Key used to collapse repeated missing citations into one finding:
    /// `[n]` for numeric citations, otherwise the sorted author list joined
    /// with commas, a colon, and the year (empty when absent).
    pub fn dedup_key(&self) -> String {
        match self.kind {
            CitationKind::Numeric { number } => format!("[{}]", number),
            _ => {
                let mut authors: Vec<&str> = self.authors().iter().map(String::as_str).collect();
                authors.sort_unstable();
                format!("{}:{}", authors.join(","), self.year().unwrap_or(""))
            }
        }
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_text)
    }
}

/// One entry of the document's reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibEntry {
    pub raw_text: String,
    pub authors: Vec<String>,
    pub year: Option<String>,
    pub title: Option<String>,
    pub number: Option<u32>,
    /// Character offset of the entry within the bibliography section.
    pub position: usize,
    pub entry_type: CitationType,
}

impl BibEntry {
    /// Build an entry, or `None` when it has neither a number nor any author.
    pub fn new(
        raw_text: impl Into<String>,
        authors: Vec<String>,
        year: Option<String>,
        number: Option<u32>,
        position: usize,
        entry_type: CitationType,
    ) -> Option<Self> {
        if number.is_none() && authors.is_empty() {
            return None;
        }
        Some(Self {
            raw_text: raw_text.into(),
            authors,
            year,
            title: None,
            number,
            position,
            entry_type,
        })
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Short identifier used in reports: `[n]`, `Surname, Year`, or the
    /// first 50 characters of the raw text.
    pub fn display_key(&self) -> String {
        if let Some(n) = self.number {
            return format!("[{}]", n);
        }
        if let (Some(first), Some(year)) = (self.authors.first(), &self.year) {
            let surname = first
                .split(',')
                .next()
                .and_then(|s| s.split_whitespace().last())
                .unwrap_or(first.as_str());
            return format!("{}, {}", surname, year);
        }
        self.raw_text.chars().take(50).collect()
    }
}

impl fmt::Display for BibEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_text)
    }
}

/// A citation and an entry whose authors agree but whose years differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearMismatch {
    pub citation: Citation,
    pub bib_entry: BibEntry,
}

/// Counts shown in report summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub citations: usize,
    pub bib_entries: usize,
    pub missing: usize,
    pub uncited: usize,
    pub year_mismatches: usize,
}

/// Everything one check run found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub citations: Vec<Citation>,
    pub bib_entries: Vec<BibEntry>,
    pub missing_bib_entries: Vec<Citation>,
    pub uncited_references: Vec<BibEntry>,
    pub year_mismatches: Vec<YearMismatch>,
}

impl CheckResult {
    pub fn has_issues(&self) -> bool {
        !self.missing_bib_entries.is_empty()
            || !self.uncited_references.is_empty()
            || !self.year_mismatches.is_empty()
    }

    pub fn summary(&self) -> CheckSummary {
        CheckSummary {
            citations: self.citations.len(),
            bib_entries: self.bib_entries.len(),
            missing: self.missing_bib_entries.len(),
            uncited: self.uncited_references.len(),
            year_mismatches: self.year_mismatches.len(),
        }
    }
}
