use regex::Regex;

use crate::suppression::{
    DEFAULT_CITATION_PREFIXES, DEFAULT_NON_AUTHOR_WORDS, DEFAULT_NUMERIC_KEYWORDS,
    SuppressionKind,
};

/// Bibliography headers, tried in this order.
pub const DEFAULT_BIBLIOGRAPHY_HEADERS: &[&str] = &[
    "references",
    "bibliography",
    "works cited",
    "citations",
    "literature cited",
    "sources",
];

/// Literal headers that open a notes section (case-sensitive).
pub const DEFAULT_NOTES_HEADERS: &[&str] = &["Endnotes:", "Footnotes:", "Notes:"];

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }

    fn push(&mut self, item: T) {
        match self {
            ListOverride::Default => *self = ListOverride::Extend(vec![item]),
            ListOverride::Replace(v) | ListOverride::Extend(v) => v.push(item),
        }
    }
}

/// Configuration for citation and bibliography extraction.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── section.rs ──
    pub(crate) bibliography_headers: ListOverride<String>,
    /// Regex for headers that close the bibliography (Acknowledgments, Notes, ...).
    pub(crate) section_end_re: Option<Regex>,
    pub(crate) notes_headers: ListOverride<String>,
    /// Regex for the heading that closes a notes section.
    pub(crate) notes_end_re: Option<Regex>,

    // ── citations.rs ──
    pub(crate) non_author_words: ListOverride<(String, SuppressionKind)>,
    pub(crate) numeric_keywords: ListOverride<String>,
    pub(crate) citation_prefixes: ListOverride<String>,
    /// Characters inspected before `[n]` for cross-reference keywords (default: 20).
    pub(crate) numeric_context_window: usize,
    /// Characters inspected before a bare citation for a `, X.` initial (default: 50).
    pub(crate) initial_guard_window: usize,
    /// Largest `[a-b]` span that is expanded (default: 1000).
    pub(crate) max_range_span: u32,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            bibliography_headers: ListOverride::Default,
            section_end_re: None,
            notes_headers: ListOverride::Default,
            notes_end_re: None,
            non_author_words: ListOverride::Default,
            numeric_keywords: ListOverride::Default,
            citation_prefixes: ListOverride::Default,
            numeric_context_window: 20,
            initial_guard_window: 50,
            max_range_span: 1000,
        }
    }
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl ParsingConfig {
    pub fn bibliography_headers(&self) -> Vec<String> {
        self.bibliography_headers
            .resolve(&owned(DEFAULT_BIBLIOGRAPHY_HEADERS))
    }

    pub fn notes_headers(&self) -> Vec<String> {
        self.notes_headers.resolve(&owned(DEFAULT_NOTES_HEADERS))
    }

    pub fn non_author_words(&self) -> Vec<(String, SuppressionKind)> {
        let defaults: Vec<(String, SuppressionKind)> = DEFAULT_NON_AUTHOR_WORDS
            .iter()
            .map(|(w, k)| (w.to_string(), *k))
            .collect();
        self.non_author_words.resolve(&defaults)
    }

    pub fn numeric_keywords(&self) -> Vec<String> {
        self.numeric_keywords
            .resolve(&owned(DEFAULT_NUMERIC_KEYWORDS))
    }

    pub fn citation_prefixes(&self) -> Vec<String> {
        self.citation_prefixes
            .resolve(&owned(DEFAULT_CITATION_PREFIXES))
    }

    pub fn max_range_span(&self) -> u32 {
        self.max_range_span
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    bibliography_headers: ListOverride<String>,
    section_end_re: Option<String>,
    notes_headers: ListOverride<String>,
    notes_end_re: Option<String>,
    non_author_words: ListOverride<(String, SuppressionKind)>,
    numeric_keywords: ListOverride<String>,
    citation_prefixes: ListOverride<String>,
    numeric_context_window: Option<usize>,
    initial_guard_window: Option<usize>,
    max_range_span: Option<u32>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Sections ──

    pub fn set_bibliography_headers(mut self, headers: Vec<String>) -> Self {
        self.bibliography_headers = ListOverride::Replace(headers);
        self
    }

    pub fn add_bibliography_header(mut self, header: String) -> Self {
        self.bibliography_headers.push(header);
        self
    }

    pub fn section_end_regex(mut self, pattern: &str) -> Self {
        self.section_end_re = Some(pattern.to_string());
        self
    }

    pub fn set_notes_headers(mut self, headers: Vec<String>) -> Self {
        self.notes_headers = ListOverride::Replace(headers);
        self
    }

    pub fn add_notes_header(mut self, header: String) -> Self {
        self.notes_headers.push(header);
        self
    }

    pub fn notes_end_regex(mut self, pattern: &str) -> Self {
        self.notes_end_re = Some(pattern.to_string());
        self
    }

    // ── Suppression tables ──

    pub fn set_non_author_words(mut self, words: Vec<(String, SuppressionKind)>) -> Self {
        self.non_author_words = ListOverride::Replace(words);
        self
    }

    pub fn add_non_author_word(mut self, word: String, kind: SuppressionKind) -> Self {
        self.non_author_words.push((word, kind));
        self
    }

    pub fn set_numeric_keywords(mut self, keywords: Vec<String>) -> Self {
        self.numeric_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_numeric_keyword(mut self, keyword: String) -> Self {
        self.numeric_keywords.push(keyword);
        self
    }

    pub fn set_citation_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.citation_prefixes = ListOverride::Replace(prefixes);
        self
    }

    pub fn add_citation_prefix(mut self, prefix: String) -> Self {
        self.citation_prefixes.push(prefix);
        self
    }

    // ── Scalars ──

    pub fn numeric_context_window(mut self, chars: usize) -> Self {
        self.numeric_context_window = Some(chars);
        self
    }

    pub fn initial_guard_window(mut self, chars: usize) -> Self {
        self.initial_guard_window = Some(chars);
        self
    }

    pub fn max_range_span(mut self, span: u32) -> Self {
        self.max_range_span = Some(span);
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };
        let defaults = ParsingConfig::default();

        Ok(ParsingConfig {
            bibliography_headers: self.bibliography_headers,
            section_end_re: compile(self.section_end_re)?,
            notes_headers: self.notes_headers,
            notes_end_re: compile(self.notes_end_re)?,
            non_author_words: self.non_author_words,
            numeric_keywords: self.numeric_keywords,
            citation_prefixes: self.citation_prefixes,
            numeric_context_window: self
                .numeric_context_window
                .unwrap_or(defaults.numeric_context_window),
            initial_guard_window: self
                .initial_guard_window
                .unwrap_or(defaults.initial_guard_window),
            max_range_span: self.max_range_span.unwrap_or(defaults.max_range_span),
        })
    }
}
