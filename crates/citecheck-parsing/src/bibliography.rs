use std::ops::Range;

use citecheck_core::{BibEntry, CitationType};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::authors::{extract_author_year, extract_title};
use crate::citations::char_offset;
use crate::config::ParsingConfig;
use crate::section;

/// Bibliography entries plus the section they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBibliography {
    pub entries: Vec<BibEntry>,
    /// Trimmed section body; empty when no section was found.
    pub section_text: String,
    /// Header-to-end byte range of the section in the document.
    pub span: Option<Range<usize>>,
}

/// Extracts numbered (`[1] ...`) and author-year (`Smith, J. ...`) entries
/// from a document's reference list. Both layouts may appear in the same
/// list; numbered entries come first in the output.
pub struct BibliographyExtractor {
    config: ParsingConfig,
}

impl Default for BibliographyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BibliographyExtractor {
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Locate the bibliography (optionally under a custom header) and parse
    /// its entries. A document without one yields no entries.
    pub fn extract(&self, text: &str, custom_header: Option<&str>) -> ParsedBibliography {
        let Some(section) =
            section::find_bibliography_section_with_config(text, custom_header, &self.config)
        else {
            tracing::debug!("no bibliography section found");
            return ParsedBibliography::default();
        };

        let mut entries = parse_numbered_entries(section.text);
        entries.extend(parse_author_year_entries(section.text));
        tracing::debug!(entries = entries.len(), "bibliography parsed");

        ParsedBibliography {
            entries,
            section_text: section.text.to_string(),
            span: Some(section.span()),
        }
    }
}

static NUMBER_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\[(\d+)\]").unwrap());

/// Entries introduced by a `[n]` marker at line start. Each runs to the next
/// marker; positions are character offsets within `section`.
pub fn parse_numbered_entries(section: &str) -> Vec<BibEntry> {
    let markers: Vec<_> = NUMBER_MARKER_RE.captures_iter(section).collect();
    let mut entries = Vec::new();

    for (i, caps) in markers.iter().enumerate() {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = markers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(section.len(), |m| m.start());
        let content = section[whole.end()..end].trim();
        if content.is_empty() {
            continue;
        }
        let Ok(number) = digits.as_str().parse::<u32>() else {
            tracing::debug!(marker = whole.as_str(), "numbered entry marker out of range");
            continue;
        };

        let (authors, year) = extract_author_year(content);
        let raw = format!("[{}] {}", number, content);
        if let Some(entry) = BibEntry::new(
            raw,
            authors,
            year,
            Some(number),
            char_offset(section, whole.start()),
            CitationType::Numeric,
        ) {
            entries.push(entry.with_title(extract_title(content)));
        }
    }
    entries
}

/// Entries whose first line looks like `Surname, Given` (`Smith, J.`,
/// `Müller, Karl`). Continuation lines are joined with spaces; lines that
/// belong to a numbered entry are skipped.
pub fn parse_author_year_entries(section: &str) -> Vec<BibEntry> {
    static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^[A-Z\x{00C0}-\x{00D6}\x{00D8}-\x{00DE}\x{0100}-\x{024F}][a-zA-Z\x{00C0}-\x{024F}'\-]+,\s+[A-Z\x{00C0}-\x{00D6}\x{00D8}-\x{00DE}\x{0100}-\x{024F}]",
        )
        .unwrap()
    });
    static NUMBERED_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\d+\]").unwrap());

    let mut entries = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_pos = 0;
    let mut in_numbered = false;
    let mut offset = 0;

    for line in section.split('\n') {
        let line_start = offset;
        offset += line.len() + 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let trimmed_pos = line_start + (line.len() - line.trim_start().len());

        if NUMBERED_LINE_RE.is_match(trimmed) {
            flush_entry(&mut entries, &mut current, current_pos);
            in_numbered = true;
            continue;
        }

        let boundary = BOUNDARY_RE.is_match(trimmed);
        if in_numbered && !boundary {
            continue;
        }
        in_numbered = false;

        if boundary || current.is_empty() {
            flush_entry(&mut entries, &mut current, current_pos);
            current_pos = char_offset(section, trimmed_pos);
        }
        current.push(trimmed);
    }
    flush_entry(&mut entries, &mut current, current_pos);
    entries
}

fn flush_entry(entries: &mut Vec<BibEntry>, lines: &mut Vec<&str>, position: usize) {
    if lines.is_empty() {
        return;
    }
    let text = lines.join(" ");
    lines.clear();
    if let Some(entry) = author_year_entry(&text, position) {
        entries.push(entry);
    }
}

/// Build an author-year (or MLA, when no parenthesized year is present) entry;
/// `None` when no author can be extracted.
fn author_year_entry(text: &str, position: usize) -> Option<BibEntry> {
    static PAREN_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\d{4}\)").unwrap());

    let (authors, year) = extract_author_year(text);
    if authors.is_empty() {
        return None;
    }
    let entry_type = if PAREN_YEAR_RE.is_match(text) {
        CitationType::AuthorYear
    } else {
        CitationType::Mla
    };
    BibEntry::new(text, authors, year, None, position, entry_type)
        .map(|e| e.with_title(extract_title(text)))
}
