use std::ops::Range;

use citecheck_core::Citation;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::authors::{split_citation_authors, strip_citation_prefix};
use crate::config::ParsingConfig;
use crate::section;
use crate::suppression::{SuppressionTable, contains_keyword};

/// Uppercase Latin and extended-Latin letters that may start a surname.
const UPPER: &str = r"A-Z\x{00C0}-\x{00D6}\x{00D8}-\x{00DE}\x{0100}-\x{024F}";
/// Letters that may continue a surname.
const LETTER: &str = r"a-zA-Z\x{00C0}-\x{024F}";

fn is_name_initial(c: char) -> bool {
    c.is_ascii_uppercase()
        || ('\u{00C0}'..='\u{00D6}').contains(&c)
        || ('\u{00D8}'..='\u{00DE}').contains(&c)
        || ('\u{0100}'..='\u{024F}').contains(&c)
}

/// Author list shared by the narrative and bare patterns: names joined by
/// `, `, `, and `, `, & `, ` and ` or ` & `.
fn name_list_pattern() -> String {
    format!(
        r"([{u}][{l}'\-]+(?:(?:,\s+(?:and\s+|&\s+)?|\s+(?:and|&)\s+)[{u}][{l}'\-]+)*)",
        u = UPPER,
        l = LETTER
    )
}

/// Half-open byte intervals already consumed by an earlier detection stage.
#[derive(Debug, Clone, Default)]
pub struct ClaimedSpans {
    spans: Vec<Range<usize>>,
}

impl ClaimedSpans {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, span: Range<usize>) {
        if !span.is_empty() {
            self.spans.push(span);
        }
    }

    /// Whether `pos` falls inside any claimed interval.
    pub fn covers(&self, pos: usize) -> bool {
        self.spans.iter().any(|s| s.contains(&pos))
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Detects in-text citations in five ordered stages: parenthetical
/// author-year, narrative author-year, bare author-year inside notes
/// sections, MLA author-page, and bracketed numeric.
///
/// A match is dropped when its start lies inside a span claimed by an
/// earlier stage. Output is ordered by stage, then by position.
pub struct CitationExtractor {
    config: ParsingConfig,
    non_authors: SuppressionTable,
    prefixes: Vec<String>,
    numeric_keywords: Vec<String>,
}

impl Default for CitationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationExtractor {
    pub fn new() -> Self {
        Self::with_config(ParsingConfig::default())
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        let non_authors = SuppressionTable::new(config.non_author_words());
        let prefixes = config.citation_prefixes();
        let numeric_keywords = config.numeric_keywords();
        Self {
            config,
            non_authors,
            prefixes,
            numeric_keywords,
        }
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Extract every citation in `text`.
    pub fn extract(&self, text: &str) -> Vec<Citation> {
        self.extract_excluding(text, &[])
    }

    /// Extract citations, treating `excluded` ranges (e.g. the reference
    /// list) as already claimed.
    pub fn extract_excluding(&self, text: &str, excluded: &[Range<usize>]) -> Vec<Citation> {
        let mut claimed = ClaimedSpans::new();
        for range in excluded {
            claimed.claim(range.clone());
        }

        let mut citations = Vec::new();
        self.scan_parenthetical(text, &mut claimed, &mut citations);
        self.scan_narrative(text, &mut claimed, &mut citations);
        self.scan_bare(text, &mut claimed, &mut citations);
        self.scan_mla(text, &mut claimed, &mut citations);
        self.scan_numeric(text, &mut claimed, &mut citations);

        for citation in &mut citations {
            citation.position = char_offset(text, citation.position);
        }
        citations
    }

    /// Prefix-stripped author string, or `None` if its leading word is on
    /// the non-author blocklist.
    fn author_string<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let stripped = strip_citation_prefix(raw, &self.prefixes);
        if let Some(kind) = self.non_authors.leading_word_kind(stripped) {
            tracing::debug!(fragment = stripped, ?kind, "suppressed non-author fragment");
            return None;
        }
        Some(stripped)
    }

    /// Stage 1: `(Smith, 2020)`, `(Smith 2020; Jones, 2019)`, `(A 2020, B 2021)`.
    fn scan_parenthetical(&self, text: &str, claimed: &mut ClaimedSpans, out: &mut Vec<Citation>) {
        static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^()]+)\)").unwrap());
        static HAS_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());
        static PART_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(&format!(
                r"([{u}][{l}\s&,]+(?:\set\sal\.)?),?\s*(\d{{4}}[a-z]?)",
                u = UPPER,
                l = LETTER
            ))
            .unwrap()
        });

        let before = out.len();
        for caps in PAREN_RE.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if claimed.covers(whole.start()) || !HAS_YEAR_RE.is_match(inner.as_str()) {
                continue;
            }

            let mut added = false;
            for part in split_parenthetical(inner.as_str()) {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                let Some(m) = PART_RE.captures(part) else {
                    continue;
                };
                let (Some(names), Some(year)) = (m.get(1), m.get(2)) else {
                    continue;
                };
                let Some(author_str) = self.author_string(names.as_str()) else {
                    continue;
                };
                let authors = split_citation_authors(author_str);
                if authors.is_empty() {
                    continue;
                }
                out.push(Citation::author_year(
                    format!("({})", part),
                    whole.start(),
                    authors,
                    year.as_str(),
                ));
                added = true;
            }
            if added {
                claimed.claim(whole.range());
            }
        }
        tracing::debug!(count = out.len() - before, "parenthetical stage complete");
    }

    /// Stage 2: `Smith (2020)`, `Smith and Jones (2020)`, `Smith et al. (2020)`.
    fn scan_narrative(&self, text: &str, claimed: &mut ClaimedSpans, out: &mut Vec<Citation>) {
        static NARRATIVE_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(&format!(
                r"{}(?:\s+et\s+al\.?)?\s+\((\d{{4}}[a-z]?)\)",
                name_list_pattern()
            ))
            .unwrap()
        });

        let before = out.len();
        let mut at = 0;
        while let Some(caps) = NARRATIVE_RE.captures_at(text, at) {
            let Some(whole) = caps.get(0) else { break };
            if follows_comma_space(text, whole.start()) {
                at = next_char_boundary(text, whole.start());
                continue;
            }
            at = whole.end();

            if claimed.covers(whole.start()) {
                continue;
            }
            let (Some(names), Some(year)) = (caps.get(1), caps.get(2)) else {
                continue;
            };

            let (start, names) = anchor_to_last_name(names.start(), names.as_str());
            let Some(author_str) = self.author_string(names) else {
                continue;
            };
            let authors = split_citation_authors(author_str);
            if authors.is_empty() {
                continue;
            }
            out.push(Citation::author_year(
                &text[start..whole.end()],
                start,
                authors,
                year.as_str(),
            ));
            claimed.claim(whole.range());
        }
        tracing::debug!(count = out.len() - before, "narrative stage complete");
    }

    /// Stage 3: `Smith 2020.` without parentheses, only inside notes sections.
    fn scan_bare(&self, text: &str, claimed: &mut ClaimedSpans, out: &mut Vec<Citation>) {
        static BARE_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(&format!(
                r"{}(?:\s+et\s+al\.?)?\s+(\d{{4}}[a-z]?)(?:[.;,:\s]|$)",
                name_list_pattern()
            ))
            .unwrap()
        });
        static INITIAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s+[A-Z]\.\s*$").unwrap());

        let notes = section::find_notes_sections_with_config(text, &self.config);
        if notes.is_empty() {
            return;
        }

        let before = out.len();
        for caps in BARE_RE.captures_iter(text) {
            let (Some(whole), Some(names), Some(year)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let start = whole.start();
            if claimed.covers(start) || !notes.iter().any(|n| n.contains(&start)) {
                continue;
            }
            // "Smith, J. 2020" is a reference-list line, not a citation.
            let context = window_before(text, start, self.config.initial_guard_window);
            if INITIAL_RE.is_match(context) {
                continue;
            }
            let Some(author_str) = self.author_string(names.as_str()) else {
                continue;
            };
            let authors = split_citation_authors(author_str);
            if authors.is_empty() {
                continue;
            }
            out.push(Citation::author_year(
                &text[start..year.end()],
                start,
                authors,
                year.as_str(),
            ));
            claimed.claim(start..year.end());
        }
        tracing::debug!(count = out.len() - before, "bare stage complete");
    }

    /// Stage 4: `(Smith 45)`, `(Smith and Jones 45-67)`.
    fn scan_mla(&self, text: &str, claimed: &mut ClaimedSpans, out: &mut Vec<Citation>) {
        static MLA_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(&format!(
                r"\(([{u}][{l}\s&]+(?:\set\sal\.)?)\s+(\d+(?:-\d+)?)\)",
                u = UPPER,
                l = LETTER
            ))
            .unwrap()
        });

        let before = out.len();
        for caps in MLA_RE.captures_iter(text) {
            let (Some(whole), Some(names), Some(page)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if claimed.covers(whole.start()) {
                continue;
            }
            let page = page.as_str();
            if page.len() == 4 && page.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let Some(author_str) = self.author_string(names.as_str()) else {
                continue;
            };
            let authors = split_citation_authors(author_str);
            if authors.is_empty() {
                continue;
            }
            out.push(Citation::mla(whole.as_str(), whole.start(), authors, page));
            claimed.claim(whole.range());
        }
        tracing::debug!(count = out.len() - before, "mla stage complete");
    }

    /// Stage 5: `[3]`, `[1-3]`, `[1, 2, 5]`, one citation per number.
    fn scan_numeric(&self, text: &str, claimed: &mut ClaimedSpans, out: &mut Vec<Citation>) {
        static NUMERIC_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\[(\d+(?:\s*[-,\x{2013}]\s*\d+)*)\]").unwrap());

        let before = out.len();
        for caps in NUMERIC_RE.captures_iter(text) {
            let (Some(whole), Some(list)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if claimed.covers(whole.start()) {
                continue;
            }
            let context = window_before(text, whole.start(), self.config.numeric_context_window);
            if let Some(keyword) = self
                .numeric_keywords
                .iter()
                .find(|k| contains_keyword(context, k))
            {
                tracing::debug!(marker = whole.as_str(), keyword = %keyword, "cross-reference, not a citation");
                continue;
            }

            for number in expand_numbers(list.as_str(), self.config.max_range_span) {
                out.push(Citation::numeric(
                    format!("[{}]", number),
                    whole.start(),
                    number,
                ));
            }
            claimed.claim(whole.range());
        }
        tracing::debug!(count = out.len() - before, "numeric stage complete");
    }
}

/// Split the body of a parenthetical into individual citations: on `;` if
/// present, else after each `YEAR, ` that precedes a capitalized name.
fn split_parenthetical(inner: &str) -> Vec<String> {
    static YEAR_COMMA_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(\d{4}[a-z]?),\s+").unwrap());

    if inner.contains(';') {
        return inner.split(';').map(str::to_string).collect();
    }

    let mut parts = Vec::new();
    let mut last = 0;
    for caps in YEAR_COMMA_RE.captures_iter(inner) {
        let (Some(whole), Some(year)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !inner[whole.end()..].chars().next().is_some_and(is_name_initial) {
            continue;
        }
        parts.push(format!("{} {}", &inner[last..year.start()], year.as_str()));
        last = whole.end();
    }
    parts.push(inner[last..].to_string());
    parts
}

/// A comma-joined name list with no `and`/`&` is not a real author list
/// ("Later, Smith"); keep only its final name. Returns the new start offset
/// and name string.
fn anchor_to_last_name(start: usize, names: &str) -> (usize, &str) {
    static CONJ_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\band\b|&").unwrap());

    if !names.contains(',') || CONJ_RE.is_match(names) {
        return (start, names);
    }
    match names.rfind(',') {
        Some(idx) => {
            let tail = &names[idx + 1..];
            let trimmed = tail.trim_start();
            let offset = idx + 1 + (tail.len() - trimmed.len());
            (start + offset, trimmed)
        }
        None => (start, names),
    }
}

/// Expand `1-3, 5` into `[1, 2, 3, 5]`. Reversed ranges, ranges wider than
/// `max_span` and unparseable items are skipped.
pub(crate) fn expand_numbers(list: &str, max_span: u32) -> Vec<u32> {
    let mut numbers = Vec::new();
    for item in list.split(',') {
        let item = item.trim();
        if let Some((a, b)) = item.split_once(['-', '\u{2013}']) {
            let (Ok(a), Ok(b)) = (a.trim().parse::<u32>(), b.trim().parse::<u32>()) else {
                continue;
            };
            if a > b || b - a > max_span {
                tracing::debug!(range = item, "skipping malformed numeric range");
                continue;
            }
            numbers.extend(a..=b);
        } else if let Ok(n) = item.parse::<u32>() {
            numbers.push(n);
        }
    }
    numbers
}

/// Number of characters before byte offset `byte`.
pub(crate) fn char_offset(text: &str, byte: usize) -> usize {
    text.char_indices().take_while(|(i, _)| *i < byte).count()
}

/// The `chars` characters preceding byte offset `pos`.
fn window_before(text: &str, pos: usize, chars: usize) -> &str {
    let start = text[..pos]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map_or(pos, |(i, _)| i);
    &text[start..pos]
}

/// Whether the two characters before `pos` are a comma and whitespace.
fn follows_comma_space(text: &str, pos: usize) -> bool {
    let mut prev = text[..pos].chars().rev();
    matches!(
        (prev.next(), prev.next()),
        (Some(ws), Some(',')) if ws.is_whitespace()
    )
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}
