use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// The located bibliography of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibliographySection<'a> {
    /// Byte offset of the header line.
    pub header_start: usize,
    /// Byte offset of the first non-blank character after the header.
    pub body_start: usize,
    /// Byte offset where the section ends (next trailing header or end of text).
    pub end: usize,
    /// Section body, trimmed.
    pub text: &'a str,
}

impl BibliographySection<'_> {
    /// Header plus body: the region that is not in-text citation territory.
    pub fn span(&self) -> Range<usize> {
        self.header_start..self.end
    }
}

/// Build the line regex for one header name: optional Markdown `#`, any case,
/// flexible inner whitespace, optional trailing colon.
fn header_regex(header: &str) -> Option<Regex> {
    let words: Vec<String> = header.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return None;
    }
    let pattern = format!(
        r"(?mi)^[ \t]*(?:#+[ \t]*)?{}[ \t]*:?[ \t]*\r?$",
        words.join(r"[ \t]+")
    );
    Regex::new(&pattern).ok()
}

/// Locate the bibliography section.
///
/// Headers are tried in priority order (References, Bibliography, Works Cited,
/// ...); when `custom_header` is given only that header is tried. The section
/// runs from the header line to the next Acknowledgments / Appendix / Notes
/// style header, or to the end of the text.
pub fn find_bibliography_section<'a>(
    text: &'a str,
    custom_header: Option<&str>,
) -> Option<BibliographySection<'a>> {
    find_bibliography_section_with_config(text, custom_header, &ParsingConfig::default())
}

/// Config-aware version of [`find_bibliography_section`].
pub(crate) fn find_bibliography_section_with_config<'a>(
    text: &'a str,
    custom_header: Option<&str>,
    config: &ParsingConfig,
) -> Option<BibliographySection<'a>> {
    static END_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?mi)^[ \t]*(?:#+[ \t]*)?(?:acknowledge?ments?|appendix|supplementary[ \t]+materials?|notes|endnotes|footnotes)[ \t]*:?[ \t]*\r?$").unwrap()
    });

    let headers = match custom_header.map(str::trim).filter(|h| !h.is_empty()) {
        Some(custom) => vec![custom.to_string()],
        None => config.bibliography_headers(),
    };

    let end_re = config.section_end_re.as_ref().unwrap_or(&END_RE);

    for header in &headers {
        let Some(re) = header_regex(header) else {
            continue;
        };
        let Some(m) = re.find(text) else {
            continue;
        };

        let rest = &text[m.end()..];
        let end = end_re
            .find(rest)
            .map_or(text.len(), |e| m.end() + e.start());

        let body = &text[m.end()..end];
        let leading = body.len() - body.trim_start().len();
        let trimmed = body.trim();

        tracing::debug!(header = %header, start = m.start(), end, "bibliography section located");
        return Some(BibliographySection {
            header_start: m.start(),
            body_start: m.end() + leading,
            end,
            text: trimmed,
        });
    }

    None
}

/// Byte ranges of the document's notes sections (Endnotes:, Footnotes:,
/// Notes:). Each starts at its header and ends before the next
/// References / Bibliography / Acknowledgments / Appendix heading line.
pub fn find_notes_sections(text: &str) -> Vec<Range<usize>> {
    find_notes_sections_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`find_notes_sections`].
pub(crate) fn find_notes_sections_with_config(
    text: &str,
    config: &ParsingConfig,
) -> Vec<Range<usize>> {
    static NOTES_END_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\n[ \t]*(?:#+[ \t]*)?(?:References|Bibliography|Works Cited|Acknowledge?ments?|Appendix)[ \t]*:?[ \t]*(?:\r?\n|$)").unwrap()
    });

    let end_re = config.notes_end_re.as_ref().unwrap_or(&NOTES_END_RE);

    let mut sections = Vec::new();
    for header in config.notes_headers() {
        if header.is_empty() {
            continue;
        }
        let Some(start) = text.find(header.as_str()) else {
            continue;
        };
        let end = end_re
            .find(&text[start..])
            .map_or(text.len(), |m| start + m.start());
        sections.push(start..end);
    }
    sections
}
