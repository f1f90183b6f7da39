use std::collections::HashSet;

use crate::authors::{normalize_all, normalize_last_name};
use crate::{BibEntry, Citation, CitationKind, YearMismatch};

/// Lenient correspondence check between a citation and a bibliography entry.
///
/// Numeric citations match on number alone. Author-based citations compare
/// only the first author of each side: equal surnames match, and so does one
/// surname containing the other ("Smith" vs "Smith-Jones"). When both sides
/// carry a year, the years must also be equal.
pub fn matches_bib(citation: &Citation, entry: &BibEntry) -> bool {
    if let CitationKind::Numeric { number } = citation.kind {
        return entry.number == Some(number);
    }

    let (Some(cited), Some(listed)) = (citation.authors().first(), entry.authors.first()) else {
        return false;
    };

    let cited = normalize_last_name(cited);
    let listed = normalize_last_name(listed);
    if cited != listed && !cited.contains(&listed) && !listed.contains(&cited) {
        return false;
    }

    match (citation.year(), entry.year.as_deref()) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Strict author-equality check used only for year-mismatch detection.
///
/// Numeric citations never match. A single cited author against a
/// multi-author entry must equal the entry's first author exactly (so "Lee"
/// does not pair with "Leeds"). Otherwise both lists must have the same
/// length and every cited surname must appear in the entry's surname set.
pub fn authors_match_bib(citation: &Citation, entry: &BibEntry) -> bool {
    if matches!(citation.kind, CitationKind::Numeric { .. }) {
        return false;
    }
    if citation.authors().is_empty() || entry.authors.is_empty() {
        return false;
    }

    let cited = normalize_all(citation.authors());
    let listed = normalize_all(&entry.authors);

    if cited.len() == 1 && listed.len() > 1 {
        return cited[0] == listed[0];
    }

    cited.len() == listed.len() && cited.iter().all(|a| listed.contains(a))
}

/// Citations with no matching entry, one finding per [`Citation::dedup_key`].
pub fn find_missing(citations: &[Citation], entries: &[BibEntry]) -> Vec<Citation> {
    let mut seen = HashSet::new();
    citations
        .iter()
        .filter(|c| !entries.iter().any(|e| matches_bib(c, e)))
        .filter(|c| seen.insert(c.dedup_key()))
        .cloned()
        .collect()
}

/// Entries that no citation matches.
pub fn find_uncited(citations: &[Citation], entries: &[BibEntry]) -> Vec<BibEntry> {
    entries
        .iter()
        .filter(|e| !citations.iter().any(|c| matches_bib(c, e)))
        .cloned()
        .collect()
}

/// Pair missing citations with entries that share their authors but list a
/// different year (typically online-first versus print publication).
///
/// Only citations already reported as missing are considered; both sides must
/// carry a year. Each (citation, entry) pair is emitted at most once.
pub fn find_year_mismatches(missing: &[Citation], entries: &[BibEntry]) -> Vec<YearMismatch> {
    let mut mismatches = Vec::new();
    for citation in missing {
        let Some(cited_year) = citation.year() else {
            continue;
        };
        for entry in entries {
            let Some(listed_year) = entry.year.as_deref() else {
                continue;
            };
            if cited_year != listed_year && authors_match_bib(citation, entry) {
                mismatches.push(YearMismatch {
                    citation: citation.clone(),
                    bib_entry: entry.clone(),
                });
            }
        }
    }
    mismatches
}
