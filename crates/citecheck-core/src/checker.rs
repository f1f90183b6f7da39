use crate::matching::{find_missing, find_uncited, find_year_mismatches};
use crate::{BibEntry, CheckResult, Citation};

/// Cross-check extracted citations against extracted bibliography entries.
///
/// Missing entries are computed first; year mismatches are only searched for
/// among those, since a citation whose year agrees with a matching entry is
/// never missing.
pub fn aggregate(citations: Vec<Citation>, bib_entries: Vec<BibEntry>) -> CheckResult {
    let missing_bib_entries = find_missing(&citations, &bib_entries);
    let uncited_references = find_uncited(&citations, &bib_entries);
    let year_mismatches = find_year_mismatches(&missing_bib_entries, &bib_entries);

    tracing::info!(
        citations = citations.len(),
        bib_entries = bib_entries.len(),
        missing = missing_bib_entries.len(),
        uncited = uncited_references.len(),
        year_mismatches = year_mismatches.len(),
        "cross-check complete"
    );

    CheckResult {
        citations,
        bib_entries,
        missing_bib_entries,
        uncited_references,
        year_mismatches,
    }
}
