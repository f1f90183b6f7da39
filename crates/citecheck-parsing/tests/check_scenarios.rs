use std::collections::BTreeSet;

use citecheck_parsing::{CitationChecker, CitationType, ParsingConfigBuilder, check};

fn numbers(result: &citecheck_parsing::CheckResult) -> BTreeSet<u32> {
    result.citations.iter().filter_map(|c| c.number()).collect()
}

// ── Scenarios ──

#[test]
fn scenario_a_matching_citation_has_no_issues() {
    let text = "Prior work (Smith, 2020) helps.\n\nReferences\nSmith, J. (2020). X. Y.\n";
    let result = check(text, None);
    assert_eq!(result.citations.len(), 1);
    assert_eq!(result.bib_entries.len(), 1);
    assert!(!result.has_issues());
}

#[test]
fn scenario_b_missing_entry() {
    let text = "Prior work (Jones, 2019) helps.\n\nReferences\nSmith, J. (2020).\n";
    let result = check(text, None);
    assert_eq!(result.missing_bib_entries.len(), 1);
    assert_eq!(result.missing_bib_entries[0].raw_text, "(Jones, 2019)");
}

#[test]
fn scenario_c_uncited_references() {
    let text = "Nothing cited here.\n\nReferences\nJones, M. (2021).\nWilliams, A. (2019).\n";
    let result = check(text, None);
    assert_eq!(result.uncited_references.len(), 2);
    assert!(result.missing_bib_entries.is_empty());
}

#[test]
fn scenario_d_year_mismatch() {
    let text = "Findings (Smith, 2023).\n\nReferences\nSmith, John A. 2024.\n";
    let result = check(text, None);
    assert_eq!(result.year_mismatches.len(), 1);
    let mismatch = &result.year_mismatches[0];
    assert_eq!(mismatch.citation.year(), Some("2023"));
    assert_eq!(mismatch.bib_entry.year.as_deref(), Some("2024"));
}

#[test]
fn scenario_e_numeric_uncited() {
    let text = "Shown [1] and [2].\n\nReferences\n[1] A. Smith, \"One,\" 2020.\n[2] B. Jones, \"Two,\" 2021.\n[3] C. Lee, \"Three,\" 2019.\n";
    let result = check(text, None);
    assert_eq!(result.bib_entries.len(), 3);
    assert!(result.missing_bib_entries.is_empty());
    assert_eq!(result.uncited_references.len(), 1);
    assert_eq!(result.uncited_references[0].number, Some(3));
}

// ── Properties ──

#[test]
fn check_is_idempotent() {
    let text = "A (Smith, 2020), B [4], Brown (2019).\n\nReferences\nSmith, J. (2020). T.\n";
    assert_eq!(check(text, None), check(text, None));
}

#[test]
fn numeric_lists_and_ranges_expand() {
    let result = check("Cited [1], then [2,3,5], then [10-12].", None);
    assert_eq!(numbers(&result), BTreeSet::from([1, 2, 3, 5, 10, 11, 12]));
}

#[test]
fn repeated_missing_citation_reported_once() {
    for k in 1..=4 {
        let body = "Smith (2020) says so. ".repeat(k);
        let text = format!("{}\n\nReferences\nJones, M. (2021). T.\n", body);
        let result = check(&text, None);
        assert_eq!(result.citations.len(), k);
        assert_eq!(result.missing_bib_entries.len(), 1);
    }
}

#[test]
fn missing_and_matched_are_disjoint() {
    let text = "(Smith, 2020) (Jones, 2019) [7]\n\nReferences\nSmith, J. (2020). T.\nLee, K. (2018). U.\n";
    let result = check(text, None);
    for missing in &result.missing_bib_entries {
        assert!(!result.bib_entries.iter().any(|e| citecheck_core::matches_bib(missing, e)));
    }
    for uncited in &result.uncited_references {
        assert!(!result.citations.iter().any(|c| citecheck_core::matches_bib(c, uncited)));
    }
    assert_eq!(result.missing_bib_entries.len(), 2);
    assert_eq!(result.uncited_references.len(), 1);
}

#[test]
fn year_mismatches_come_from_missing_citations() {
    let text = "Smith (2023) and Lee (2019) and (Park, 2020).\n\nReferences\nSmith, J. (2024). T.\nLee, K., & Park, M. (2021). U.\nPark, M. (2020). V.\n";
    let result = check(text, None);
    assert!(!result.year_mismatches.is_empty());
    for m in &result.year_mismatches {
        assert!(result.missing_bib_entries.contains(&m.citation));
        assert_ne!(m.citation.year(), m.bib_entry.year.as_deref());
        assert!(citecheck_core::authors_match_bib(&m.citation, &m.bib_entry));
    }
}

// ── Whole documents ──

#[test]
fn apa_document_without_issues() {
    let text = "
Recent studies (Smith, 2020) show important results. Multiple
researchers agree (Johnson, 2021).

References:
Smith, J. (2020). A Study on Citations. Journal of Research.
Johnson, M. (2021). Advanced Methods. Science Press.
";
    let result = check(text, None);
    assert!(!result.has_issues());
    assert_eq!(result.citations.len(), 2);
    assert_eq!(result.bib_entries.len(), 2);
    assert_eq!(result.bib_entries[0].title.as_deref(), Some("A Study on Citations"));
}

#[test]
fn et_al_matches_multi_author_entry() {
    let text = "
Research (Smith et al., 2020) is important.

References:
Smith, J., Jones, M., & Lee, K. (2020). Multi-Author Work. Publisher.
";
    let result = check(text, None);
    assert!(!result.has_issues());
    assert_eq!(result.bib_entries[0].authors, vec!["Smith", "Jones", "Lee"]);
}

#[test]
fn inverted_full_names_do_not_leave_uncited_entries() {
    let text = "
Studies by Smith (2020) and Brown and Williams (2019) agree.

References:
Smith, John (2020). Article Title. Journal Name.
Brown, Thomas, and Williams, Sarah (2019). Another. Press.
";
    let result = check(text, None);
    assert!(!result.has_issues());
    assert_eq!(result.bib_entries[0].authors, vec!["Smith"]);
    assert_eq!(result.bib_entries[1].authors, vec!["Brown", "Williams"]);
}

#[test]
fn reference_list_is_not_scanned_for_citations() {
    let text = "
Research shows [1] that citations are important [2].

References:
[1] J. Smith, \"Title,\" Journal, 2020.
[2] M. Jones, \"Another,\" Conference, 2021.
[3] A. Williams, \"Uncited,\" Publisher, 2019.
";
    let result = check(text, None);
    assert_eq!(result.citations.len(), 2);
    assert!(result.citations.iter().all(|c| c.citation_type() == CitationType::Numeric));
    assert_eq!(result.bib_entries.len(), 3);
    assert_eq!(result.uncited_references.len(), 1);
}

#[test]
fn online_first_publications() {
    let text = "
The framework was established by Taylor and Martinez (2020). Subsequently,
it was refined (Garcia, 2021) and applied in practice (Chen et al., 2022).

References:
Taylor, Robert, and Linda Martinez. 2021. \"Framework Establishment.\"
International Journal 25(4): 450-478.

Garcia, Patricia M. 2022. \"Framework Refinement.\" Research Review 12(1): 23-45.

Chen, Li, Wang, Mei, and Kumar, Raj. 2022. \"Practical Applications.\"
Applied Science 8(3): 156-172.
";
    let result = check(text, None);
    assert_eq!(result.year_mismatches.len(), 2);
    assert_eq!(result.bib_entries.len(), 3);
    assert_eq!(result.bib_entries[2].authors, vec!["Chen", "Wang", "Kumar"]);
    let chen: Vec<_> = result
        .citations
        .iter()
        .filter(|c| c.authors().iter().any(|a| a == "Chen"))
        .collect();
    assert_eq!(chen.len(), 1);
    assert!(result.missing_bib_entries.iter().all(|c| !c.authors().contains(&"Chen".to_string())));
}

#[test]
fn multiple_year_mismatches() {
    let text = "
Research by Smith (2023) and Jones (2020) shows findings. Additional work
by Brown and Williams (2021) confirms this.

References:
Smith, John A. 2024. \"Findings.\" Journal 15(3): 123-145.
Jones, Mary K. 2021. \"Additional Work.\" Review 8(2): 56-78.
Brown, Thomas, and Sarah Williams. 2022. \"Confirmation.\" Quarterly 10(1): 34-56.
";
    let result = check(text, None);
    assert_eq!(result.year_mismatches.len(), 3);
}

#[test]
fn ieee_comma_list_entry_pairs_year_mismatch() {
    let text = "Shown (Smith, Lee, & Park, 2019).\n\nReferences\n[1] J. Smith, K. Lee, and M. Park, \"T,\" J, 2020.\n";
    let result = check(text, None);
    assert_eq!(result.bib_entries.len(), 1);
    assert_eq!(result.bib_entries[0].authors, vec!["Smith", "Lee", "Park"]);
    assert_eq!(result.missing_bib_entries.len(), 1);
    assert_eq!(result.year_mismatches.len(), 1);
    let mismatch = &result.year_mismatches[0];
    assert_eq!(mismatch.citation.year(), Some("2019"));
    assert_eq!(mismatch.bib_entry.number, Some(1));
}

#[test]
fn different_authors_are_not_a_year_mismatch() {
    let text = "
Research by Smith (2023) and Jones (2024) shows findings.

References:
Jones, Mary K. 2024. \"Findings.\" Journal 8(2): 56-78.
";
    let result = check(text, None);
    assert_eq!(result.missing_bib_entries.len(), 1);
    assert_eq!(result.missing_bib_entries[0].authors(), ["Smith".to_string()]);
    assert!(result.year_mismatches.is_empty());
}

#[test]
fn duplicate_narrative_citations() {
    let text = "
Research by Smith (2020) is important. Later, Smith (2020) confirms this.
Additional work by Smith (2020) provides more evidence. Smith (2020) is key.

References:
Jones, Mary. 2021. \"Different Work.\" Journal Name 1(1): 1-10.
";
    let result = check(text, None);
    assert_eq!(result.citations.len(), 4);
    assert!(result.citations.iter().all(|c| c.authors() == ["Smith".to_string()]));
    assert_eq!(result.missing_bib_entries.len(), 1);
    assert_eq!(result.missing_bib_entries[0].year(), Some("2020"));
}

#[test]
fn mixed_apa_and_harvard() {
    let text = "
Research by Smith (2020) and work by Jones (2021) shows results.
Additional evidence (Brown, 2019) and (Williams 2018) confirms this.

References:
Smith, John. 2020. \"Research.\" Journal 1(1): 1-10.
Jones, Mary. 2021. \"Work.\" Journal 2(2): 20-30.
Brown, Tom. 2019. \"Evidence.\" Journal 3(3): 40-50.
Williams, Sarah. 2018. \"Confirmation.\" Journal 4(4): 60-70.
";
    let result = check(text, None);
    assert_eq!(result.citations.len(), 4);
    assert!(!result.has_issues());
}

#[test]
fn chicago_multi_author_entries() {
    let text = "
As Brown (2019) demonstrates, the method works. Smith and Jones (2020) confirm this (Smith and Jones 2020).

References:
Brown, Thomas. 2019. \"Methodology.\" Research Journal 10(1): 34-56.
Smith, Anna, and Michael Jones. 2020. \"Confirmation.\" Science Today 5(2): 78-90.
";
    let result = check(text, None);
    assert_eq!(result.citations.len(), 3);
    assert!(!result.has_issues());
}

#[test]
fn mla_document() {
    let text = "
The claim is old (Smith 45) and often repeated (Jones and Brown 112-118).

Works Cited
Smith, John. \"An Essay.\" Journal of Things, vol. 3, 1999, pp. 40-50.
Jones, Karl, and Ann Brown. \"A Book.\" Press, 2004.
";
    let result = check(text, None);
    assert_eq!(result.citations.len(), 2);
    assert!(result.citations.iter().all(|c| c.citation_type() == CitationType::Mla));
    assert_eq!(result.bib_entries.len(), 2);
    assert!(result.bib_entries.iter().all(|e| e.entry_type == CitationType::Mla));
    assert!(!result.has_issues());
}

#[test]
fn endnote_citations_are_detected() {
    let text = "
The argument has a long history.1 It was later disputed.2

Notes:
1. Smith 2020.
2. See Jones and Brown 2019, 45.

References
Smith, J. (2020). First. Press.
Jones, K., & Brown, L. (2019). Second. Press.
";
    let result = check(text, None);
    assert_eq!(result.citations.len(), 2);
    assert_eq!(result.citations[0].raw_text, "Smith 2020");
    assert_eq!(result.citations[1].authors(), ["Jones".to_string(), "Brown".to_string()]);
    assert!(!result.has_issues());
}

#[test]
fn custom_bibliography_header() {
    let text = "Cited (Müller, 2018).\n\nLiteratur\nMüller, K. (2018). Titel.\n";
    assert_eq!(check(text, None).missing_bib_entries.len(), 1);
    assert!(!check(text, Some("Literatur")).has_issues());
}

#[test]
fn cross_references_and_non_authors_are_ignored() {
    let text = "As Table [2] and Figure [3] show, in (November 2002) and (Around 2011) nothing was cited [1].\n\nReferences\n[1] A. Smith, \"T,\" 2020.\n";
    let result = check(text, None);
    assert_eq!(numbers(&result), BTreeSet::from([1]));
    assert_eq!(result.citations.len(), 1);
    assert!(!result.has_issues());
}

#[test]
fn configured_tables_extend_defaults() {
    let config = ParsingConfigBuilder::new()
        .add_numeric_keyword("eq.".into())
        .build()
        .unwrap();
    let checker = CitationChecker::with_config(config);
    let result = checker.check("By eq. [4] and in the related work [5].", None);
    assert_eq!(numbers(&result), BTreeSet::from([5]));
}

#[test]
fn empty_document() {
    let result = check("", None);
    assert!(!result.has_issues());
    assert!(result.citations.is_empty());
    assert!(result.bib_entries.is_empty());
}

#[test]
fn result_serializes_to_json() {
    let text = "Shown [1].\n\nReferences\n[1] A. Smith, \"One,\" 2020.\n";
    let value = serde_json::to_value(check(text, None)).unwrap();
    assert_eq!(value["citations"][0]["style"], "numeric");
    assert_eq!(value["bib_entries"][0]["entry_type"], "numeric");
    assert_eq!(value["bib_entries"][0]["title"], "One");
}
