use std::io::Write;
use std::path::Path;

use citecheck_core::{CheckResult, CheckSummary};
use serde::Serialize;

use crate::ExportFormat;

/// Render `result` in `format`.
pub fn render(result: &CheckResult, format: ExportFormat) -> Result<String, String> {
    match format {
        ExportFormat::Json => {
            render_json(result).map_err(|e| format!("Failed to serialize: {}", e))
        }
        ExportFormat::Markdown => Ok(render_markdown(result)),
    }
}

/// Render `result` and write it to `path`.
pub fn export_results(
    result: &CheckResult,
    format: ExportFormat,
    path: &Path,
) -> Result<(), String> {
    let content = render(result, format)?;

    let mut file =
        std::fs::File::create(path).map_err(|e| format!("Failed to create file: {}", e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| format!("Failed to write: {}", e))?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    has_issues: bool,
    summary: CheckSummary,
    #[serde(flatten)]
    result: &'a CheckResult,
}

/// Pretty-printed JSON: `has_issues`, `summary` counts, then every list of
/// the result.
pub fn render_json(result: &CheckResult) -> serde_json::Result<String> {
    let report = JsonReport {
        has_issues: result.has_issues(),
        summary: result.summary(),
        result,
    };
    let mut out = serde_json::to_string_pretty(&report)?;
    out.push('\n');
    Ok(out)
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

pub fn render_markdown(result: &CheckResult) -> String {
    let s = result.summary();
    let mut out = String::from("# Citation Cross-Checker Report\n\n");

    out.push_str(&format!(
        "**{}** citations | **{}** bibliography entries | **{}** missing | **{}** uncited | **{}** year mismatches\n\n",
        s.citations, s.bib_entries, s.missing, s.uncited, s.year_mismatches,
    ));
    let status = if result.has_issues() {
        "INCONSISTENCIES FOUND"
    } else {
        "ALL CHECKS PASSED"
    };
    out.push_str(&format!("**Status:** {}\n\n", status));

    out.push_str("## Missing Bibliography Entries\n\n");
    if result.missing_bib_entries.is_empty() {
        out.push_str("\u{2713} All citations have bibliography entries.\n\n");
    } else {
        out.push_str("| Citation | Type |\n");
        out.push_str("|----------|------|\n");
        for c in &result.missing_bib_entries {
            out.push_str(&format!(
                "| {} | {} |\n",
                md_escape(&c.raw_text),
                c.citation_type()
            ));
        }
        out.push('\n');
    }

    out.push_str("## Uncited References\n\n");
    if result.uncited_references.is_empty() {
        out.push_str("\u{2713} All bibliography entries are cited.\n\n");
    } else {
        out.push_str("| Key | Entry |\n");
        out.push_str("|-----|-------|\n");
        for e in &result.uncited_references {
            out.push_str(&format!(
                "| {} | {} |\n",
                md_escape(&e.display_key()),
                md_escape(&e.raw_text)
            ));
        }
        out.push('\n');
    }

    if !result.year_mismatches.is_empty() {
        out.push_str("## Potential Year Mismatches\n\n");
        out.push_str("Same authors cited and in bibliography, but with different years.\n\n");
        out.push_str("| Citation | Cited year | Bibliography | Listed year |\n");
        out.push_str("|----------|------------|--------------|-------------|\n");
        for m in &result.year_mismatches {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                md_escape(&m.citation.raw_text),
                m.citation.year().unwrap_or("\u{2014}"),
                md_escape(&m.bib_entry.display_key()),
                m.bib_entry.year.as_deref().unwrap_or("\u{2014}"),
            ));
        }
        out.push('\n');
    }

    if !result.citations.is_empty() {
        out.push_str("## All Citations\n\n");
        out.push_str("| # | Citation | Type |\n");
        out.push_str("|---|----------|------|\n");
        for (i, c) in result.citations.iter().enumerate() {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                i + 1,
                md_escape(&c.raw_text),
                c.citation_type()
            ));
        }
        out.push('\n');
    }

    if !result.bib_entries.is_empty() {
        out.push_str("## All Bibliography Entries\n\n");
        out.push_str("| # | Key | Title |\n");
        out.push_str("|---|-----|-------|\n");
        for (i, e) in result.bib_entries.iter().enumerate() {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                i + 1,
                md_escape(&e.display_key()),
                e.title.as_deref().map(md_escape).unwrap_or_default(),
            ));
        }
        out.push('\n');
    }

    out
}
