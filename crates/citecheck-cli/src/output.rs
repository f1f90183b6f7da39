use std::io::Write;

use citecheck_core::CheckResult;
use owo_colors::{OwoColorize, Style};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.enabled() {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }
}

const RULE_WIDTH: usize = 60;

fn bold() -> Style {
    Style::new().bold()
}

fn red() -> Style {
    Style::new().bright_red()
}

fn green() -> Style {
    Style::new().bright_green()
}

fn yellow() -> Style {
    Style::new().bright_yellow()
}

fn blue() -> Style {
    Style::new().bright_blue()
}

/// Print the full text report; `verbose` appends every citation and entry.
pub fn print_report(
    w: &mut dyn Write,
    result: &CheckResult,
    verbose: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    print_findings(w, result, color)?;
    print_summary(w, result, color)?;
    if verbose {
        print_details(w, result, color)?;
    }
    Ok(())
}

/// Header plus the missing / uncited / year-mismatch sections.
pub fn print_findings(
    w: &mut dyn Write,
    result: &CheckResult,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "{}", color.paint("Citation Cross-Checker Report", bold()))?;
    writeln!(w, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(w)?;

    if result.missing_bib_entries.is_empty() {
        writeln!(
            w,
            "{}",
            color.paint("\u{2713} All citations have bibliography entries", green())
        )?;
    } else {
        writeln!(
            w,
            "{}",
            color.paint("MISSING BIBLIOGRAPHY ENTRIES:", red().bold())
        )?;
        for citation in &result.missing_bib_entries {
            writeln!(
                w,
                "  {} Citation '{}' found in text but missing from bibliography",
                color.paint("\u{2717}", red()),
                citation.raw_text
            )?;
        }
    }
    writeln!(w)?;

    if result.uncited_references.is_empty() {
        writeln!(
            w,
            "{}",
            color.paint("\u{2713} All bibliography entries are cited", green())
        )?;
    } else {
        writeln!(w, "{}", color.paint("UNCITED REFERENCES:", yellow().bold()))?;
        for entry in &result.uncited_references {
            writeln!(
                w,
                "  {} '{}' in bibliography but never cited in text",
                color.paint("\u{2717}", yellow()),
                entry.display_key()
            )?;
        }
    }
    writeln!(w)?;

    if !result.year_mismatches.is_empty() {
        writeln!(
            w,
            "{}",
            color.paint("POTENTIAL YEAR MISMATCHES:", blue().bold())
        )?;
        writeln!(
            w,
            "{}",
            color.paint(
                "(Same authors cited and in bibliography, but with different years)",
                blue()
            )
        )?;
        for mismatch in &result.year_mismatches {
            writeln!(
                w,
                "  {}  Citation: {} (year: {})",
                color.paint("\u{26A0}", blue()),
                mismatch.citation.raw_text,
                mismatch.citation.year().unwrap_or("?")
            )?;
            writeln!(
                w,
                "      Bibliography: {} (year: {})",
                mismatch.bib_entry.display_key(),
                mismatch.bib_entry.year.as_deref().unwrap_or("?")
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Counts and the overall status line.
pub fn print_summary(
    w: &mut dyn Write,
    result: &CheckResult,
    color: ColorMode,
) -> std::io::Result<()> {
    let s = result.summary();

    writeln!(w, "{}", color.paint("SUMMARY:", bold()))?;
    writeln!(w, "  Total in-text citations: {}", s.citations)?;
    writeln!(w, "  Total bibliography entries: {}", s.bib_entries)?;
    writeln!(
        w,
        "  Missing bibliography entries: {}",
        color.paint(&s.missing.to_string(), red())
    )?;
    writeln!(
        w,
        "  Uncited references: {}",
        color.paint(&s.uncited.to_string(), yellow())
    )?;
    writeln!(
        w,
        "  Potential year mismatches: {}",
        color.paint(&s.year_mismatches.to_string(), blue())
    )?;
    writeln!(w)?;

    let status = if result.has_issues() {
        color.paint("INCONSISTENCIES FOUND", red())
    } else {
        color.paint("ALL CHECKS PASSED", green())
    };
    writeln!(w, "Status: {}", status)?;
    Ok(())
}

/// Every citation with its style, then every entry's display key.
pub fn print_details(
    w: &mut dyn Write,
    result: &CheckResult,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(w, "{}", color.paint("DETAILED INFORMATION", bold()))?;
    writeln!(w, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(w)?;

    writeln!(w, "{}", color.paint("All Citations Found:", bold()))?;
    if result.citations.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for (i, citation) in result.citations.iter().enumerate() {
        writeln!(
            w,
            "  {}. {} ({})",
            i + 1,
            citation.raw_text,
            citation.citation_type()
        )?;
    }
    writeln!(w)?;

    writeln!(w, "{}", color.paint("All Bibliography Entries:", bold()))?;
    if result.bib_entries.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for (i, entry) in result.bib_entries.iter().enumerate() {
        writeln!(w, "  {}. {}", i + 1, entry.display_key())?;
    }
    Ok(())
}
