use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use citecheck_core::config_file::{self, ConfigFile};
use citecheck_parsing::{CitationChecker, ParsingConfig};
use citecheck_reporting::ExportFormat;

mod output;

use output::ColorMode;

/// Citation Cross-Checker - Verify that in-text citations match bibliography entries
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a manuscript file for citation consistency
    Check {
        /// Path to the manuscript (.txt, .md, .tex, .docx, or .pdf)
        file_path: PathBuf,

        /// Custom name for the bibliography section (e.g. "Works Cited")
        #[arg(short, long)]
        bib_section: Option<String>,

        /// Save the report to a file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show every citation and bibliography entry found
        #[arg(short, long)]
        verbose: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Report format: text, json, or markdown (md)
        #[arg(short, long, value_parser = parse_report_format)]
        format: Option<ReportFormat>,
    },

    /// Show example usage and supported citation formats
    Example,

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the platform config file
        #[arg(long)]
        save: bool,
    },
}

/// The terminal text report (`None`) or one of the export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReportFormat(Option<ExportFormat>);

fn parse_report_format(name: &str) -> Result<ReportFormat, String> {
    if name.eq_ignore_ascii_case("text") {
        return Ok(ReportFormat(None));
    }
    name.parse::<ExportFormat>().map(|f| ReportFormat(Some(f)))
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            file_path,
            bib_section,
            output,
            verbose,
            no_color,
            format,
        } => check(&file_path, bib_section, output, verbose, no_color, format),
        Command::Example => {
            print!("{}", EXAMPLE_TEXT);
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { save } => show_config(save),
    }
}

fn check(
    file_path: &Path,
    bib_section: Option<String>,
    output: Option<PathBuf>,
    verbose: bool,
    no_color: bool,
    format: Option<ReportFormat>,
) -> anyhow::Result<ExitCode> {
    // Resolve configuration: CLI flags > config file > defaults
    let config = config_file::load_config();
    let parsing = config.parsing.unwrap_or_default();
    let display = config.display.unwrap_or_default();

    let bib_section = bib_section.or(parsing.bibliography_section.clone());
    let verbose = verbose || display.verbose.unwrap_or(false);
    let format = format
        .or_else(|| resolve_format(display.format.as_deref()))
        .unwrap_or(ReportFormat(None));
    let use_color = !no_color
        && display.color.unwrap_or(true)
        && output.is_none()
        && std::io::stdout().is_terminal();
    let color = ColorMode(use_color);

    let checker = CitationChecker::with_config(ParsingConfig::from(&parsing));

    let mut stdout = std::io::stdout();
    writeln!(stdout, "Checking {}...", file_path.display())?;

    let checked = citecheck_ingest::check_file_with(&checker, file_path, bib_section.as_deref());
    let result = match checked {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let report = match format.0 {
        Some(export) => match citecheck_reporting::render(&result, export) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(ExitCode::FAILURE);
            }
        },
        None => {
            let mut buf = Vec::new();
            output::print_report(&mut buf, &result, verbose, color)?;
            String::from_utf8_lossy(&buf).into_owned()
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &report) {
                eprintln!("Error: failed to write {}: {}", path.display(), e);
                return Ok(ExitCode::FAILURE);
            }
            writeln!(stdout, "Report saved to {}", path.display())?;
        }
        None => {
            write!(stdout, "{}", report)?;
            stdout.flush()?;
        }
    }

    if result.has_issues() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Parse the `[display] format` value; unknown names fall back to text.
fn resolve_format(name: Option<&str>) -> Option<ReportFormat> {
    let name = name?;
    match parse_report_format(name) {
        Ok(format) => Some(format),
        Err(e) => {
            tracing::warn!(format = name, error = %e, "unknown report format in config, using text");
            None
        }
    }
}

fn show_config(save: bool) -> anyhow::Result<ExitCode> {
    let config = config_file::load_config();
    let effective = config_file::merge(ConfigFile::default(), config);

    if save {
        let path = config_file::save_config(&effective).map_err(anyhow::Error::msg)?;
        println!("Configuration saved to {}", path.display());
    } else {
        if let Some(path) = config_file::config_path() {
            println!("# {}", path.display());
        }
        print!("{}", toml::to_string_pretty(&effective)?);
    }
    Ok(ExitCode::SUCCESS)
}

const EXAMPLE_TEXT: &str = "
Citation Cross-Checker - Example Usage

SUPPORTED FORMATS:

1. APA Style
   In-text: (Smith, 2020) or (Johnson et al., 2021)
   Bibliography: Smith, J. (2020). Title of work. Publisher.

2. MLA Style
   In-text: (Author 123) or (Author et al. 45-67)
   Bibliography: Author, First. \"Title of Work.\" Publisher, 2020.

3. IEEE/Numeric Style
   In-text: [1] or [1-3] or [1,2,5]
   Bibliography: [1] J. Smith, \"Title,\" Journal, vol. 1, 2020.

4. Chicago/Harvard Narrative
   In-text: Smith (2020) or Smith and Jones (2019)

FILE TYPES: .txt, .md, .markdown, .tex, .latex, .docx, .pdf

EXAMPLE DOCUMENT:

Recent studies (Smith, 2020) show that citations are important.
Multiple researchers agree (Johnson et al., 2021; Williams, 2019).
Some findings are controversial [3].

References:
Smith, J. (2020). A Study on Citations. Journal of Research.
Johnson, M., Lee, K., & Chen, R. (2021). Advanced Methods. Science Press.
Williams, A. (2019). Research Methodology. Academic Publishers.

USAGE EXAMPLES:

  # Check a document
  citecheck check manuscript.txt

  # Use custom bibliography section name
  citecheck check paper.txt --bib-section \"Works Cited\"

  # Save report to file
  citecheck check thesis.txt --output report.txt

  # Machine-readable report
  citecheck check thesis.docx --format json --output report.json

  # Verbose output
  citecheck check article.txt --verbose

  # Disable colors
  citecheck check paper.txt --no-color
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_names() {
        assert_eq!(parse_report_format("text"), Ok(ReportFormat(None)));
        assert_eq!(
            parse_report_format("JSON"),
            Ok(ReportFormat(Some(ExportFormat::Json)))
        );
        assert_eq!(
            parse_report_format("md"),
            Ok(ReportFormat(Some(ExportFormat::Markdown)))
        );
        assert!(parse_report_format("csv").is_err());
    }

    #[test]
    fn test_config_format_falls_back() {
        assert_eq!(resolve_format(None), None);
        assert_eq!(resolve_format(Some("nope")), None);
        assert_eq!(
            resolve_format(Some("markdown")),
            Some(ReportFormat(Some(ExportFormat::Markdown)))
        );
    }
}
