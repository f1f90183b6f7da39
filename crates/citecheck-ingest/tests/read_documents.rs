use std::io::Write;
use std::path::Path;

use citecheck_ingest::{IngestError, check_file, read_document};
use zip::write::SimpleFileOptions;

const MANUSCRIPT: &str = "\
Prior work (Smith, 2020) and Jones (2019) disagree.

References

Smith, J. (2020). A study of things.
Jones, K. (2019). Another study.
";

fn write_file(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text)
}

fn write_docx(path: &Path, body: &str, footnotes: Option<&str>) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();

    zip.start_file("word/document.xml", options).unwrap();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );
    zip.write_all(document.as_bytes()).unwrap();

    if let Some(notes) = footnotes {
        zip.start_file("word/footnotes.xml", options).unwrap();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:footnotes xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{}</w:footnotes>"#,
            notes
        );
        zip.write_all(xml.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
}

#[test]
fn reads_text_family_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    for ext in ["txt", "md", "markdown", "tex", "latex"] {
        let content = format!("Content for .{} file\nWith multiple lines.", ext);
        let path = write_file(dir.path(), &format!("paper.{}", ext), content.as_bytes());
        assert_eq!(read_document(&path).unwrap(), content);
    }
}

#[test]
fn extension_match_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "PAPER.TXT", b"Upper (Smith, 2020).");
    assert_eq!(read_document(&path).unwrap(), "Upper (Smith, 2020).");
}

#[test]
fn crlf_is_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "paper.txt", b"Line one\r\nLine two\r\n");
    assert_eq!(read_document(&path).unwrap(), "Line one\nLine two\n");
}

#[test]
fn unknown_extension_read_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "paper.rst", b"Body (Smith, 2020).");
    assert_eq!(read_document(&path).unwrap(), "Body (Smith, 2020).");
}

#[test]
fn unknown_binary_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "figure.png", b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR");
    let err = read_document(&path).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat(ref ext) if ext == ".png"));
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_document(&dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, IngestError::NotFound(_)));
}

#[test]
fn reads_docx_paragraphs_tables_and_footnotes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.docx");
    let body = format!(
        "{}<w:p/>{}<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>",
        paragraph("Prior work (Smith, 2020)."),
        paragraph("References"),
        paragraph("Table cell text"),
    );
    let notes = r#"<w:footnote w:type="separator" w:id="-1"><w:p><w:r><w:separator/></w:r></w:p></w:footnote><w:footnote w:id="1"><w:p><w:r><w:t>See Brown (2018).</w:t></w:r></w:p></w:footnote>"#;
    write_docx(&path, &body, Some(notes));

    let text = read_document(&path).unwrap();
    assert_eq!(
        text,
        "Prior work (Smith, 2020).\nReferences\nTable cell text\nFootnotes:\nSee Brown (2018)."
    );
}

#[test]
fn docx_without_document_part_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.docx");
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("other.xml", SimpleFileOptions::default()).unwrap();
    zip.write_all(b"<x/>").unwrap();
    zip.finish().unwrap();

    assert!(matches!(read_document(&path), Err(IngestError::Zip(_))));
}

#[test]
fn non_zip_docx_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "fake.docx", b"not a zip archive");
    assert!(matches!(read_document(&path), Err(IngestError::Zip(_))));
}

#[test]
fn check_file_runs_the_cross_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "paper.md", MANUSCRIPT.as_bytes());
    let result = check_file(&path, None).unwrap();
    assert_eq!(result.citations.len(), 2);
    assert_eq!(result.bib_entries.len(), 2);
    assert!(!result.has_issues());
}

#[test]
fn check_file_on_docx() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.docx");
    let body = format!(
        "{}{}{}",
        paragraph("As argued by Lee (2021)."),
        paragraph("References"),
        paragraph("Lee, M. (2020). Earlier version."),
    );
    write_docx(&path, &body, None);

    let result = check_file(&path, None).unwrap();
    assert_eq!(result.citations.len(), 1);
    assert_eq!(result.missing_bib_entries.len(), 1);
    assert_eq!(result.year_mismatches.len(), 1);
    assert_eq!(result.uncited_references.len(), 1);
}
