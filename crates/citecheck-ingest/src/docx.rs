//! Plain-text extraction from Word (`.docx`) packages.
//!
//! A DOCX file is a ZIP archive; the text lives in `word/document.xml`,
//! with optional `word/footnotes.xml` and `word/endnotes.xml` parts. Only
//! run text (`w:t`), tabs, and breaks are kept; formatting is discarded.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use crate::IngestError;

/// Read a `.docx` file into text: top-level paragraphs in body order, then
/// table cells (one per line), then footnotes under `Footnotes:` and
/// endnotes under `Endnotes:`. Empty paragraphs and cells are skipped.
pub fn read_docx(path: &Path) -> Result<String, IngestError> {
    let file = File::open(path)?;
    read_docx_from(file)
}

/// Same as [`read_docx`] for any seekable reader.
pub fn read_docx_from<R: Read + Seek>(reader: R) -> Result<String, IngestError> {
    let mut archive = ZipArchive::new(reader)?;

    let document_xml = read_part(&mut archive, "word/document.xml")?.ok_or_else(|| {
        IngestError::Zip(zip::result::ZipError::FileNotFound)
    })?;
    let body = parse_body(&document_xml)?;

    let mut lines = body.paragraphs;
    lines.extend(body.cells);

    for (part, header, element) in [
        ("word/footnotes.xml", "Footnotes:", b"w:footnote".as_slice()),
        ("word/endnotes.xml", "Endnotes:", b"w:endnote".as_slice()),
    ] {
        let Some(xml) = read_part(&mut archive, part)? else {
            continue;
        };
        let notes = parse_notes(&xml, element)?;
        tracing::debug!(part, notes = notes.len(), "docx notes read");
        if !notes.is_empty() {
            lines.push(header.to_string());
            lines.extend(notes);
        }
    }

    Ok(lines.join("\n"))
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, IngestError> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    part.read_to_string(&mut content)?;
    Ok(Some(content))
}

struct Body {
    paragraphs: Vec<String>,
    cells: Vec<String>,
}

/// Walk `document.xml`. Paragraphs outside tables go to `paragraphs`; the
/// paragraphs of each table cell are joined into one entry of `cells`.
fn parse_body(xml: &str) -> Result<Body, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut paragraphs = Vec::new();
    let mut cells = Vec::new();
    // One buffer per open table cell, innermost last.
    let mut cell_stack: Vec<Vec<String>> = Vec::new();
    let mut paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tc" => cell_stack.push(Vec::new()),
                b"w:p" => paragraph.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => push_inline(&e, &mut paragraph),
            Event::Text(e) if in_text => paragraph.push_str(&e.unescape()?),
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        match cell_stack.last_mut() {
                            Some(cell) => cell.push(text.to_string()),
                            None => paragraphs.push(text.to_string()),
                        }
                    }
                    paragraph.clear();
                }
                b"w:tc" => {
                    if let Some(cell) = cell_stack.pop() {
                        let text = cell.join("\n");
                        if !text.is_empty() {
                            cells.push(text);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(Body { paragraphs, cells })
}

/// Collect the text of each footnote/endnote element, one line per note.
/// Separator notes carry no text and drop out as empty.
fn parse_notes(xml: &str, element: &[u8]) -> Result<Vec<String>, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut notes = Vec::new();
    let mut note: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut in_note = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                name if name == element => {
                    in_note = true;
                    note.clear();
                }
                b"w:p" => paragraph.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) if in_note => push_inline(&e, &mut paragraph),
            Event::Text(e) if in_note && in_text => paragraph.push_str(&e.unescape()?),
            Event::End(e) => match e.name().as_ref() {
                name if name == element => {
                    in_note = false;
                    let text = note.join(" ");
                    if !text.is_empty() {
                        notes.push(text);
                    }
                }
                b"w:t" => in_text = false,
                b"w:p" if in_note => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        note.push(text.to_string());
                    }
                    paragraph.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(notes)
}

fn push_inline(e: &BytesStart<'_>, paragraph: &mut String) {
    match e.name().as_ref() {
        b"w:tab" => paragraph.push('\t'),
        b"w:br" | b"w:cr" => paragraph.push('\n'),
        _ => {}
    }
}
