// Document Text Extractor
// Converts uploaded PDF / DOCX / ODT files to plain text

use std::io::{Cursor, Read};
use std::panic;

use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent, TableChild,
    TableRowChild,
};
use tracing::{info, warn};
use xml::name::OwnedName;
use xml::reader::{EventReader, XmlEvent};

use super::error::ScanError;

const ODT_CONTENT_MEMBER: &str = "content.xml";

/// Lower-cased extension after the last dot; empty when the name has none
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Extract plain text from a document. The extension selects the decoder;
/// extraction either fully succeeds or fails.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ScanError> {
    let extension = file_extension(file_name);
    info!(
        "[FILE_PARSER] extracting extension={} bytes={}",
        extension,
        bytes.len()
    );

    let result = match extension.as_str() {
        "pdf" => parse_pdf(bytes),
        "docx" => parse_docx(bytes),
        "odt" => parse_odt(bytes),
        "doc" => Err(ScanError::UnsupportedLegacyFormat),
        _ => Err(ScanError::UnsupportedFileType { extension }),
    };

    match &result {
        Ok(text) => info!("[FILE_PARSER] extracted {} chars", text.chars().count()),
        Err(e) => warn!("[FILE_PARSER] extraction failed: {}", e),
    }
    result
}

/// Pages in order; fragments within a page joined by single spaces, one line per page
fn parse_pdf(bytes: &[u8]) -> Result<String, ScanError> {
    // pdf-extract panics on some malformed documents
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ScanError::FileProcessingFailure("PDF decoder panicked".to_string()))?
        .map_err(|e| ScanError::FileProcessingFailure(format!("PDF decode error: {}", e)))?;

    let mut text = String::new();
    for page in pages {
        let fragments: Vec<&str> = page
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        text.push_str(&fragments.join(" "));
        text.push('\n');
    }
    Ok(text)
}

/// Raw text of every paragraph (body and table cells), each followed by a blank line
fn parse_docx(bytes: &[u8]) -> Result<String, ScanError> {
    let docx = read_docx(bytes)
        .map_err(|e| ScanError::FileProcessingFailure(format!("DOCX read error: {}", e)))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => push_paragraph(&mut text, p),
            DocumentChild::Table(table) => {
                for row in &table.rows {
                    #[allow(irrefutable_let_patterns)]
                    let TableChild::TableRow(row) = row else {
                        continue;
                    };
                    for cell in &row.cells {
                        #[allow(irrefutable_let_patterns)]
                        let TableRowChild::TableCell(cell) = cell else {
                            continue;
                        };
                        for content in &cell.children {
                            if let TableCellContent::Paragraph(p) = content {
                                push_paragraph(&mut text, p);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(text)
}

fn push_paragraph(out: &mut String, paragraph: &Paragraph) {
    collect_paragraph_children(out, &paragraph.children);
    out.push_str("\n\n");
}

fn collect_paragraph_children(out: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => collect_paragraph_children(out, &link.children),
            _ => {}
        }
    }
}

/// Text of every `text:p` element in content.xml, newline separated and trimmed
fn parse_odt(bytes: &[u8]) -> Result<String, ScanError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ScanError::FileProcessingFailure(format!("ODT archive error: {}", e)))?;

    let mut content = String::new();
    archive
        .by_name(ODT_CONTENT_MEMBER)
        .map_err(|e| {
            ScanError::FileProcessingFailure(format!("{} not readable: {}", ODT_CONTENT_MEMBER, e))
        })?
        .read_to_string(&mut content)
        .map_err(|e| ScanError::FileProcessingFailure(format!("ODT read error: {}", e)))?;

    let mut text = String::new();
    for paragraph in odt_paragraphs(&content)? {
        text.push_str(&paragraph);
        text.push('\n');
    }
    Ok(text.trim().to_string())
}

/// Every `text:p` in document order. A paragraph nested inside another (footnote
/// bodies) is reported on its own and also contributes to the enclosing text.
fn odt_paragraphs(xml: &str) -> Result<Vec<String>, ScanError> {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for event in EventReader::new(xml.as_bytes()) {
        let event =
            event.map_err(|e| ScanError::FileProcessingFailure(format!("ODT XML error: {}", e)))?;
        match event {
            XmlEvent::StartElement { name, .. } if is_text_paragraph(&name) => {
                open.push(paragraphs.len());
                paragraphs.push(String::new());
            }
            XmlEvent::EndElement { name } if is_text_paragraph(&name) => {
                open.pop();
            }
            XmlEvent::Characters(s) | XmlEvent::Whitespace(s) | XmlEvent::CData(s)
                if !open.is_empty() =>
            {
                for &i in &open {
                    paragraphs[i].push_str(&s);
                }
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn is_text_paragraph(name: &OwnedName) -> bool {
    name.local_name == "p" && name.prefix.as_deref() == Some("text")
}
