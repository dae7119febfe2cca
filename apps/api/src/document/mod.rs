//! Document text extraction for uploaded resumes.
//!
//! Supports PDF (`pdf-extract`) and DOCX (ZIP archive + `word/document.xml`).
//! Dispatch is by filename extension; bytes are never sniffed.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file format. Please upload PDF or DOCX.")]
    Unsupported,

    #[error("Error reading {kind}: {reason}")]
    Unreadable { kind: DocumentKind, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => f.write_str("PDF"),
            DocumentKind::Docx => f.write_str("DOCX"),
        }
    }
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.trim().to_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }
}

/// Detects the document type from `filename` and returns its trimmed plain text.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, DocumentError> {
    let kind = DocumentKind::from_filename(filename).ok_or(DocumentError::Unsupported)?;
    let text = match kind {
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Docx => extract_docx(bytes),
    }
    .map_err(|reason| DocumentError::Unreadable { kind, reason })?;
    Ok(text.trim().to_string())
}

fn extract_pdf(bytes: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some malformed inputs instead of returning Err.
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| "malformed PDF structure".to_string())?
        .map_err(|e| e.to_string())
}

fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| format!("not a ZIP archive: {e}"))?;

    let mut doc_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| "missing word/document.xml".to_string())?
        .read_to_string(&mut doc_xml)
        .map_err(|e| format!("failed to read document.xml: {e}"))?;

    docx_paragraphs(&doc_xml).map(|paragraphs| paragraphs.join("\n"))
}

/// Collects the text of each `<w:p>` paragraph in a WordprocessingML body.
/// Paragraphs nested inside another (text boxes) get their own buffer and are
/// emitted when they close, before the enclosing paragraph.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => push_to(&mut open, "\t"),
                b"br" | b"cr" => push_to(&mut open, "\n"),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(open.pop().unwrap_or_default()),
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|e| format!("XML parse error: {e}"))?;
                push_to(&mut open, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parse error: {e}")),
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_to(open: &mut [String], text: &str) {
    if let Some(current) = open.last_mut() {
        current.push_str(text);
    }
}
