use crate::document::{Document, DocumentKind};
use crate::error::ExtractError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Turns a document into plain-text chunks (lines or paragraphs).
pub trait TextExtractor: Send + Sync {
    fn extract(&self, doc: &Document) -> Result<Vec<String>, ExtractError>;
}

/// Reads documents from the filesystem, dispatching on [`DocumentKind`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl TextExtractor for FileExtractor {
    fn extract(&self, doc: &Document) -> Result<Vec<String>, ExtractError> {
        match &doc.kind {
            DocumentKind::PlainText => text_lines(&doc.path),
            DocumentKind::Pdf => pdf_text(&doc.path),
            // legacy .doc goes through the OOXML reader too; binary files fail here
            DocumentKind::Doc | DocumentKind::Docx => docx_paragraphs(&doc.path),
            DocumentKind::Unsupported(ext) => Err(ExtractError::Unsupported(ext.clone())),
        }
    }
}

fn text_lines(path: &Path) -> Result<Vec<String>, ExtractError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        lines.push(String::from_utf8_lossy(&line).into_owned());
    }
    Ok(lines)
}

fn pdf_text(path: &Path) -> Result<Vec<String>, ExtractError> {
    // pdf-extract panics on some malformed files
    let res = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));
    match res {
        Ok(Ok(text)) => Ok(vec![text]),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => Err(ExtractError::Pdf("parser panicked".into())),
    }
}

fn docx_paragraphs(path: &Path) -> Result<Vec<String>, ExtractError> {
    let mut archive = zip::ZipArchive::new(BufReader::new(File::open(path)?))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;
    paragraphs_from_xml(&xml)
}

/// Text of every `w:p` element of a WordprocessingML body, in document order.
pub(crate) fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" | b"w:br" => current.push(' '),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs)
}
