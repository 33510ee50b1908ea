//! Résumé text extraction from uploaded files.
//!
//! Dispatch is by file extension only: `.txt` / `.md` are decoded as UTF-8,
//! `.pdf` goes through pdf-extract page by page, and `.docx` is read straight
//! from `word/document.xml` inside the archive.

use std::io::{Cursor, Read};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {extension}. Please upload TXT, MD, PDF, or DOCX.")]
    UnsupportedType { extension: String },

    #[error("Error processing file {file_name}: {reason}")]
    Unreadable { file_name: String, reason: String },
}

/// Supported résumé formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Markdown,
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Case-insensitive lookup on the file extension.
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("txt") => Ok(DocumentKind::Text),
            Some("md") => Ok(DocumentKind::Markdown),
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("docx") => Ok(DocumentKind::Docx),
            Some(other) => Err(ExtractError::UnsupportedType {
                extension: format!(".{other}"),
            }),
            None => Err(ExtractError::UnsupportedType {
                extension: "(none)".to_string(),
            }),
        }
    }

    /// Binary formats lose structure on extraction and benefit from an LLM clean-up pass.
    pub fn needs_normalization(self) -> bool {
        matches!(self, DocumentKind::Pdf | DocumentKind::Docx)
    }
}

/// Extracts raw text from an uploaded résumé.
///
/// Errors are logged here and returned; the caller must stop the pipeline on `Err`.
pub fn extract_text(bytes: &[u8], file_name: &str) -> Result<String, ExtractError> {
    let result = DocumentKind::from_file_name(file_name).and_then(|kind| {
        debug!("Extracting {:?} résumé '{}' ({} bytes)", kind, file_name, bytes.len());
        decode(kind, bytes).map_err(|reason| ExtractError::Unreadable {
            file_name: file_name.to_string(),
            reason,
        })
    });

    if let Err(e) = &result {
        error!("Résumé extraction failed: {e}");
    }
    result
}

fn decode(kind: DocumentKind, bytes: &[u8]) -> Result<String, String> {
    match kind {
        DocumentKind::Text | DocumentKind::Markdown => {
            String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string())
        }
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Docx => extract_docx(bytes),
    }
}

/// Concatenates the text of every page; pages without text contribute nothing.
fn extract_pdf(bytes: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some malformed inputs.
    let pages = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| "PDF parser aborted on malformed input".to_string())?
    .map_err(|e| e.to_string())?;

    Ok(pages.concat())
}

/// Paragraph texts from the main document part, each followed by a newline.
fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| e.to_string())?
        .read_to_string(&mut xml)
        .map_err(|e| e.to_string())?;

    Ok(docx_paragraphs(&xml)
        .map_err(|e| format!("Malformed document.xml: {e}"))?
        .into_iter()
        .map(|paragraph| paragraph + "\n")
        .collect())
}

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn is_wordml(node: roxmltree::Node<'_, '_>, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(WORDML_NS)
}

/// Splits WordprocessingML into paragraph strings, in document order.
///
/// A paragraph nested in another (text boxes) is emitted as its own entry
/// right after its host, and its runs do not count toward the host's text.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, roxmltree::Error> {
    let document = roxmltree::Document::parse(xml)?;

    let paragraphs = document
        .descendants()
        .filter(|node| is_wordml(*node, "p"))
        .map(|paragraph| {
            let mut text = String::new();
            for node in paragraph.descendants().skip(1) {
                // Only run content counts; `w:tab` also names tab stops in `w:pPr`.
                let in_run = node.parent().is_some_and(|p| is_wordml(p, "r"));
                let owner = node.ancestors().find(|a| is_wordml(*a, "p"));
                if !in_run || owner.map(|o| o.id()) != Some(paragraph.id()) {
                    continue;
                }
                if is_wordml(node, "t") {
                    text.push_str(node.text().unwrap_or_default());
                } else if is_wordml(node, "tab") {
                    text.push('\t');
                } else if is_wordml(node, "br") || is_wordml(node, "cr") {
                    text.push('\n');
                }
            }
            text
        })
        .collect();

    Ok(paragraphs)
}
