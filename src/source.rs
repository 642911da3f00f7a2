//! Document source collaborator: turns a user-supplied path into raw
//! import input.
//!
//! Classification uses the file extension first and falls back to content
//! sniffing (`%PDF` magic, then UTF-8 validity), since portal exports often
//! arrive with missing or wrong extensions.

use std::path::Path;

use tracing::debug;

use crate::extract::{ImportError, Result};

/// Raw input for the import pipeline: PDF bytes or plain text.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Pdf(Vec<u8>),
    Text(String),
}

const PDF_MAGIC: &[u8] = b"%PDF";

/// Load and classify a document from disk.
///
/// `.pdf` must carry the `%PDF` magic; `.txt`/`.text` must be UTF-8. Any
/// other extension is classified by content, and input that is neither a
/// PDF nor text is rejected without a parse attempt.
pub async fn load_document(path: &Path) -> Result<DocumentSource> {
    let bytes = tokio::fs::read(path).await?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    debug!(path = %path.display(), ext, len = bytes.len(), "loaded document");

    match ext.as_str() {
        "pdf" => {
            if bytes.starts_with(PDF_MAGIC) {
                Ok(DocumentSource::Pdf(bytes))
            } else {
                Err(ImportError::Extraction(
                    "file has a .pdf extension but is not a PDF".into(),
                ))
            }
        }
        "txt" | "text" => match String::from_utf8(bytes) {
            Ok(text) => Ok(DocumentSource::Text(text)),
            Err(_) => Err(ImportError::Unsupported("non-UTF-8 text file".into())),
        },
        _ => classify_by_content(bytes, &ext),
    }
}

fn classify_by_content(bytes: Vec<u8>, ext: &str) -> Result<DocumentSource> {
    if bytes.starts_with(PDF_MAGIC) {
        return Ok(DocumentSource::Pdf(bytes));
    }
    match String::from_utf8(bytes) {
        Ok(text) => Ok(DocumentSource::Text(text)),
        Err(_) => Err(ImportError::Unsupported(if ext.is_empty() {
            "unrecognized binary file".into()
        } else {
            format!(".{ext} file")
        })),
    }
}
