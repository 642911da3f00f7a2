//! Document ingestion: layout reconstruction plus schedule entry parsing.
//!
//! ```text
//! PDF bytes → pdfium fragments → row reconstruction → parser → candidates
//! pasted text ──────────────────────────────────────→ parser → candidates
//! ```
//!
//! Extraction is best-effort; candidates always pass through the review
//! workflow before anything is committed. All failures here are recoverable
//! at the workflow level — a failed PDF import leaves the paste path open.

pub mod layout;
pub mod parser;
#[cfg(feature = "pdf")]
pub mod pdf;

use thiserror::Error;
use tracing::info;

use crate::normalize;
use crate::schedule::ParsedClass;
use crate::source::DocumentSource;

/// Import pipeline errors.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Wrong file type; no parse attempted.
    #[error("unsupported input type: {0} (upload a PDF or TXT file, or paste the text)")]
    Unsupported(String),

    /// PDF library or file-read failure. The input may still be usable via
    /// the paste path.
    #[error("could not extract text from the document ({0}); try pasting the schedule text instead")]
    Extraction(String),

    /// The input was readable but nothing class-shaped was recognized.
    /// Distinct from [`ImportError::Extraction`] so callers can prompt for
    /// the alternate input path.
    #[error("no classes found in the input; try pasting the schedule text instead")]
    NoClassesFound,

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Parse and normalize candidates from a text blob (reconstructed or
/// pasted). Zero candidates is reported as [`ImportError::NoClassesFound`].
pub fn import_text(text: &str) -> Result<Vec<ParsedClass>> {
    let mut candidates = parser::parse_schedule(text);
    if candidates.is_empty() {
        return Err(ImportError::NoClassesFound);
    }

    normalize::normalize_all(&mut candidates);
    info!(count = candidates.len(), "extracted class candidates");
    Ok(candidates)
}

/// Full PDF pipeline: positioned fragments → reconstructed rows → parser.
#[cfg(feature = "pdf")]
pub fn import_pdf(bytes: &[u8]) -> Result<Vec<ParsedClass>> {
    let pages = pdf::extract_fragments(bytes)
        .map_err(|e| ImportError::Extraction(format!("{e:#}")))?;
    let blob = layout::reconstruct_document(&pages);
    import_text(&blob)
}

#[cfg(not(feature = "pdf"))]
pub fn import_pdf(_bytes: &[u8]) -> Result<Vec<ParsedClass>> {
    Err(ImportError::Extraction(
        "built without PDF support (enable the `pdf` feature)".into(),
    ))
}

/// Import whichever input the document source collaborator produced.
pub fn import_document(source: &DocumentSource) -> Result<Vec<ParsedClass>> {
    match source {
        DocumentSource::Pdf(bytes) => import_pdf(bytes),
        DocumentSource::Text(text) => import_text(text),
    }
}
