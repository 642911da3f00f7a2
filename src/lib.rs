//! `classport` - schedule document ingestion pipeline
//!
//! Converts a semi-structured class schedule (a PDF with embedded
//! positioned text, or text pasted from a university portal) into
//! normalized, calendar-ready class records, with a human review step
//! before anything is committed.
//!
//! # Pipeline
//!
//! ```text
//! document / pasted text → layout reconstruction (PDF only) → entry parser
//!     → normalizer → review session → calendar-sync collaborator
//! ```
//!
//! # Example
//!
//! ```rust
//! use classport::{import_text, ReviewSession};
//!
//! let candidates = import_text("BUAD 123 - Business Fundamentals\nMWF 9:30AM - 10:45AM")?;
//! let mut session = ReviewSession::new();
//! session.load(candidates);
//! assert!(session.can_confirm());
//! # Ok::<(), classport::ImportError>(())
//! ```

pub mod extract;
pub mod normalize;
pub mod review;
pub mod schedule;
pub mod source;
pub mod sync;

pub use extract::{import_document, import_pdf, import_text, ImportError};
pub use review::{Candidate, CandidateMode, ReviewSession, ReviewState, WorkflowError};
pub use schedule::{decode_day_token, encode_day_set, DaySet, ParsedClass, Season, Term, Weekday};
pub use source::{load_document, DocumentSource};
pub use sync::{CalendarSync, CommitError, JsonCalendarFile};

/// Version of classport
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
