//! Calendar-sync collaborator seam.
//!
//! Commit hands the confirmed candidate set to a [`CalendarSync`]
//! implementation as one batch. The storage format is the collaborator's
//! business; the workflow only requires that a failed batch leaves the
//! candidate set intact for retry.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::schedule::ParsedClass;

/// Calendar-sync failures. Any variant leaves the review session in
/// `Reviewing` with its candidates preserved.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("calendar sync rejected the batch: {0}")]
    Rejected(String),

    #[error("calendar store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("calendar store serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Accepts a finalized, user-confirmed batch of class records.
#[async_trait]
pub trait CalendarSync: Send + Sync {
    async fn commit(&self, classes: &[ParsedClass]) -> Result<(), CommitError>;
}

/// File-backed calendar store: committed records accumulate in a JSON
/// array on disk. The CLI's default commit sink.
pub struct JsonCalendarFile {
    path: PathBuf,
}

impl JsonCalendarFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl CalendarSync for JsonCalendarFile {
    async fn commit(&self, classes: &[ParsedClass]) -> Result<(), CommitError> {
        let mut stored: Vec<ParsedClass> = match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        stored.extend_from_slice(classes);
        let json = serde_json::to_vec_pretty(&stored)?;
        tokio::fs::write(&self.path, json).await?;

        info!(
            added = classes.len(),
            total = stored.len(),
            path = %self.path.display(),
            "committed classes to calendar store"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("classport-{}-{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn commit_appends_across_batches() {
        let path = temp_store("append");
        let _ = std::fs::remove_file(&path);
        let store = JsonCalendarFile::new(&path);

        store.commit(&[ParsedClass::new("BUAD 123")]).await.unwrap();
        store.commit(&[ParsedClass::new("MATH201")]).await.unwrap();

        let stored: Vec<ParsedClass> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].course_code, "BUAD 123");
        assert_eq!(stored[1].course_code, "MATH201");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_store_reports_json_error() {
        let path = temp_store("corrupt");
        std::fs::write(&path, b"not json").unwrap();
        let store = JsonCalendarFile::new(&path);

        let err = tokio_test::block_on(store.commit(&[ParsedClass::new("BUAD 123")]))
            .unwrap_err();
        assert!(matches!(err, CommitError::Json(_)));

        let _ = std::fs::remove_file(&path);
    }
}
