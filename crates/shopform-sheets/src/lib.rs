//! # shopform-sheets
//!
//! Spreadsheet adapter for the Shopform sheet server.
//!
//! Rows are appended to the first worksheet of a Google spreadsheet using a
//! service-account credential file. The [`RowSink`] trait is the seam the
//! server depends on; [`MemorySink`] records rows in-process.

pub mod auth;
pub mod client;

use std::sync::Mutex;

use async_trait::async_trait;

pub use auth::{ServiceAccountKey, ServiceAccountTokens, StaticToken, TokenSource};
pub use client::{SheetsClient, SheetsEndpoints, SpreadsheetRef};

/// Spreadsheet adapter errors.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid credentials: {0}")]
    Credentials(String),

    #[error("token exchange failed: {0}")]
    Token(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("spreadsheet {0} has no worksheets")]
    NoWorksheet(String),
}

pub type Result<T> = std::result::Result<T, SheetsError>;

/// Destination for finished submissions, one row per call.
#[async_trait]
pub trait RowSink: Send + Sync {
    /// Append a single row. No deduplication happens at this layer.
    async fn append_row(&self, row: Vec<String>) -> Result<()>;
}

/// Sink that keeps appended rows in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Mutex<Vec<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row appended so far.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().map_or_else(|_| Vec::new(), |rows| rows.clone())
    }
}

#[async_trait]
impl RowSink for MemorySink {
    async fn append_row(&self, row: Vec<String>) -> Result<()> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| SheetsError::Io(std::io::Error::other("memory sink lock poisoned")))?;
        tracing::debug!(row = rows.len() + 1, "Appending row to memory sink");
        rows.push(row);
        Ok(())
    }
}
