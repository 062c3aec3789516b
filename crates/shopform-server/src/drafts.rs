//! Server-held state for the sheet server's two-page flow.
//!
//! The intake details wait in a [`DraftStore`] under a random token until
//! the classification page is submitted. [`SubmissionLedger`] remembers
//! which tokens and request ids were already appended so a resubmitted form
//! does not produce a second row.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use shopform_types::ContactDetails;
use tokio::sync::Mutex;

/// Generate a 128-bit random token, hex encoded.
pub fn new_token() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}

struct Draft {
    details: ContactDetails,
    created_at: Instant,
}

/// Intake details awaiting classification, keyed by token.
pub struct DraftStore {
    ttl: Duration,
    drafts: Mutex<HashMap<String, Draft>>,
}

impl DraftStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            drafts: Mutex::new(HashMap::new()),
        }
    }

    /// Store details and return the token that retrieves them.
    pub async fn insert(&self, details: ContactDetails) -> String {
        let token = new_token();
        let mut drafts = self.drafts.lock().await;
        let ttl = self.ttl;
        drafts.retain(|_, d| d.created_at.elapsed() < ttl);
        drafts.insert(
            token.clone(),
            Draft {
                details,
                created_at: Instant::now(),
            },
        );
        token
    }

    /// Put details back under an existing token, restarting its lifetime.
    pub async fn restore(&self, token: &str, details: ContactDetails) {
        self.drafts.lock().await.insert(
            token.to_string(),
            Draft {
                details,
                created_at: Instant::now(),
            },
        );
    }

    /// Remove and return a live draft.
    pub async fn take(&self, token: &str) -> Option<ContactDetails> {
        let draft = self.drafts.lock().await.remove(token)?;
        (draft.created_at.elapsed() < self.ttl).then_some(draft.details)
    }

    /// Return a copy of a live draft, leaving it in place.
    pub async fn get(&self, token: &str) -> Option<ContactDetails> {
        let drafts = self.drafts.lock().await;
        drafts
            .get(token)
            .filter(|d| d.created_at.elapsed() < self.ttl)
            .map(|d| d.details.clone())
    }

    /// Drop expired drafts. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut drafts = self.drafts.lock().await;
        let before = drafts.len();
        let ttl = self.ttl;
        drafts.retain(|_, d| d.created_at.elapsed() < ttl);
        before - drafts.len()
    }

    pub async fn len(&self) -> usize {
        self.drafts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Outcome of [`SubmissionLedger::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The caller owns the submission and must `finish` or `forget` it.
    Started,
    /// Another request is appending this submission right now.
    InFlight,
    /// Already appended.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Pending,
    Done,
}

/// Submission identifiers (draft tokens or request ids), each pending
/// while its append runs and done once it succeeded. Done entries are kept
/// for one TTL window.
pub struct SubmissionLedger {
    ttl: Duration,
    seen: Mutex<HashMap<String, (Entry, Instant)>>,
}

impl SubmissionLedger {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Claim an identifier. Only a `Started` caller may append.
    pub async fn begin(&self, id: &str) -> Admission {
        let mut seen = self.seen.lock().await;
        let ttl = self.ttl;
        seen.retain(|_, (entry, at)| *entry == Entry::Pending || at.elapsed() < ttl);
        match seen.get(id) {
            Some((Entry::Pending, _)) => Admission::InFlight,
            Some((Entry::Done, _)) => Admission::Done,
            None => {
                seen.insert(id.to_string(), (Entry::Pending, Instant::now()));
                Admission::Started
            }
        }
    }

    /// Mark a started submission as appended.
    pub async fn finish(&self, id: &str) {
        self.seen
            .lock()
            .await
            .insert(id.to_string(), (Entry::Done, Instant::now()));
    }

    /// Drop an identifier so the submission can be retried.
    pub async fn forget(&self, id: &str) {
        self.seen.lock().await.remove(id);
    }

    /// Whether the identifier was appended within the TTL window.
    pub async fn is_done(&self, id: &str) -> bool {
        self.seen
            .lock()
            .await
            .get(id)
            .is_some_and(|(entry, at)| *entry == Entry::Done && at.elapsed() < self.ttl)
    }

    pub async fn is_pending(&self, id: &str) -> bool {
        matches!(self.seen.lock().await.get(id), Some((Entry::Pending, _)))
    }
}
