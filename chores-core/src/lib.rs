//! Chore records for the chore tracker.
//!
//! The tracker keeps every chore in one JSON array under [`STORAGE_KEY`]:
//!
//! ```text
//! [{ "id": "1714564800000",
//!    "name": "Vacuum",
//!    "history": ["2024-05-03T09:12:00.000Z", "2024-04-28T12:00:00.000Z"],
//!    "createdAt": "2024-05-01T12:00:00.000Z" }]
//! ```
//!
//! `history` is most-recent-first with at most one entry per calendar date.
//! Older blobs stored a single `lastDone` stamp instead; those records are
//! upgraded when the blob is read and written back in the list form.
//!
//! Reading and writing the blob itself is left to the host.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// Key the host stores the blob under.
pub const STORAGE_KEY: &str = "chores_data";

#[derive(Debug, thiserror::Error)]
pub enum ChoreError {
    #[error("invalid chore data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no chore with id {0}")]
    UnknownChore(String),

    #[error("chore name is empty")]
    EmptyName,

    #[error("invalid timestamp `{0}` (expected RFC 3339)")]
    InvalidStamp(String),
}

/// A chore as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredChore")]
pub struct Chore {
    pub id: String,
    pub name: String,
    /// Completion stamps, most recent first.
    pub history: Vec<String>,
    pub created_at: String,
}

impl Chore {
    /// The most recent completion stamp.
    pub fn last_done(&self) -> Option<&str> {
        self.history.first().map(String::as_str)
    }
}

/// Either record shape found in a blob.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredChore {
    id: String,
    name: String,
    #[serde(default)]
    history: Option<Vec<String>>,
    #[serde(default)]
    last_done: Option<String>,
    #[serde(default)]
    created_at: String,
}

impl From<StoredChore> for Chore {
    fn from(stored: StoredChore) -> Chore {
        let history = match stored.history {
            Some(history) => history,
            None => {
                debug!("migrating chore {} from lastDone", stored.id);
                stored.last_done.filter(|s| !s.is_empty()).into_iter().collect()
            }
        };
        Chore {
            id: stored.id,
            name: stored.name,
            history,
            created_at: stored.created_at,
        }
    }
}

/// Format a time the way the browser's `Date.toISOString()` does.
pub fn iso_stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_stamp(stamp: &str) -> Result<DateTime<Utc>, ChoreError> {
    DateTime::parse_from_rfc3339(stamp)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ChoreError::InvalidStamp(stamp.to_string()))
}

/// The `YYYY-MM-DD` part of a stamp.
fn date_part(stamp: &str) -> &str {
    stamp.split('T').next().unwrap_or(stamp)
}

/// All chores in one blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoreBook {
    chores: Vec<Chore>,
}

impl ChoreBook {
    pub fn new() -> ChoreBook {
        ChoreBook::default()
    }

    /// Read a blob, upgrading legacy records. An empty blob is an empty book.
    pub fn from_json(blob: &str) -> Result<ChoreBook, ChoreError> {
        if blob.trim().is_empty() {
            return Ok(ChoreBook::new());
        }
        let chores: Vec<Chore> = serde_json::from_str(blob)?;
        Ok(ChoreBook { chores })
    }

    pub fn to_json(&self) -> Result<String, ChoreError> {
        Ok(serde_json::to_string(&self.chores)?)
    }

    /// Chores in insertion order.
    pub fn chores(&self) -> &[Chore] {
        &self.chores
    }

    pub fn get(&self, id: &str) -> Option<&Chore> {
        self.chores.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Chore, ChoreError> {
        self.chores
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ChoreError::UnknownChore(id.to_string()))
    }

    /// Add a chore with an empty history. The id is the creation time in
    /// epoch milliseconds, bumped past any id already taken.
    pub fn add_chore(&mut self, name: &str, now: DateTime<Utc>) -> Result<&Chore, ChoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChoreError::EmptyName);
        }

        let mut millis = now.timestamp_millis();
        while self.get(&millis.to_string()).is_some() {
            millis += 1;
        }

        self.chores.push(Chore {
            id: millis.to_string(),
            name: name.to_string(),
            history: Vec::new(),
            created_at: iso_stamp(now),
        });
        Ok(&self.chores[self.chores.len() - 1])
    }

    /// Returns whether a chore was removed.
    pub fn delete_chore(&mut self, id: &str) -> bool {
        let before = self.chores.len();
        self.chores.retain(|c| c.id != id);
        self.chores.len() != before
    }

    /// Record a completion at `now`.
    pub fn mark_done(&mut self, id: &str, now: DateTime<Utc>) -> Result<bool, ChoreError> {
        self.add_history(id, &iso_stamp(now))
    }

    /// Record a completion on a calendar date, stamped at noon UTC.
    pub fn mark_done_on(&mut self, id: &str, date: NaiveDate) -> Result<bool, ChoreError> {
        let noon = date.and_hms_opt(12, 0, 0).map(|t| t.and_utc());
        match noon {
            Some(at) => self.add_history(id, &iso_stamp(at)),
            None => Err(ChoreError::InvalidStamp(date.to_string())),
        }
    }

    /// Add a completion stamp.
    ///
    /// Returns `false` without changing anything when the chore already has
    /// an entry on the same date. Otherwise the history is re-sorted
    /// most-recent-first.
    pub fn add_history(&mut self, id: &str, stamp: &str) -> Result<bool, ChoreError> {
        parse_stamp(stamp)?;
        let chore = self.get_mut(id)?;

        let day = date_part(stamp);
        if chore.history.iter().any(|h| date_part(h) == day) {
            debug!("chore {id} already done on {day}");
            return Ok(false);
        }

        chore.history.push(stamp.to_string());
        chore
            .history
            .sort_by_cached_key(|h| std::cmp::Reverse(parse_stamp(h).ok()));
        Ok(true)
    }

    /// Remove one exact stamp. Returns whether anything was removed.
    pub fn delete_history(&mut self, id: &str, stamp: &str) -> Result<bool, ChoreError> {
        let chore = self.get_mut(id)?;
        let before = chore.history.len();
        chore.history.retain(|h| h != stamp);
        Ok(chore.history.len() != before)
    }
}
