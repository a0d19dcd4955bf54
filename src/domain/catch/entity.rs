use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catch submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCatch {
    pub species: String,
    pub bait: String,
    pub location: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A catch as stored in the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchRecord {
    /// 1-based position in the log; entries written before ids existed read as 0
    #[serde(default)]
    pub id: u64,
    pub species: String,
    pub bait: String,
    pub location: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub logged_at: Option<DateTime<Utc>>,
}

impl CatchRecord {
    pub fn from_new(id: u64, entry: NewCatch, logged_at: DateTime<Utc>) -> Self {
        Self {
            id,
            species: entry.species.trim().to_string(),
            bait: entry.bait.trim().to_string(),
            location: entry.location.trim().to_string(),
            date: entry.date.trim().to_string(),
            time: entry.time.trim().to_string(),
            notes: entry.notes.unwrap_or_default(),
            logged_at: Some(logged_at),
        }
    }
}
