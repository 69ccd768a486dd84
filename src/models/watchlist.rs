use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AnimeRecord;

/// Viewing status of a watchlist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchStatus {
    #[serde(rename = "Plan to Watch")]
    PlanToWatch,
    Watching,
    Completed,
}

impl WatchStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlanToWatch => "Plan to Watch",
            Self::Watching => "Watching",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Plan to Watch" => Ok(Self::PlanToWatch),
            "Watching" => Ok(Self::Watching),
            "Completed" => Ok(Self::Completed),
            other => Err(format!("Invalid status value: {other}")),
        }
    }
}

/// A watchlist entry joined with its catalog record.
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistRecord {
    #[serde(flatten)]
    pub anime: AnimeRecord,
    pub watchlist_status: String,
    pub date_added: String,
    pub last_updated: String,
}
