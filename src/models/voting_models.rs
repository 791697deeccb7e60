use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::models::string_or_integer;

/// Lifecycle status of a voting. Values this service does not know about are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VotingStatus {
    Active,
    Ended,
    Other(String),
}

impl VotingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            VotingStatus::Active => "active",
            VotingStatus::Ended => "ended",
            VotingStatus::Other(status) => status,
        }
    }
}

impl From<String> for VotingStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "active" => VotingStatus::Active,
            "ended" => VotingStatus::Ended,
            _ => VotingStatus::Other(status),
        }
    }
}

impl From<VotingStatus> for String {
    fn from(status: VotingStatus) -> Self {
        match status {
            VotingStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VotingRecord {
    #[serde(rename = "_id")]
    pub id: i64,
    pub title: String,
    pub status: VotingStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub end_date: DateTime<Utc>,
    /// Written as a string by this service; integer ids left by other
    /// writers are read back as their decimal form.
    #[serde(deserialize_with = "string_or_integer")]
    pub work_id: String,
}

impl VotingRecord {
    /// An `active` voting whose end date lies strictly before `now` is stale:
    /// it must read as `ended`.
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == VotingStatus::Active && now > self.end_date
    }
}
