use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UploadStatus {
    #[default]
    Pending,
    Uploaded,
    Minted,
    Other(String),
}

impl UploadStatus {
    pub fn as_str(&self) -> &str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploaded => "uploaded",
            UploadStatus::Minted => "minted",
            UploadStatus::Other(status) => status,
        }
    }
}

impl From<String> for UploadStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "pending" => UploadStatus::Pending,
            "uploaded" => UploadStatus::Uploaded,
            "minted" => UploadStatus::Minted,
            _ => UploadStatus::Other(status),
        }
    }
}

impl From<UploadStatus> for String {
    fn from(status: UploadStatus) -> Self {
        match status {
            UploadStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

/// A creative work. `id` is assigned at upload time and never changes; the
/// on-chain identifier lives in `blockchain_work_id` once the work is minted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub creator_address: String,

    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub is_minted: bool,
    #[serde(default)]
    pub owner_address: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub mint_tx_hash: Option<String>,

    #[serde(default)]
    pub blockchain_work_id: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub is_on_chain: bool,
    #[serde(default)]
    pub upload_status: UploadStatus,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl WorkRecord {
    /// True when `work_id` names this work, by internal or on-chain id.
    pub fn answers_to(&self, work_id: &str) -> bool {
        self.id == work_id || self.blockchain_work_id.as_deref() == Some(work_id)
    }
}
