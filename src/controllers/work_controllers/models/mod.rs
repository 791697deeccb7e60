use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{string_or_integer, work_models::WorkRecord};

#[derive(Deserialize, Debug)]
pub struct ListWorksQuery {
    pub creator: Option<String>,
    #[serde(rename = "workId")]
    pub work_id: Option<String>,
}

/// Chain fields follow "absent keeps, null clears": an omitted key leaves the
/// stored value alone, an explicit `null` erases it. `isMinted` is a flag, so
/// `null` is treated as omitted.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SyncNftStatusRequest {
    pub work_id: Option<String>,
    #[serde(default, deserialize_with = "reported_id")]
    pub token_id: Option<Option<String>>,
    pub is_minted: Option<bool>,
    #[serde(default, deserialize_with = "reported")]
    pub owner_address: Option<Option<String>>,
    #[serde(default, rename = "tokenURI", deserialize_with = "reported")]
    pub token_uri: Option<Option<String>>,
    #[serde(default, deserialize_with = "reported")]
    pub mint_tx_hash: Option<Option<String>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlockchainInfoRequest {
    pub temp_work_id: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub blockchain_work_id: Option<String>,
    pub tx_hash: Option<String>,
}

#[derive(Deserialize)]
struct Id(#[serde(deserialize_with = "string_or_integer")] String);

/// Only called when the key is present, so `null` becomes `Some(None)`.
fn reported<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn reported_id<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_id(deserializer).map(Some)
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Id>::deserialize(deserializer)?.map(|Id(id)| id))
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorkResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub creator_address: String,
    pub token_id: Option<String>,
    pub is_minted: bool,
    pub owner_address: Option<String>,
    pub token_uri: Option<String>,
    pub mint_tx_hash: Option<String>,
    pub blockchain_work_id: Option<String>,
    pub tx_hash: Option<String>,
    pub is_on_chain: bool,
    pub upload_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkRecord> for WorkResponse {
    fn from(work: WorkRecord) -> Self {
        Self {
            id: work.id,
            title: work.title,
            description: work.description,
            creator_address: work.creator_address,
            token_id: work.token_id,
            is_minted: work.is_minted,
            owner_address: work.owner_address,
            token_uri: work.token_uri,
            mint_tx_hash: work.mint_tx_hash,
            blockchain_work_id: work.blockchain_work_id,
            tx_hash: work.tx_hash,
            is_on_chain: work.is_on_chain,
            upload_status: work.upload_status.into(),
            created_at: work.created_at,
            updated_at: work.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct WorksResponse {
    pub works: Vec<WorkResponse>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MutationResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}
