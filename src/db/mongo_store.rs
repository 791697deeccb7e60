use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::ReturnDocument,
    Collection, Database,
};

use crate::db::store::{ChainPromotion, NftStatusUpdate, VotingStore, WorkFilter, WorkStore};
use crate::models::{
    voting_models::{VotingRecord, VotingStatus},
    work_models::{UploadStatus, WorkRecord},
};
use crate::utils::error::{AppError, AppResult};

pub const VOTINGS: &str = "votings";
pub const WORKS: &str = "works";

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn votings(&self) -> Collection<VotingRecord> {
        self.db.collection::<VotingRecord>(VOTINGS)
    }

    fn works(&self) -> Collection<WorkRecord> {
        self.db.collection::<WorkRecord>(WORKS)
    }
}

fn bson_date(at: DateTime<Utc>) -> Bson {
    Bson::DateTime(mongodb::bson::DateTime::from_chrono(at))
}

fn nullable(value: &Option<String>) -> Bson {
    match value {
        Some(value) => Bson::String(value.clone()),
        None => Bson::Null,
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn claimed_conflict(promotion: &ChainPromotion) -> AppError {
    AppError::Conflict(format!(
        "On-chain work id {} belongs to another work",
        promotion.blockchain_work_id
    ))
}

/// Votings whose `work_id` is stored either as the string or, for numeric
/// ids, as an integer.
fn voting_by_work_filter(work_id: &str) -> Document {
    match work_id.parse::<i64>() {
        Ok(numeric) => doc! { "work_id": { "$in": [work_id, numeric] } },
        Err(_) => doc! { "work_id": work_id },
    }
}

fn end_if_active_filter(voting_id: i64) -> Document {
    doc! { "_id": voting_id, "status": VotingStatus::Active.as_str() }
}

fn end_voting_update() -> Document {
    doc! { "$set": { "status": VotingStatus::Ended.as_str() } }
}

fn works_filter(filter: &WorkFilter) -> Document {
    match filter {
        WorkFilter::All => doc! {},
        WorkFilter::Creator(creator) => doc! { "creator_address": creator },
        WorkFilter::Work(work_id) => {
            doc! { "$or": [ { "_id": work_id }, { "blockchain_work_id": work_id } ] }
        }
    }
}

fn nft_status_update(update: &NftStatusUpdate, now: DateTime<Utc>) -> Document {
    let mut set = doc! { "updated_at": bson_date(now) };
    if let Some(token_id) = &update.token_id {
        set.insert("token_id", nullable(token_id));
    }
    if let Some(is_minted) = update.is_minted {
        set.insert("is_minted", is_minted);
    }
    if let Some(owner_address) = &update.owner_address {
        set.insert("owner_address", nullable(owner_address));
    }
    if let Some(token_uri) = &update.token_uri {
        set.insert("token_uri", nullable(token_uri));
    }
    if let Some(mint_tx_hash) = &update.mint_tx_hash {
        set.insert("mint_tx_hash", nullable(mint_tx_hash));
    }
    doc! { "$set": set }
}

fn claimed_elsewhere_filter(promotion: &ChainPromotion) -> Document {
    doc! {
        "_id": { "$ne": &promotion.work_id },
        "$or": [
            { "_id": &promotion.blockchain_work_id },
            { "blockchain_work_id": &promotion.blockchain_work_id },
        ],
    }
}

/// Matches the work only while it has no on-chain id or already has this one.
fn promotion_filter(promotion: &ChainPromotion) -> Document {
    doc! {
        "_id": &promotion.work_id,
        "$or": [
            { "blockchain_work_id": Bson::Null },
            { "blockchain_work_id": &promotion.blockchain_work_id },
        ],
    }
}

fn promotion_update(promotion: &ChainPromotion, now: DateTime<Utc>) -> Document {
    doc! {
        "$set": {
            "blockchain_work_id": &promotion.blockchain_work_id,
            "tx_hash": &promotion.tx_hash,
            "is_on_chain": true,
            "upload_status": UploadStatus::Minted.as_str(),
            "updated_at": bson_date(now),
        }
    }
}

#[async_trait]
impl VotingStore for MongoStore {
    async fn find_by_work_id(&self, work_id: &str) -> AppResult<Vec<VotingRecord>> {
        let votings: Vec<VotingRecord> = self
            .votings()
            .find(voting_by_work_filter(work_id))
            .limit(2)
            .await?
            .try_collect()
            .await?;
        Ok(votings)
    }

    async fn end_if_active(&self, voting_id: i64) -> AppResult<bool> {
        let result = self
            .votings()
            .update_one(end_if_active_filter(voting_id), end_voting_update())
            .await?;
        Ok(result.modified_count == 1)
    }
}

#[async_trait]
impl WorkStore for MongoStore {
    async fn list(&self, filter: &WorkFilter) -> AppResult<Vec<WorkRecord>> {
        let works: Vec<WorkRecord> = self
            .works()
            .find(works_filter(filter))
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(works)
    }

    async fn apply_nft_status(
        &self,
        work_id: &str,
        update: &NftStatusUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<Option<WorkRecord>> {
        let works = self.works();
        let modifications = nft_status_update(update, now);

        // An exact internal id wins over an on-chain id.
        for filter in [doc! { "_id": work_id }, doc! { "blockchain_work_id": work_id }] {
            let updated = works
                .find_one_and_update(filter, modifications.clone())
                .return_document(ReturnDocument::After)
                .await?;
            if updated.is_some() {
                return Ok(updated);
            }
        }
        Ok(None)
    }

    async fn promote_to_chain(
        &self,
        promotion: &ChainPromotion,
        now: DateTime<Utc>,
    ) -> AppResult<Option<WorkRecord>> {
        let works = self.works();

        let Some(existing) = works.find_one(doc! { "_id": &promotion.work_id }).await? else {
            return Ok(None);
        };

        if let Some(current) = &existing.blockchain_work_id {
            if current != &promotion.blockchain_work_id {
                return Err(AppError::Conflict(format!(
                    "Work {} is already registered on-chain as {}",
                    existing.id, current
                )));
            }
        }

        if works.find_one(claimed_elsewhere_filter(promotion)).await?.is_some() {
            return Err(claimed_conflict(promotion));
        }

        let updated = works
            .find_one_and_update(promotion_filter(promotion), promotion_update(promotion, now))
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    claimed_conflict(promotion)
                } else {
                    AppError::from(e)
                }
            })?;

        // The work was seen above; no match now means a concurrent promotion
        // gave it another on-chain id.
        updated.map(Some).ok_or_else(|| {
            AppError::Conflict(format!(
                "Work {} was registered on-chain concurrently",
                promotion.work_id
            ))
        })
    }
}
