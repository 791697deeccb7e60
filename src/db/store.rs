use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{voting_models::VotingRecord, work_models::WorkRecord};
use crate::utils::error::AppResult;

/// Which works a listing returns. A work id filter wins over a creator filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkFilter {
    All,
    Creator(String),
    Work(String),
}

impl WorkFilter {
    pub fn from_params(creator: Option<String>, work_id: Option<String>) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        match (non_empty(work_id), non_empty(creator)) {
            (Some(work_id), _) => WorkFilter::Work(work_id),
            (None, Some(creator)) => WorkFilter::Creator(creator),
            (None, None) => WorkFilter::All,
        }
    }

    pub fn matches(&self, work: &WorkRecord) -> bool {
        match self {
            WorkFilter::All => true,
            WorkFilter::Creator(creator) => &work.creator_address == creator,
            WorkFilter::Work(work_id) => work.answers_to(work_id),
        }
    }
}

/// Chain state observed for a work. The outer `Option` says whether the field
/// was reported at all; `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct NftStatusUpdate {
    pub token_id: Option<Option<String>>,
    pub is_minted: Option<bool>,
    pub owner_address: Option<Option<String>>,
    pub token_uri: Option<Option<String>>,
    pub mint_tx_hash: Option<Option<String>>,
}

impl NftStatusUpdate {
    pub fn apply(&self, work: &mut WorkRecord, now: DateTime<Utc>) {
        if let Some(token_id) = &self.token_id {
            work.token_id = token_id.clone();
        }
        if let Some(is_minted) = self.is_minted {
            work.is_minted = is_minted;
        }
        if let Some(owner_address) = &self.owner_address {
            work.owner_address = owner_address.clone();
        }
        if let Some(token_uri) = &self.token_uri {
            work.token_uri = token_uri.clone();
        }
        if let Some(mint_tx_hash) = &self.mint_tx_hash {
            work.mint_tx_hash = mint_tx_hash.clone();
        }
        work.updated_at = now;
    }
}

/// Resolves `work_id` against a set of works: an exact internal id wins over
/// a matching on-chain id.
pub fn resolve_work<'a, I>(works: I, work_id: &str) -> Option<&'a WorkRecord>
where
    I: IntoIterator<Item = &'a WorkRecord>,
{
    let mut by_chain_id = None;
    for work in works {
        if work.id == work_id {
            return Some(work);
        }
        if by_chain_id.is_none() && work.blockchain_work_id.as_deref() == Some(work_id) {
            by_chain_id = Some(work);
        }
    }
    by_chain_id
}

#[derive(Debug, Clone)]
pub struct ChainPromotion {
    pub work_id: String,
    pub blockchain_work_id: String,
    pub tx_hash: String,
}

#[async_trait]
pub trait VotingStore: Send + Sync {
    /// Votings attached to `work_id`. Implementations stop after two records;
    /// the caller only needs to tell "none", "one" and "ambiguous" apart.
    async fn find_by_work_id(&self, work_id: &str) -> AppResult<Vec<VotingRecord>>;

    /// Flips the voting to `ended` only if it is still `active`. Returns
    /// whether this call performed the transition.
    async fn end_if_active(&self, voting_id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait WorkStore: Send + Sync {
    /// Matching works, newest `created_at` first.
    async fn list(&self, filter: &WorkFilter) -> AppResult<Vec<WorkRecord>>;

    /// Writes the observed chain state onto the work that answers to `work_id`.
    /// `Ok(None)` when no work matches.
    async fn apply_nft_status(
        &self,
        work_id: &str,
        update: &NftStatusUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<Option<WorkRecord>>;

    /// Records the on-chain id of the work whose internal id is
    /// `promotion.work_id`. `Ok(None)` when no work matches; `Conflict` when the
    /// work already carries another on-chain id or the id belongs to another work.
    async fn promote_to_chain(
        &self,
        promotion: &ChainPromotion,
        now: DateTime<Utc>,
    ) -> AppResult<Option<WorkRecord>>;
}
