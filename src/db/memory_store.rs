use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::db::store::{
    resolve_work, ChainPromotion, NftStatusUpdate, VotingStore, WorkFilter, WorkStore,
};
use crate::models::{
    voting_models::{VotingRecord, VotingStatus},
    work_models::{UploadStatus, WorkRecord},
};
use crate::utils::error::{AppError, AppResult};

/// In-process store for tests and throwaway local runs. Every operation holds
/// the relevant lock for its whole duration, so each call is atomic.
#[derive(Default)]
pub struct MemoryStore {
    votings: RwLock<HashMap<i64, VotingRecord>>,
    works: RwLock<HashMap<String, WorkRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStore {
    pub async fn insert_voting(&self, voting: VotingRecord) {
        self.votings.write().await.insert(voting.id, voting);
    }

    pub async fn insert_work(&self, work: WorkRecord) {
        self.works.write().await.insert(work.id.clone(), work);
    }

    pub async fn voting(&self, voting_id: i64) -> Option<VotingRecord> {
        self.votings.read().await.get(&voting_id).cloned()
    }

    pub async fn work(&self, work_id: &str) -> Option<WorkRecord> {
        self.works.read().await.get(work_id).cloned()
    }
}

#[async_trait]
impl VotingStore for MemoryStore {
    async fn find_by_work_id(&self, work_id: &str) -> AppResult<Vec<VotingRecord>> {
        let votings = self.votings.read().await;
        Ok(votings
            .values()
            .filter(|voting| voting.work_id == work_id)
            .take(2)
            .cloned()
            .collect())
    }

    async fn end_if_active(&self, voting_id: i64) -> AppResult<bool> {
        let mut votings = self.votings.write().await;
        match votings.get_mut(&voting_id) {
            Some(voting) if voting.status == VotingStatus::Active => {
                voting.status = VotingStatus::Ended;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl WorkStore for MemoryStore {
    async fn list(&self, filter: &WorkFilter) -> AppResult<Vec<WorkRecord>> {
        let works = self.works.read().await;
        let mut matching: Vec<WorkRecord> = works
            .values()
            .filter(|work| filter.matches(work))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn apply_nft_status(
        &self,
        work_id: &str,
        update: &NftStatusUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<Option<WorkRecord>> {
        let mut works = self.works.write().await;
        let Some(key) = resolve_work(works.values(), work_id).map(|work| work.id.clone()) else {
            return Ok(None);
        };
        let Some(work) = works.get_mut(&key) else {
            return Ok(None);
        };
        update.apply(work, now);
        Ok(Some(work.clone()))
    }

    async fn promote_to_chain(
        &self,
        promotion: &ChainPromotion,
        now: DateTime<Utc>,
    ) -> AppResult<Option<WorkRecord>> {
        let mut works = self.works.write().await;

        let claimed_elsewhere = works
            .values()
            .any(|w| w.id != promotion.work_id && w.answers_to(&promotion.blockchain_work_id));

        let Some(work) = works.get_mut(&promotion.work_id) else {
            return Ok(None);
        };

        if let Some(existing) = &work.blockchain_work_id {
            if existing != &promotion.blockchain_work_id {
                return Err(AppError::Conflict(format!(
                    "Work {} is already registered on-chain as {}",
                    work.id, existing
                )));
            }
        }
        if claimed_elsewhere {
            return Err(AppError::Conflict(format!(
                "On-chain work id {} belongs to another work",
                promotion.blockchain_work_id
            )));
        }

        work.blockchain_work_id = Some(promotion.blockchain_work_id.clone());
        work.tx_hash = Some(promotion.tx_hash.clone());
        work.is_on_chain = true;
        work.upload_status = UploadStatus::Minted;
        work.updated_at = now;

        Ok(Some(work.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn work(id: &str, creator: &str, created_at: DateTime<Utc>) -> WorkRecord {
        WorkRecord {
            id: id.to_string(),
            title: format!("Work {}", id),
            description: None,
            creator_address: creator.to_string(),
            token_id: None,
            is_minted: false,
            owner_address: None,
            token_uri: None,
            mint_tx_hash: None,
            blockchain_work_id: None,
            tx_hash: None,
            is_on_chain: false,
            upload_status: UploadStatus::Uploaded,
            created_at,
            updated_at: created_at,
        }
    }

    fn promotion(work_id: &str, chain_id: &str) -> ChainPromotion {
        ChainPromotion {
            work_id: work_id.to_string(),
            blockchain_work_id: chain_id.to_string(),
            tx_hash: "0xfeed".to_string(),
        }
    }

    #[tokio::test]
    async fn end_if_active_transitions_once() {
        let store = MemoryStore::new();
        store
            .insert_voting(VotingRecord {
                id: 3,
                title: "Cover art".to_string(),
                status: VotingStatus::Active,
                end_date: Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap(),
                work_id: "w1".to_string(),
            })
            .await;

        assert!(store.end_if_active(3).await.unwrap());
        assert!(!store.end_if_active(3).await.unwrap());
        assert!(!store.end_if_active(99).await.unwrap());
        assert_eq!(store.voting(3).await.unwrap().status, VotingStatus::Ended);
    }

    #[tokio::test]
    async fn list_sorts_newest_first() {
        let store = MemoryStore::new();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.insert_work(work("a", "0x1", base)).await;
        store.insert_work(work("b", "0x1", base + Duration::hours(2))).await;
        store.insert_work(work("c", "0x1", base + Duration::hours(1))).await;

        let ids: Vec<String> = store
            .list(&WorkFilter::All)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn promotion_keeps_the_internal_id() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert_work(work("temp-1", "0x1", now)).await;

        let promoted = store
            .promote_to_chain(&promotion("temp-1", "17"), now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(promoted.id, "temp-1");
        assert_eq!(promoted.blockchain_work_id.as_deref(), Some("17"));
        assert!(promoted.is_on_chain);
        assert_eq!(promoted.upload_status, UploadStatus::Minted);

        // The on-chain id now reaches the same record.
        let found = store.list(&WorkFilter::Work("17".into())).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "temp-1");
    }

    #[tokio::test]
    async fn promotion_is_idempotent_but_not_reassignable() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert_work(work("temp-1", "0x1", now)).await;

        store.promote_to_chain(&promotion("temp-1", "17"), now).await.unwrap();
        assert!(store
            .promote_to_chain(&promotion("temp-1", "17"), now)
            .await
            .unwrap()
            .is_some());

        let err = store
            .promote_to_chain(&promotion("temp-1", "18"), now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn promotion_rejects_an_id_owned_by_another_work() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert_work(work("temp-1", "0x1", now)).await;
        store.insert_work(work("temp-2", "0x1", now)).await;

        store.promote_to_chain(&promotion("temp-1", "17"), now).await.unwrap();
        let err = store
            .promote_to_chain(&promotion("temp-2", "17"), now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(store.work("temp-2").await.unwrap().blockchain_work_id.is_none());
    }

    #[tokio::test]
    async fn nft_sync_prefers_the_internal_id() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut promoted = work("temp-1", "0x1", now);
        promoted.blockchain_work_id = Some("17".to_string());
        store.insert_work(promoted).await;
        store.insert_work(work("17", "0x2", now)).await;

        let update = NftStatusUpdate {
            is_minted: Some(true),
            ..Default::default()
        };
        let updated = store.apply_nft_status("17", &update, now).await.unwrap().unwrap();

        assert_eq!(updated.id, "17");
        assert!(store.work("17").await.unwrap().is_minted);
        assert!(!store.work("temp-1").await.unwrap().is_minted);
    }

    #[tokio::test]
    async fn promotion_of_unknown_work_is_none() {
        let store = MemoryStore::new();
        let outcome = store
            .promote_to_chain(&promotion("missing", "17"), Utc::now())
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn unknown_work_is_none_even_when_the_chain_id_is_taken() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert_work(work("temp-1", "0x1", now)).await;
        store.promote_to_chain(&promotion("temp-1", "17"), now).await.unwrap();

        let outcome = store
            .promote_to_chain(&promotion("missing", "17"), now)
            .await
            .unwrap();
        assert!(outcome.is_none());
    }
}
