use std::sync::Arc;

use crate::config::MissingWorkPolicy;
use crate::db::store::{VotingStore, WorkStore};

#[derive(Clone)]
pub struct AppState {
    pub votings: Arc<dyn VotingStore>,
    pub works: Arc<dyn WorkStore>,
    pub missing_work_policy: MissingWorkPolicy,
}

impl AppState {
    pub fn new(
        votings: Arc<dyn VotingStore>,
        works: Arc<dyn WorkStore>,
        missing_work_policy: MissingWorkPolicy,
    ) -> Self {
        Self {
            votings,
            works,
            missing_work_policy,
        }
    }
}
