use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};

use crate::controllers::voting_controllers::models::{CheckWorkVotingQuery, WorkVotingResponse};
use crate::db::store::VotingStore;
use crate::models::voting_models::VotingStatus;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn check_work_voting(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<CheckWorkVotingQuery>, AppError>,
) -> AppResult<Json<WorkVotingResponse>> {
    let work_id = query
        .work_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::ValidationError("workId is required".to_string()))?;

    let response = resolve_work_voting(state.votings.as_ref(), &work_id, Utc::now()).await?;

    Ok(Json(response))
}

/// Looks up the voting attached to `work_id` and reports its status as of
/// `now`. A voting still stored as `active` after its end date is reported as
/// `ended` and the store is corrected.
pub async fn resolve_work_voting(
    store: &dyn VotingStore,
    work_id: &str,
    now: DateTime<Utc>,
) -> AppResult<WorkVotingResponse> {
    let mut votings = store.find_by_work_id(work_id).await?;

    let mut voting = match votings.len() {
        0 => return Ok(WorkVotingResponse::none()),
        1 => votings.remove(0),
        _ => {
            return Err(AppError::InternalError(format!(
                "more than one voting is attached to work {}",
                work_id
            )))
        }
    };

    if voting.has_expired(now) {
        if store.end_if_active(voting.id).await? {
            tracing::info!(voting_id = voting.id, work_id, "voting ended");
        }
        voting.status = VotingStatus::Ended;
    }

    Ok(WorkVotingResponse {
        has_voting: true,
        voting_status: Some(voting.status.into()),
        voting_title: Some(voting.title),
        voting_id: Some(voting.id),
    })
}
