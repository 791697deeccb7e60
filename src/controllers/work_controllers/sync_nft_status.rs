use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use chrono::Utc;

use crate::config::MissingWorkPolicy;
use crate::controllers::work_controllers::models::{
    MutationResponse, SyncNftStatusRequest, WorkResponse,
};
use crate::db::store::NftStatusUpdate;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn sync_nft_status(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<SyncNftStatusRequest>, AppError>,
) -> AppResult<Json<MutationResponse<Vec<WorkResponse>>>> {
    let work_id = payload
        .work_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::ValidationError("workId is required".to_string()))?;

    let update = NftStatusUpdate {
        token_id: payload.token_id,
        is_minted: payload.is_minted,
        owner_address: payload.owner_address,
        token_uri: payload.token_uri,
        mint_tx_hash: payload.mint_tx_hash,
    };

    let updated = state
        .works
        .apply_nft_status(&work_id, &update, Utc::now())
        .await?;

    let data: Vec<WorkResponse> = match updated {
        Some(work) => {
            tracing::info!(%work_id, is_minted = work.is_minted, "nft status synced");
            vec![work.into()]
        }
        None => match state.missing_work_policy {
            MissingWorkPolicy::Ignore => {
                tracing::warn!(%work_id, "nft status sync matched no work");
                Vec::new()
            }
            MissingWorkPolicy::Reject => {
                return Err(AppError::NotFound(format!("Work {} not found", work_id)))
            }
        },
    };

    Ok(Json(MutationResponse {
        success: true,
        message: "NFT status synced".to_string(),
        data,
    }))
}
