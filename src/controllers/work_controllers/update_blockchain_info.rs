use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use chrono::Utc;

use crate::controllers::work_controllers::models::{
    MutationResponse, UpdateBlockchainInfoRequest, WorkResponse,
};
use crate::db::store::ChainPromotion;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::ValidationError(format!("{} is required", field)))
}

pub async fn update_blockchain_info(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateBlockchainInfoRequest>, AppError>,
) -> AppResult<Json<MutationResponse<WorkResponse>>> {
    let promotion = ChainPromotion {
        work_id: required(payload.temp_work_id, "tempWorkId")?,
        blockchain_work_id: required(payload.blockchain_work_id, "blockchainWorkId")?,
        tx_hash: required(payload.tx_hash, "txHash")?,
    };

    let work = state
        .works
        .promote_to_chain(&promotion, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Work {} not found", promotion.work_id)))?;

    tracing::info!(
        work_id = %work.id,
        blockchain_work_id = %promotion.blockchain_work_id,
        tx_hash = %promotion.tx_hash,
        "work registered on-chain"
    );

    Ok(Json(MutationResponse {
        success: true,
        message: "Blockchain info updated".to_string(),
        data: work.into(),
    }))
}
