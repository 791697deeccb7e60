use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::controllers::work_controllers::models::{ListWorksQuery, WorkResponse, WorksResponse};
use crate::db::store::WorkFilter;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn list_works(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ListWorksQuery>, AppError>,
) -> AppResult<Json<WorksResponse>> {
    let filter = WorkFilter::from_params(query.creator, query.work_id);

    let works = state.works.list(&filter).await?;
    tracing::debug!(?filter, count = works.len(), "listed works");

    Ok(Json(WorksResponse {
        works: works.into_iter().map(WorkResponse::from).collect(),
    }))
}
