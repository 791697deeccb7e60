use axum::Router;

use crate::state::AppState;

pub mod voting_routes;
pub mod work_routes;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/votings", voting_routes::voting_routes())
        .nest("/works", work_routes::work_routes())
        .with_state(state)
}
