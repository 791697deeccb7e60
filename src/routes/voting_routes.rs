use axum::{routing::get, Router};

use crate::controllers::voting_controllers::check_work_voting;
use crate::state::AppState;

pub fn voting_routes() -> Router<AppState> {
    Router::new().route("/check-work-voting", get(check_work_voting::check_work_voting))
}
