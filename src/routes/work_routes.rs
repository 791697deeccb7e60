use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::work_controllers::{list_works, sync_nft_status, update_blockchain_info};
use crate::state::AppState;

pub fn work_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_works::list_works))
        .route("/sync-nft-status", post(sync_nft_status::sync_nft_status))
        .route(
            "/update-blockchain-info",
            post(update_blockchain_info::update_blockchain_info),
        )
}
