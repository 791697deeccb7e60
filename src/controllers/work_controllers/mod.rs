pub mod list_works;
pub mod models;
pub mod sync_nft_status;
pub mod update_blockchain_info;
