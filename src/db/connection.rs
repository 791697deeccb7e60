use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};

use crate::db::mongo_store::{VOTINGS, WORKS};
use crate::models::{voting_models::VotingRecord, work_models::WorkRecord};
use crate::utils::error::{AppError, AppResult};

pub async fn init_db(mongo_uri: &str, db_name: &str) -> AppResult<Database> {
    let mut client_options = ClientOptions::parse(mongo_uri)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse MongoDB URI: {}", e)))?;

    client_options.app_name = Some("WorksBackend".to_string());

    let client = Client::with_options(client_options)
        .map_err(|e| AppError::DatabaseError(format!("Failed to initialize MongoDB client: {}", e)))?;

    let db = client.database(db_name);
    ensure_indexes(&db).await?;

    tracing::info!(db = db_name, "database connection established");

    Ok(db)
}

async fn ensure_indexes(db: &Database) -> AppResult<()> {
    let works = db.collection::<WorkRecord>(WORKS);

    works
        .create_index(
            IndexModel::builder()
                .keys(doc! { "creator_address": 1, "created_at": -1 })
                .build(),
        )
        .await?;

    // Only one work may claim a given on-chain id; unpromoted works are skipped.
    works
        .create_index(
            IndexModel::builder()
                .keys(doc! { "blockchain_work_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(doc! { "blockchain_work_id": { "$type": "string" } })
                        .build(),
                )
                .build(),
        )
        .await?;

    db.collection::<VotingRecord>(VOTINGS)
        .create_index(IndexModel::builder().keys(doc! { "work_id": 1 }).build())
        .await?;

    Ok(())
}
