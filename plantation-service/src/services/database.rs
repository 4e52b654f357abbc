use mongodb::{
    bson::doc, options::ClientOptions, options::IndexOptions, Client as MongoClient, Collection,
    Database, IndexModel,
};
use service_core::error::AppError;
use std::time::Duration;

use crate::models::{Payment, Plucker, Record, Report, User};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::DatabaseError(e.into())
        })?;
        client_options.app_name = Some("plantation-service".to_string());
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = MongoClient::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(e.into())
        })?;
        let db = client.database(database);

        tracing::info!(database = %database, "MongoDB client initialized");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_email_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.users().create_index(email_index, None).await?;

        // Supports the active-only, collection-descending top listing
        let top_plucker_index = IndexModel::builder()
            .keys(doc! { "status": 1, "collection": -1 })
            .options(
                IndexOptions::builder()
                    .name("plucker_top_idx".to_string())
                    .build(),
            )
            .build();
        self.pluckers().create_index(top_plucker_index, None).await?;

        let record_date_index = IndexModel::builder()
            .keys(doc! { "date": 1 })
            .options(
                IndexOptions::builder()
                    .name("record_date_idx".to_string())
                    .build(),
            )
            .build();
        self.records().create_index(record_date_index, None).await?;

        let payment_date_index = IndexModel::builder()
            .keys(doc! { "date": 1 })
            .options(
                IndexOptions::builder()
                    .name("payment_date_idx".to_string())
                    .build(),
            )
            .build();
        self.payments()
            .create_index(payment_date_index, None)
            .await?;

        // Supports the per-plucker payment listing
        let payment_plucker_index = IndexModel::builder()
            .keys(doc! { "details.plucker_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("payment_plucker_idx".to_string())
                    .build(),
            )
            .build();
        self.payments()
            .create_index(payment_plucker_index, None)
            .await?;

        tracing::info!("Database indexes initialized");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn pluckers(&self) -> Collection<Plucker> {
        self.db.collection("pluckers")
    }

    pub fn records(&self) -> Collection<Record> {
        self.db.collection("records")
    }

    pub fn payments(&self) -> Collection<Payment> {
        self.db.collection("payments")
    }

    pub fn reports(&self) -> Collection<Report> {
        self.db.collection("reports")
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
