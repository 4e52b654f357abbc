use mongodb::bson::doc;
use plantation_service::config::{
    Config, DatabaseConfig, JwtConfig, ServerConfig, StorageConfig,
};
use plantation_service::Application;
use secrecy::Secret;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub api: String,
    pub db: mongodb::Database,
    pub client: reqwest::Client,
    // Keeps the upload directory alive for the duration of the test
    _upload_dir: tempfile::TempDir,
}

fn mongo_uri() -> String {
    std::env::var("TEST_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

async fn mongo_available() -> bool {
    let Ok(mut options) = mongodb::options::ClientOptions::parse(mongo_uri()).await else {
        return false;
    };
    options.server_selection_timeout = Some(Duration::from_secs(2));
    let Ok(client) = mongodb::Client::with_options(options) else {
        return false;
    };
    client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .await
        .is_ok()
}

impl TestApp {
    /// Spawn the application on a random port against a uniquely-named
    /// database. Does not require MongoDB to be up; use [`TestApp::spawn`]
    /// for tests that exercise persistence.
    pub async fn spawn_app() -> Self {
        let db_name = format!("plantation_test_{}", uuid::Uuid::new_v4().simple());
        let upload_dir = tempfile::tempdir().expect("Failed to create temp upload dir");

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            database: DatabaseConfig {
                url: Secret::new(mongo_uri()),
                db_name: db_name.clone(),
            },
            jwt: JwtConfig {
                secret: Secret::new("test-jwt-secret".to_string()),
                access_token_expiry_minutes: 15,
            },
            storage: StorageConfig {
                upload_dir: upload_dir.path().to_string_lossy().into_owned(),
            },
            service_name: "plantation-service-test".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let db = app.db().database().clone();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let address = format!("http://127.0.0.1:{}", port);

        // Wait for the server to come up by polling the health endpoint
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            match client.get(&health_url).send().await {
                Ok(response) if response.status().is_success() => break,
                _ => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }

        TestApp {
            api: format!("{}/api/v1", address),
            address,
            db,
            client,
            _upload_dir: upload_dir,
        }
    }

    /// Spawn for a database-backed test; None (with a note) when no
    /// MongoDB is reachable so the suite stays runnable without infra.
    pub async fn spawn() -> Option<Self> {
        if !mongo_available().await {
            eprintln!(
                "skipping: MongoDB not reachable at {} (set TEST_MONGODB_URI)",
                mongo_uri()
            );
            return None;
        }
        Some(Self::spawn_app().await)
    }

    /// Register a fresh user and return its bearer token.
    pub async fn register_user(&self) -> String {
        let email = format!(
            "manager-{}@estate.example",
            uuid::Uuid::new_v4().simple()
        );
        let response = self
            .client
            .post(format!("{}/auth/register", self.api))
            .json(&serde_json::json!({
                "name": "Test Manager",
                "email": email,
                "password": "estatePassword123"
            }))
            .send()
            .await
            .expect("Failed to send register request");
        assert_eq!(response.status(), 201);

        let body: serde_json::Value = response.json().await.expect("Failed to parse token");
        body["token"]
            .as_str()
            .expect("Token missing from register response")
            .to_string()
    }

    pub async fn create_plucker(&self, token: &str, name: &str) -> serde_json::Value {
        let response = self
            .client
            .post(format!("{}/pluckers", self.api))
            .bearer_auth(token)
            .json(&serde_json::json!({ "name": name, "phone": "0771234567" }))
            .send()
            .await
            .expect("Failed to send create plucker request");
        assert_eq!(response.status(), 201);
        response.json().await.expect("Failed to parse plucker")
    }

    pub async fn create_record(
        &self,
        token: &str,
        date: &str,
        average_price: f64,
        details: &[(&str, f64)],
    ) -> serde_json::Value {
        let detail_lines: Vec<serde_json::Value> = details
            .iter()
            .map(|(plucker_id, weight)| {
                serde_json::json!({ "pluckerId": plucker_id, "weight": weight })
            })
            .collect();
        let total_weight: f64 = details.iter().map(|(_, w)| w).sum();

        let response = self
            .client
            .post(format!("{}/records", self.api))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "date": date,
                "totalWeight": total_weight,
                "pluckerCount": details.len(),
                "averagePrice": average_price,
                "pluckerDetails": detail_lines
            }))
            .send()
            .await
            .expect("Failed to send create record request");
        assert_eq!(response.status(), 201);
        response.json().await.expect("Failed to parse record")
    }

    pub async fn get_plucker(&self, token: &str, id: &str) -> serde_json::Value {
        let response = self
            .client
            .get(format!("{}/pluckers/{}", self.api, id))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to send get plucker request");
        assert_eq!(response.status(), 200);
        response.json().await.expect("Failed to parse plucker")
    }

    /// Drop the per-test database.
    pub async fn cleanup(&self) {
        self.db
            .drop(None)
            .await
            .expect("Failed to drop test database");
    }
}
