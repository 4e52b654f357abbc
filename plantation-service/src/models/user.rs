use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account that can operate the estate API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        role: Option<String>,
        phone: Option<String>,
        location: Option<String>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            role: role.unwrap_or_else(|| "manager".to_string()),
            phone,
            location,
            created_at: now,
            updated_at: now,
        }
    }
}
