//! DTOs for the API key endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{ApiKey, ApiKeyDraft};

/// Request body for `POST /api/v1/auth` and `PUT /api/v1/auth/{key}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequest {
    /// Must be absent on create; generated by the server.
    pub key: Option<String>,

    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
}

impl ApiKeyRequest {
    pub fn into_draft(self, key: Option<String>) -> ApiKeyDraft {
        ApiKeyDraft {
            key,
            name: self.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub key: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApiKey> for ApiKeyResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            key: key.key,
            name: key.name,
            created_at: key.created_at,
            updated_at: key.updated_at,
        }
    }
}
