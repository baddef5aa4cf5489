//! DTOs for the short code endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{ShortCode, ShortCodeDraft};

/// Request body for `POST /api/v1/shorturl` and `PUT /api/v1/shorturl/{id}`.
///
/// Unknown fields are ignored. `id` must be absent on create; on update the
/// path id wins.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortCodeRequest {
    pub id: Option<Uuid>,

    /// Leave out (or send blank) to have one generated.
    #[validate(length(max = 143, message = "code is too long"))]
    pub code: Option<String>,

    #[validate(
        length(min = 1, message = "redirect url is empty"),
        url(message = "Invalid URL format")
    )]
    pub redirect_url: String,

    pub note: Option<String>,
}

impl ShortCodeRequest {
    pub fn into_draft(self, id: Option<Uuid>) -> ShortCodeDraft {
        ShortCodeDraft {
            id,
            code: self.code,
            destination: self.redirect_url,
            note: self.note,
        }
    }
}

/// JSON representation of a stored short code.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortCodeResponse {
    pub id: Uuid,
    pub code: String,
    pub redirect_url: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<ShortCode> for ShortCodeResponse {
    fn from(entry: ShortCode) -> Self {
        Self {
            id: entry.id,
            code: entry.code,
            redirect_url: entry.destination,
            note: entry.note,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            deleted_at: entry.deleted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_reads_camel_case_and_ignores_unknown_fields() {
        let request: ShortCodeRequest = serde_json::from_value(json!({
            "code": "abc123",
            "redirectUrl": "https://example.com",
            "note": "hi",
            "somethingElse": true
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        let draft = request.into_draft(None);
        assert_eq!(draft.code.as_deref(), Some("abc123"));
        assert_eq!(draft.destination, "https://example.com");
    }

    #[test]
    fn test_request_rejects_malformed_url() {
        let request: ShortCodeRequest =
            serde_json::from_value(json!({ "redirectUrl": "not a url" })).unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("redirect_url"));
    }

    #[test]
    fn test_response_is_camel_case() {
        let now = Utc::now();
        let response = ShortCodeResponse::from(ShortCode {
            id: Uuid::new_v4(),
            code: "abc123".to_string(),
            destination: "https://example.com".to_string(),
            note: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["redirectUrl"], "https://example.com");
        assert!(value.get("createdAt").is_some());
        assert!(value["deletedAt"].is_null());
    }
}
