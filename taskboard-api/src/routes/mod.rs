/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Signup, login, logout and session check
/// - `projects`: Project CRUD
/// - `tasks`: Task CRUD (nested under projects for list/create)
/// - `dashboard`: Per-user aggregate counts
/// - `ai`: Task description generation

use serde::{Deserialize, Deserializer};
use taskboard_shared::pagination::PageRequest;

use crate::{config::PaginationConfig, error::ApiError};

pub mod ai;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod projects;
pub mod tasks;

/// Fallback for paths no route matches
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Query string accepted by list endpoints
///
/// Values are kept as raw strings so that unparsable numbers fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub status: Option<String>,
}

impl ListQuery {
    /// Resolves `page`/`per_page` against the configured limits
    pub fn page_request(&self, config: PaginationConfig) -> PageRequest {
        PageRequest::from_query(
            self.page.as_deref(),
            self.per_page.as_deref(),
            config.default_per_page,
            config.max_per_page,
        )
    }

    /// Status filter, with an empty value meaning no filter
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|status| !status.is_empty())
    }
}

/// Distinguishes an explicit `null` from an absent key
///
/// Used with `#[serde(default)]` on `Option<Option<T>>` fields: an absent
/// key stays `None`, `null` becomes `Some(None)`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        description: Option<Option<String>>,
    }

    #[test]
    fn test_deserialize_some() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.description, None);

        let patch: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(patch.description, Some(None));

        let patch: Patch = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(patch.description, Some(Some("x".to_string())));
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery {
            page: Some("abc".to_string()),
            per_page: None,
            status: Some(String::new()),
        };

        assert_eq!(
            query.page_request(PaginationConfig::default()),
            PageRequest::new(1, 10)
        );
        assert_eq!(query.status(), None);
    }
}
