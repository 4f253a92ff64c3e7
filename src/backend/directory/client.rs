/**
 * User Directory Client
 *
 * HTTP client for the external user directory: case-insensitive prefix
 * search over users, and profile lookups used to resolve participant ids
 * to human-readable names.
 *
 * Profile lookups are cached for the lifetime of the client and degrade to
 * no name on failure - rendering a participant list must never block on or
 * fail because of the directory. When no directory URL is configured the
 * client runs disabled: searches return the empty set, profiles resolve to
 * nothing.
 */
use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::backend::error::ApiError;

/// A directory search candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub user_id: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<DirectoryUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    display_name: String,
}

/// Client for the user directory collaborator
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: Option<String>,
    profile_cache: Mutex<HashMap<String, String>>,
}

impl DirectoryClient {
    /// Create a client; `None` disables the directory
    pub fn new(base_url: Option<String>) -> Self {
        if base_url.is_none() {
            tracing::warn!("[Directory] USER_DIRECTORY_URL not set; search and name resolution disabled");
        }
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            profile_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Prefix search over the directory
    pub async fn search(&self, prefix: &str) -> Result<Vec<DirectoryUser>, ApiError> {
        let Some(base) = &self.base_url else {
            return Ok(Vec::new());
        };

        let response = self
            .http
            .get(format!("{}/users/search", base))
            .query(&[("q", prefix)])
            .send()
            .await
            .map_err(|e| ApiError::transient(format!("directory search failed: {}", e)))?
            .error_for_status()
            .map_err(|e| ApiError::transient(format!("directory search failed: {}", e)))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::transient(format!("directory returned bad payload: {}", e)))?;
        Ok(body.results)
    }

    /// Display name for a user, cached
    ///
    /// `None` on any failure; callers render a placeholder instead.
    pub async fn display_name(&self, user_id: &str) -> Option<String> {
        if let Some(name) = self
            .profile_cache
            .lock()
            .expect("profile cache lock poisoned")
            .get(user_id)
        {
            return Some(name.clone());
        }

        let base = self.base_url.as_ref()?;
        let result = async {
            let response = self
                .http
                .get(format!("{}/users/{}/profile", base, user_id))
                .send()
                .await?
                .error_for_status()?;
            response.json::<ProfileResponse>().await
        }
        .await;

        match result {
            Ok(profile) => {
                self.profile_cache
                    .lock()
                    .expect("profile cache lock poisoned")
                    .insert(user_id.to_string(), profile.display_name.clone());
                Some(profile.display_name)
            }
            Err(err) => {
                tracing::debug!("[Directory] profile lookup failed for {}: {}", user_id, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_directory_returns_empty() {
        let client = DirectoryClient::new(None);
        assert_eq!(client.search("al").await.unwrap(), Vec::new());
        assert_eq!(client.display_name("u1").await, None);
    }
}
