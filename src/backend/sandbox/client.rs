/**
 * Execution Sandbox Client
 *
 * HTTP client for the external code-execution sandbox: send a source blob
 * plus a language tag, get back either program output or an error string.
 * Stateless, no session affinity.
 *
 * A compile/runtime error reported by the sandbox is program output from
 * the service's point of view (`CompileOutcome::Error`), not a fault; only
 * a transport-level failure surfaces as `ApiError::Sandbox`.
 */
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::backend::error::ApiError;

/// Outcome of a sandbox run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// Program output
    Output(String),
    /// Error string reported by the sandbox (compile or runtime failure)
    Error(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct SandboxResponse {
    output: Option<String>,
    error: Option<String>,
}

/// Client for the execution sandbox collaborator
pub struct SandboxClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl SandboxClient {
    /// Create a client; `None` makes every run fail with a sandbox error
    pub fn new(base_url: Option<String>) -> Self {
        if base_url.is_none() {
            tracing::warn!("[Sandbox] SANDBOX_URL not set; code execution disabled");
        }
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Run `code` under `language` in the sandbox
    pub async fn compile(&self, code: &str, language: &str) -> Result<CompileOutcome, ApiError> {
        let Some(base) = &self.base_url else {
            return Err(ApiError::sandbox("sandbox not configured"));
        };

        let response = self
            .http
            .post(format!("{}/compile", base))
            .json(&json!({ "code": code, "language": language }))
            .send()
            .await
            .map_err(|e| ApiError::sandbox(format!("sandbox unreachable: {}", e)))?;

        // The sandbox reports failed runs with an error body and a non-2xx
        // status; both shapes decode the same way.
        let body: SandboxResponse = response
            .json()
            .await
            .map_err(|e| ApiError::sandbox(format!("sandbox returned bad payload: {}", e)))?;

        match body.error {
            Some(error) => Ok(CompileOutcome::Error(error)),
            None => Ok(CompileOutcome::Output(body.output.unwrap_or_default())),
        }
    }
}
