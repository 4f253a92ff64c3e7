//! Run-code endpoint (POST /compile)
//!
//! Pass-through to the sandbox collaborator. Sandbox-reported failures come
//! back as `{"error": ...}` with a 200 - the client renders them in the
//! output log, the same place successful output goes.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::backend::error::ApiError;
use crate::backend::middleware::auth::Identity;
use crate::backend::sandbox::client::CompileOutcome;
use crate::backend::server::state::AppState;

/// Default execution language when the request does not declare one
const DEFAULT_LANGUAGE: &str = "javascript";

#[derive(Debug, Deserialize)]
pub struct CompileRequest {
    pub code: String,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run code through the sandbox (POST /compile)
pub async fn compile(
    State(app_state): State<AppState>,
    Identity(_user): Identity,
    Json(request): Json<CompileRequest>,
) -> Result<Json<CompileResponse>, ApiError> {
    let language = request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);

    match app_state.sandbox.compile(&request.code, language).await? {
        CompileOutcome::Output(output) => Ok(Json(CompileResponse {
            output: Some(output),
            error: None,
        })),
        CompileOutcome::Error(error) => Ok(Json(CompileResponse {
            output: None,
            error: Some(error),
        })),
    }
}
