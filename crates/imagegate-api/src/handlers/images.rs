//! Image listing and gated deletion.

use std::sync::Arc;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::State;
use http::{HeaderMap, Request, StatusCode};
use imagegate_auth::{GateOutcome, email_from_parts};
use serde::{Deserialize, Serialize};

use crate::files::{DeletionResult, ImageEntry};
use crate::{ApiError, AppState};

/// Body of a deletion request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    /// Files to delete, relative to the output directory.
    pub filenames: Vec<String>,
    /// Hex SHA-256 of the shared password, for clients without SSO.
    #[serde(default)]
    pub password_hash: Option<String>,
}

/// Body of a processed deletion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Summary for display.
    pub message: String,
    /// One entry per requested filename, in request order.
    pub results: Vec<DeletionResult>,
}

/// Body of `GET /api/images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageList {
    /// Images, newest first.
    pub images: Vec<ImageEntry>,
}

/// `POST /api/images/delete`
///
/// 400 for a bad body, 401 when the gate denies, 200 when every file was
/// deleted (or none were requested), 207 when any file failed.
pub async fn delete_images(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    let request: DeleteRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected deletion request body");
        ApiError::InvalidRequestBody(e.to_string())
    })?;

    let outcome = state
        .gate
        .authorize(&headers, request.password_hash.as_deref());
    match &outcome {
        GateOutcome::Sso(user) => {
            tracing::info!(user = %user.id, email = %user.email, "Deletion authorized via SSO")
        }
        GateOutcome::SharedSecret => tracing::info!("Deletion authorized via shared secret"),
        GateOutcome::Denied => {
            tracing::warn!("Deletion request denied");
            return Err(ApiError::Unauthorized);
        }
    }

    if request.filenames.is_empty() {
        return Ok((
            StatusCode::OK,
            Json(DeleteResponse {
                message: "No files to delete.".to_string(),
                results: Vec::new(),
            }),
        ));
    }

    let results = state.store.delete_all(&request.filenames).await;
    let failed = results.iter().filter(|r| !r.success).count();

    let (status, message) = if failed == 0 {
        (StatusCode::OK, "Files deleted successfully.".to_string())
    } else {
        tracing::warn!(failed, total = results.len(), "Partial deletion");
        (
            StatusCode::MULTI_STATUS,
            "Some files could not be deleted.".to_string(),
        )
    };

    Ok((status, Json(DeleteResponse { message, results })))
}

/// `GET /api/images`
pub async fn list_images(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Json<ImageList>, ApiError> {
    let (parts, _body) = request.into_parts();
    let images = state.store.list().await.map_err(|e| {
        tracing::error!(dir = %state.store.output_dir().display(), error = %e, "Failed to list images");
        ApiError::Internal("Failed to list images.".to_string())
    })?;
    tracing::debug!(
        user = email_from_parts(&parts),
        count = images.len(),
        "Listed images"
    );
    Ok(Json(ImageList { images }))
}
