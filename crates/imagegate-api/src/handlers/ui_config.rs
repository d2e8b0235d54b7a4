//! Front-end links.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Body of `GET /api/ui-config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfigResponse {
    /// Help page, if configured.
    pub help_url: Option<String>,
    /// Where the sign-in button points.
    pub login_url: String,
    /// Where the sign-out button points.
    pub logout_url: String,
}

/// `GET /api/ui-config`
pub async fn ui_config(State(state): State<Arc<AppState>>) -> Json<UiConfigResponse> {
    let ui = &state.config.ui;
    Json(UiConfigResponse {
        help_url: ui.help_url.clone(),
        login_url: ui.login_url.clone(),
        logout_url: ui.logout_url.clone(),
    })
}
