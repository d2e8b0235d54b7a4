//! Route table.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use imagegate_auth::IdentityLayer;

use crate::AppState;
use crate::handlers::{auth_status, delete_images, list_images, ui_config};

/// Build the API router.
///
/// The listing route sits behind [`IdentityLayer`]; deletion runs its own gate
/// because it also accepts the shared secret.
pub fn router(state: Arc<AppState>) -> Router {
    let paths = state.config.server.clone();
    let identity = IdentityLayer::from_config(&state.config.auth);

    Router::new()
        .route(&paths.auth_status_path, get(auth_status))
        .route(&paths.ui_config_path, get(ui_config))
        .route(&paths.images_path, get(list_images).route_layer(identity))
        .route(&paths.delete_path, post(delete_images))
        .with_state(state)
}
