//! HTTP handlers.

pub mod auth_status;
pub mod images;
pub mod ui_config;

pub use auth_status::auth_status;
pub use images::{delete_images, list_images};
pub use ui_config::ui_config;
