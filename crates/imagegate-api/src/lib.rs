//! # imagegate-api
//!
//! HTTP API for Imagegate.
//!
//! - `GET  /api/auth/status`: sign-in state derived from the principal header
//! - `GET  /api/images`: generated images, newest first
//! - `POST /api/images/delete`: batch deletion behind the SSO/shared-secret gate
//! - `GET  /api/ui-config`: help, sign-in and sign-out links
//!
//! All paths are configurable through [`ServerConfig`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod files;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{GateConfig, ServerConfig, StorageConfig, UiConfig};
pub use error::{ApiError, Error, Result};
pub use routes::router;
pub use server::Server;
pub use state::AppState;
