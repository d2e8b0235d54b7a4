//! Server configuration.
//!
//! Built once at startup from defaults, an optional TOML file and environment
//! variables (in that order of precedence), then shared read-only by every
//! handler.

use std::path::{Path, PathBuf};

use imagegate_auth::{AuthConfig, PolicyMode, normalize_domain_suffix};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variables that override config file values.
pub mod env {
    /// `server.bind`
    pub const BIND: &str = "IMAGEGATE_BIND";
    /// `auth.allowed_domain`
    pub const ALLOWED_DOMAIN: &str = "ALLOWED_EMAIL_DOMAIN";
    /// `auth.tenant_id`
    pub const TENANT_ID: &str = "AZURE_TENANT_ID";
    /// `auth.shared_password`
    pub const SHARED_PASSWORD: &str = "DELETE_PASSWORD";
    /// `auth.enforce`
    pub const ENFORCE_AUTH: &str = "IMAGEGATE_ENFORCE_AUTH";
    /// `storage.output_dir`
    pub const OUTPUT_DIR: &str = "OUTPUT_DIR";
    /// `ui.help_url`
    pub const HELP_URL: &str = "HELP_URL";
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Listener and route paths
    pub server: ServerConfig,
    /// Principal header and policies
    pub auth: AuthConfig,
    /// Where generated images live
    pub storage: StorageConfig,
    /// Values only the front end uses
    pub ui: UiConfig,
}

/// Listener address and route paths.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind: String,
    /// Auth status route.
    pub auth_status_path: String,
    /// Image listing route.
    pub images_path: String,
    /// Image deletion route.
    pub delete_path: String,
    /// UI config route.
    pub ui_config_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            auth_status_path: "/api/auth/status".to_string(),
            images_path: "/api/images".to_string(),
            delete_path: "/api/images/delete".to_string(),
            ui_config_path: "/api/ui-config".to_string(),
        }
    }
}

/// Image storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory the generator writes images to.
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Links rendered by the front end.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Optional help page.
    pub help_url: Option<String>,
    /// Gateway sign-in entry point.
    pub login_url: String,
    /// Gateway sign-out entry point.
    pub logout_url: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            help_url: None,
            login_url: "/.auth/login/aad".to_string(),
            logout_url: "/.auth/logout".to_string(),
        }
    }
}

impl GateConfig {
    /// Load, apply process environment overrides, normalize and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from an environment-like lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(env::BIND) {
            self.server.bind = bind;
        }
        if let Some(domain) = lookup(env::ALLOWED_DOMAIN) {
            self.auth.allowed_domain = domain;
        }
        if let Some(tenant) = lookup(env::TENANT_ID) {
            self.auth.tenant_id = Some(tenant);
        }
        if let Some(password) = lookup(env::SHARED_PASSWORD) {
            self.auth.shared_password = Some(password);
        }
        if let Some(enforce) = lookup(env::ENFORCE_AUTH) {
            self.auth.enforce = parse_flag(env::ENFORCE_AUTH, &enforce)?;
        }
        if let Some(dir) = lookup(env::OUTPUT_DIR) {
            self.storage.output_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(env::HELP_URL) {
            self.ui.help_url = Some(url);
        }
        Ok(())
    }

    /// Canonicalize values that have more than one accepted spelling.
    pub fn normalize(&mut self) {
        self.auth.allowed_domain = normalize_domain_suffix(&self.auth.allowed_domain);
        self.auth.principal_header = self.auth.principal_header.trim().to_ascii_lowercase();
        self.auth.tenant_id = blank_to_none(self.auth.tenant_id.take());
        self.auth.shared_password = self.auth.shared_password.take().filter(|p| !p.is_empty());
        self.ui.help_url = blank_to_none(self.ui.help_url.take());
    }

    /// Reject combinations that would make a policy accept everyone or no one.
    pub fn validate(&self) -> Result<()> {
        let auth = &self.auth;

        if http::HeaderName::from_bytes(auth.principal_header.as_bytes()).is_err() {
            return Err(Error::config(format!(
                "auth.principal_header '{}' is not a valid header name",
                auth.principal_header
            )));
        }

        for (name, mode) in [
            ("status_policy", auth.status_policy),
            ("gate_policy", auth.effective_gate_policy()),
        ] {
            let needs_domain = matches!(mode, PolicyMode::Domain | PolicyMode::DomainAndTenant);
            let needs_tenant = matches!(mode, PolicyMode::Tenant | PolicyMode::DomainAndTenant);
            if needs_domain && auth.allowed_domain.is_empty() {
                return Err(Error::config(format!(
                    "auth.{name} checks the email domain but auth.allowed_domain is empty"
                )));
            }
            if needs_tenant && auth.tenant_id.is_none() {
                return Err(Error::config(format!(
                    "auth.{name} checks the tenant but auth.tenant_id is not set"
                )));
            }
        }

        let server = &self.server;
        for (name, path) in [
            ("auth_status_path", &server.auth_status_path),
            ("images_path", &server.images_path),
            ("delete_path", &server.delete_path),
            ("ui_config_path", &server.ui_config_path),
        ] {
            if !path.starts_with('/') {
                return Err(Error::config(format!(
                    "server.{name} must start with '/', got '{path}'"
                )));
            }
        }

        Ok(())
    }

    /// Render as TOML with the shared password masked.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut redacted = self.clone();
        if redacted.auth.shared_password.is_some() {
            redacted.auth.shared_password = Some("********".to_string());
        }
        Ok(toml::to_string_pretty(&redacted)?)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::config(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
