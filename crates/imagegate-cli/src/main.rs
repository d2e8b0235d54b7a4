//! Imagegate CLI
//!
//! Runs the Imagegate API server and a few helpers for operating it.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imagegate_api::{GateConfig, Server};
use imagegate_auth::{Claim, IdentityAssertion, hash_password};

/// Imagegate - SSO gating for the image generation web app
#[derive(Parser, Debug)]
#[command(name = "imagegate", version)]
#[command(about = "SSO gating for the image generation web app", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true, env = "IMAGEGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `info,imagegate_auth=trace`; overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the API until Ctrl-C
    Serve {
        /// Address to bind, overrides `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print the `passwordHash` clients send for a shared password
    HashPassword {
        /// The shared password
        password: String,
    },
    /// Print a principal header value for local testing
    Principal {
        /// User id
        #[arg(long)]
        user_id: String,
        /// Email claim
        #[arg(long)]
        email: Option<String>,
        /// Display name, defaults to the email
        #[arg(long)]
        name: Option<String>,
        /// Tenant id claim
        #[arg(long)]
        tenant: Option<String>,
        /// Identity provider tag
        #[arg(long, default_value = "aad")]
        provider: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration with secrets masked
    Show,
}

fn init_logging(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,imagegate=debug".into()),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(args: &Args) -> Result<GateConfig> {
    let path = args.config.as_deref();
    GateConfig::load(path).with_context(|| match path {
        Some(path) => format!("loading configuration from {}", path.display()),
        None => "loading configuration from the environment".to_string(),
    })
}

fn principal_header(
    user_id: String,
    email: Option<String>,
    name: Option<String>,
    tenant: Option<String>,
    provider: String,
) -> String {
    let mut claims = Vec::new();
    if let Some(email) = &email {
        claims.push(Claim::new("email", email.as_str()));
    }
    if let Some(tenant) = tenant {
        claims.push(Claim::new("tid", tenant));
    }
    IdentityAssertion {
        user_id,
        user_details: name.or(email).unwrap_or_default(),
        identity_provider: provider,
        user_roles: vec!["anonymous".to_string(), "authenticated".to_string()],
        claims,
    }
    .encode()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    match args.command {
        Command::Serve { ref bind } => {
            let mut config = load_config(&args)?;
            if let Some(bind) = bind {
                config.server.bind = bind.clone();
            }
            tracing::info!("Starting Imagegate {}", env!("CARGO_PKG_VERSION"));
            Server::new(config).serve().await?;
        }
        Command::Config {
            action: ConfigAction::Show,
        } => {
            let config = load_config(&args)?;
            print!("{}", config.to_redacted_toml()?);
        }
        Command::HashPassword { password } => {
            println!("{}", hash_password(&password));
        }
        Command::Principal {
            user_id,
            email,
            name,
            tenant,
            provider,
        } => {
            println!("{}", principal_header(user_id, email, name, tenant, provider));
        }
    }

    Ok(())
}
