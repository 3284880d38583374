//! Hostel authorization CLI.
//!
//! Signs in against the hostel API, loads the route catalog and the user's
//! effective authorization, then answers one query as JSON.
//!
//! ```text
//! hostel-authz --role warden status
//! hostel-authz --role warden path /hostels/Block-A/units/U12
//! hostel-authz --role warden can rooms.allocate visitors.approve --all
//! hostel-authz --role warden constraint hostelIds --fallback '[]'
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use hostel_authz::config::load_or_default;
use hostel_authz::observability::init_logging;
use hostel_authz::{AuthzSession, HttpAuthzSource, SessionSettings, SessionUser};

#[derive(Parser)]
#[command(name = "hostel-authz")]
#[command(about = "Inspect route and capability decisions for a hostel user", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Role of the user to sign in as.
    #[arg(short, long)]
    role: Option<String>,

    /// Identifier of the user to sign in as.
    #[arg(long)]
    user_id: Option<String>,

    /// Bearer token for the authorization endpoints.
    #[arg(short, long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show lifecycle state, effective record and catalog problems
    Status,
    /// Show the compiled route catalog
    Catalog,
    /// Check access to a route key
    Route { key: String },
    /// Resolve a path to its route key and check access
    Path { path: String },
    /// Check one or more capabilities
    Can {
        #[arg(required = true)]
        keys: Vec<String>,
        /// Require every capability instead of any
        #[arg(long)]
        all: bool,
    },
    /// Read a constraint value
    Constraint {
        key: String,
        /// JSON value returned when the constraint is absent
        #[arg(long, default_value = "null")]
        fallback: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability);

    let source = HttpAuthzSource::new(&config.api)?;
    let session = AuthzSession::new(source, SessionSettings::from_config(&config));

    let user = SessionUser {
        id: cli.user_id,
        role: cli.role,
        authz: None,
        token: cli.token,
    };
    session.sign_in(user).await;

    let snapshot = session.snapshot();
    let decisions = snapshot.decisions(session.allowlist());

    let output = match cli.command {
        Commands::Status => serde_json::to_value(snapshot.diagnostics())?,
        Commands::Catalog => json!({
            "index": snapshot.index.summary(),
            "rejections": snapshot.rejections.as_slice(),
        }),
        Commands::Route { key } => json!({
            "route": key,
            "allowed": decisions.can_route(&key),
        }),
        Commands::Path { path } => json!({
            "path": path,
            "route": decisions.resolve_route_key_by_path(&path),
            "allowed": decisions.can_route_by_path(&path),
        }),
        Commands::Can { keys, all } => {
            let allowed = if all {
                decisions.can_all(&keys)
            } else {
                decisions.can_any(&keys)
            };
            json!({
                "capabilities": keys,
                "mode": if all { "all" } else { "any" },
                "allowed": allowed,
            })
        }
        Commands::Constraint { key, fallback } => {
            // Anything that is not valid JSON is taken as a plain string.
            let fallback = serde_json::from_str(&fallback).unwrap_or(Value::String(fallback));
            json!({
                "constraint": key,
                "value": decisions.constraint(&key, fallback),
            })
        }
    };

    if let Some(error) = snapshot.error.as_deref() {
        tracing::warn!(error, "Answering from the role default");
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
