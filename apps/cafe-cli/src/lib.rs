//! # Café POS Command Line
//!
//! Front end over the ledger and sale engine. Results are printed as JSON on
//! stdout; logs go to stderr.
//!
//! ## Module Organization
//! ```text
//! cafe_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli/
//! │   ├── mod.rs      ◄─── Cli parser and command dispatch
//! │   ├── products.rs ◄─── Menu and stock
//! │   ├── staff.rs    ◄─── Staff and commission rates
//! │   ├── tables.rs   ◄─── Floor plan and occupancy
//! │   ├── sale.rs     ◄─── Sale finalization
//! │   ├── sales.rs    ◄─── Sales history
//! │   └── report.rs   ◄─── Reports and dashboard
//! ├── config.rs       ◄─── Environment configuration
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod config;
pub mod error;

use std::process::ExitCode;

use cafe_db::Database;
use clap::Parser;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::AppConfig;
use error::ApiError;

/// Runs one command and returns the process exit status.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                         Command Lifecycle                               │
/// │                                                                         │
/// │  1. Initialize Logging (RUST_LOG, stderr)                               │
/// │  2. Parse Arguments (clap exits on --help / bad usage)                  │
/// │  3. Load Configuration (CAFE_* env vars, --db flag)                     │
/// │  4. Open Database (WAL, migrations)                                     │
/// │  5. Execute Command                                                     │
/// │       Ok  → pretty JSON on stdout, exit 0                               │
/// │       Err → ApiError JSON on stderr, exit 1                             │
/// │  6. Close Pool                                                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config.with_db_path(cli.db),
        Err(err) => return report(Err(err.into())),
    };
    debug!(?config, "Configuration loaded");

    let db = match Database::new(config.db_config()).await {
        Ok(db) => db,
        Err(err) => return report(Err(err.into())),
    };

    let result = execute(&db, &config, cli.command).await;
    db.close().await;

    report(result)
}

/// Executes a parsed command against an open database.
pub async fn execute(
    db: &Database,
    config: &AppConfig,
    command: Commands,
) -> Result<Value, ApiError> {
    info!(store = %config.store_name, "Executing command");
    command.run(db, config).await
}

fn report(result: Result<Value, ApiError>) -> ExitCode {
    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => report(Err(err.into())),
        },
        Err(err) => {
            let text = serde_json::to_string(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{text}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cafe_db=trace` - Show trace for the ledger only
/// - Default: INFO, debug for cafe crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cafe=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
