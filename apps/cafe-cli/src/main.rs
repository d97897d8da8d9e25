//! # Café POS Entry Point
//!
//! Main entry point for the `cafe-pos` binary.
//! Delegates to [`cafe_cli::run`].

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    cafe_cli::run().await
}
