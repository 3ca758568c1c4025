//! `comment` binary.
//!
//! ```text
//! comment api [--config FILE] [--grpc-addr :8083] [--graceful-timeout-ms 10000] ...
//! ```
//!
//! Exits non-zero when configuration, binding, the database, or the
//! graceful run fails.

use std::process::ExitCode;

use clap::Parser;
use comment_service::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "comment api failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
