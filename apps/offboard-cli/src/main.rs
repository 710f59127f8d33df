//! offboard - single-pass user deactivation against a remote directory.
//!
//! Reads a roster CSV, reconciles it against the platform's user
//! directory, and appends every successful deactivation to an append-only
//! audit CSV. Exit codes: 0 on completion without fatal error, 1 when the
//! roster is missing or unreadable, 2 on configuration errors.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use offboard_directory::audit::AuditLog;
use offboard_directory::client::DirectoryClient;
use offboard_directory::config::DirectoryConfig;
use offboard_directory::engine::ReconciliationEngine;
use offboard_directory::DirectoryError;

/// Deactivate roster users on the collaboration platform.
#[derive(Parser)]
#[command(name = "offboard", version, about, long_about = None)]
struct Cli {
    /// Input roster CSV (header row, email in the first column).
    #[arg(long, default_value = "input_users.csv")]
    roster: String,

    /// Append-only audit log destination.
    #[arg(long, default_value = "processed_users.csv")]
    audit_log: String,
}

#[tokio::main]
async fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,offboard_directory=debug")),
        )
        .init();

    let cli = Cli::parse();

    let config = DirectoryConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(2);
    });

    tracing::info!(
        base_url = %config.base_url,
        controlled_domains = config.controlled_domains.len(),
        roster = %cli.roster,
        audit_log = %cli.audit_log,
        "starting reconciliation pass"
    );

    let client = DirectoryClient::new(&config).unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(2);
    });

    let mut audit = AuditLog::open(&cli.audit_log).unwrap_or_else(|e| {
        eprintln!("Cannot open audit log: {e}");
        std::process::exit(1);
    });

    let engine = ReconciliationEngine::new(&client, &config.controlled_domains);
    match engine.run(&cli.roster, &mut audit).await {
        Ok(report) => {
            tracing::info!(
                deactivated = report.deactivated,
                failed = report.failed,
                invited = report.invited,
                skipped = report.skipped,
                snapshot_partial = report.snapshot_partial,
                "run finished"
            );
        }
        Err(e @ DirectoryError::Roster { .. }) => {
            eprintln!("Fatal: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Run aborted: {e}");
            std::process::exit(1);
        }
    }
}
