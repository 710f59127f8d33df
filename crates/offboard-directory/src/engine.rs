//! The reconciliation engine: one batch pass over the roster.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::audit::{AuditLog, OutcomeRecord, OutcomeStatus};
use crate::classify::{classify, Disposition};
use crate::client::DirectoryClient;
use crate::error::DirectoryResult;
use crate::roster;

/// Counters summarizing one pass.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Users in the directory snapshot.
    pub snapshot_size: usize,
    /// Whether enumeration was cut short.
    pub snapshot_partial: bool,
    /// Identities invited so an account existed to deactivate.
    pub invited: u32,
    /// Successful deactivations (one audit row each).
    pub deactivated: u32,
    /// Deactivation attempts that failed (reported, not persisted).
    pub failed: u32,
    /// Identities outside controlled domains, left untouched.
    pub skipped: u32,
}

/// Drives a single end-to-end reconciliation pass.
///
/// Everything is serial: the platform enforces one global rate limit, so
/// concurrent calls would only add contention and complicate backoff
/// accounting. Per-identity failures are contained; the pass always moves
/// on to the remaining identities. Only an unreadable roster is fatal, and
/// it fires before any remote call is made.
pub struct ReconciliationEngine<'a> {
    client: &'a DirectoryClient,
    controlled_domains: &'a HashSet<String>,
}

impl<'a> ReconciliationEngine<'a> {
    #[must_use]
    pub fn new(client: &'a DirectoryClient, controlled_domains: &'a HashSet<String>) -> Self {
        Self {
            client,
            controlled_domains,
        }
    }

    /// Run one batch pass: load the roster, snapshot the directory,
    /// classify every identity, invite where needed, deactivate eligible
    /// users in roster order, and append one audit row per success.
    pub async fn run(
        &self,
        roster_path: impl AsRef<Path>,
        audit: &mut AuditLog,
    ) -> DirectoryResult<RunReport> {
        // Fatal-input check first: nothing may be partially applied when
        // the roster is missing.
        let identities = roster::load(roster_path)?;
        info!(identities = identities.len(), "roster loaded");

        let snapshot = self.client.list_all_users().await;
        if snapshot.partial {
            warn!(
                fetched = snapshot.users.len(),
                "directory snapshot is PARTIAL; classifications are based on \
                 incomplete data and absent users may exist remotely"
            );
        }
        info!(users = snapshot.users.len(), "directory snapshot fetched");

        let mut report = RunReport {
            snapshot_size: snapshot.users.len(),
            snapshot_partial: snapshot.partial,
            ..RunReport::default()
        };

        // Phase one: classify in roster order, inviting as needed.
        let mut worklist: Vec<(i64, String)> = Vec::new();
        for identity in &identities {
            match classify(identity, &snapshot, self.controlled_domains) {
                Disposition::ToDeactivate { id } => {
                    worklist.push((id, identity.email.clone()));
                }
                Disposition::ToInviteThenDeactivate => {
                    match self.client.invite_user(&identity.email).await {
                        Ok(user) => {
                            info!(email = %identity.email, user_id = user.id, "invited user");
                            report.invited += 1;
                            worklist.push((user.id, identity.email.clone()));
                        }
                        Err(error) => {
                            // Contained: the identity is dropped from this
                            // pass without an audit record.
                            warn!(email = %identity.email, %error, "invite failed, skipping identity");
                        }
                    }
                }
                Disposition::Skip => {
                    debug!(email = %identity.email, "outside controlled domains, skipping");
                    report.skipped += 1;
                }
            }
        }

        info!(pending = worklist.len(), "deactivation worklist built");

        // Phase two: drain the worklist strictly in build order.
        for (id, email) in worklist {
            match self.client.deactivate_user(id, &email).await {
                Ok(()) => {
                    info!(%email, user_id = id, "deactivated user");
                    audit.append(&OutcomeRecord::now(
                        email.as_str(),
                        Some(id),
                        OutcomeStatus::Deactivated,
                    ))?;
                    report.deactivated += 1;
                }
                Err(error) => {
                    // Visible but not persisted; only successes reach the log.
                    warn!(%email, user_id = id, %error, "failed to deactivate user");
                    report.failed += 1;
                }
            }
        }

        info!(
            deactivated = report.deactivated,
            failed = report.failed,
            invited = report.invited,
            skipped = report.skipped,
            "reconciliation pass complete"
        );
        Ok(report)
    }
}
