//! Pure classification of desired identities against a directory snapshot.

use std::collections::HashSet;

use crate::models::{DirectorySnapshot, Identity};

/// What the engine should do with one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Already present in the directory: deactivate it.
    ToDeactivate {
        /// Id of the matching directory user.
        id: i64,
    },
    /// Absent but in a controlled domain: invite first, then deactivate.
    ToInviteThenDeactivate,
    /// Outside controlled domains: leave untouched.
    Skip,
}

/// Map one identity to its disposition.
///
/// 1. Exact email match in the snapshot wins (first match in snapshot
///    order when duplicates occur).
/// 2. Otherwise, a controlled domain means invite-then-deactivate.
/// 3. Otherwise, skip.
///
/// This runs identically on partial snapshots; warning the operator about
/// incomplete data is the engine's job, not the classifier's.
#[must_use]
pub fn classify(
    identity: &Identity,
    snapshot: &DirectorySnapshot,
    controlled_domains: &HashSet<String>,
) -> Disposition {
    if let Some(user) = snapshot.find_by_email(&identity.email) {
        return Disposition::ToDeactivate { id: user.id };
    }

    match identity.domain() {
        Some(domain) if controlled_domains.contains(&domain.to_ascii_lowercase()) => {
            Disposition::ToInviteThenDeactivate
        }
        _ => Disposition::Skip,
    }
}
