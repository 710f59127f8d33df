//! Input roster: the desired-state list of identities.

use std::path::Path;

use tracing::warn;

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::Identity;

/// Load the roster CSV.
///
/// The first record is a header and is skipped; the first field of each
/// subsequent record is the email address. Blank emails are skipped with a
/// warning. A missing or unreadable file is the one pass-fatal condition
/// of a run, so this is called before any remote traffic.
pub fn load(path: impl AsRef<Path>) -> DirectoryResult<Vec<Identity>> {
    let path = path.as_ref();
    let roster_error = |source: csv::Error| DirectoryError::Roster {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(roster_error)?;

    let mut identities = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(roster_error)?;
        match record.get(0).map(str::trim) {
            Some(email) if !email.is_empty() => identities.push(Identity::new(email)),
            _ => {
                // Header is record 1, so data rows start at line 2.
                warn!(line = index + 2, "roster row without an email, skipping");
            }
        }
    }
    Ok(identities)
}
