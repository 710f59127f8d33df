//! Wire and domain types for the directory API.

use serde::{Deserialize, Serialize};

/// A user record as reported by the remote directory.
///
/// The remote system owns these; this crate only ever holds a read snapshot
/// and mutates users through API calls, never in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryUser {
    /// Opaque identifier assigned by the platform.
    pub id: i64,
    /// Primary email address.
    pub email: String,
    /// Account status as reported by the platform (e.g. `ACTIVE`,
    /// `DEACTIVATED`, `PENDING`). Absent on some invite responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One page of the user listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListPage {
    #[serde(default)]
    pub page_number: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub total_count: i64,
    /// The users on this page.
    #[serde(default)]
    pub data: Vec<DirectoryUser>,
}

/// Result envelope wrapping mutating calls.
///
/// The platform reports operation outcome in the body: a 200 response can
/// still carry a failure message, so `message` is the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResultEnvelope<T> {
    /// `"SUCCESS"` on success; anything else is a soft failure.
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result_code: i64,
    /// The affected object, when the call returns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> ApiResultEnvelope<T> {
    /// Whether the envelope reports an explicit success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.message == "SUCCESS"
    }
}

/// The full remote user population at a point in time.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    /// Every user the listing endpoint returned, in page order.
    pub users: Vec<DirectoryUser>,
    /// True when enumeration was cut short (retry exhaustion or a hard
    /// error mid-listing). A partial snapshot must never be read as proof
    /// that a user is absent.
    pub partial: bool,
}

impl DirectorySnapshot {
    /// First user matching `email`, in snapshot order.
    ///
    /// Duplicate emails should not occur in a complete snapshot but are
    /// tolerated: the first match wins, deterministically.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&DirectoryUser> {
        self.users.iter().find(|u| u.email == email)
    }
}

/// A desired identity from the input roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Email address, exactly as read from the roster.
    pub email: String,
}

impl Identity {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// The domain part of the address: everything after the last `'@'`.
    ///
    /// `None` for malformed addresses without an `'@'`; those can never
    /// belong to a controlled domain.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.email.rsplit_once('@').map(|(_, domain)| domain)
    }
}
