//! HTTP client for the remote directory API (reqwest-based).
//!
//! Covers the three operations the reconciliation pass needs: paginated
//! user listing, invitation, and deactivation. Every call goes through the
//! shared [`RetryPolicy`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{ApiResultEnvelope, DirectorySnapshot, DirectoryUser, UserListPage};
use crate::retry::RetryPolicy;

/// Number of users requested per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Client for the directory API of the collaboration platform.
///
/// Holds the bearer token and base URL explicitly — no process-global
/// header or token state.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    /// Base URL of the API, trailing slash stripped.
    base_url: String,
    /// Bearer token applied to every request.
    api_token: String,
    /// Underlying HTTP client.
    http_client: Client,
    /// Backoff policy shared by all call types.
    retry_policy: RetryPolicy,
    /// Listing page size.
    page_size: usize,
}

impl DirectoryClient {
    /// Create a client from configuration.
    ///
    /// Builds a `reqwest::Client` with the configured per-request timeout;
    /// there is no other network-level timeout.
    pub fn new(config: &DirectoryConfig) -> DirectoryResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("offboard/0.1")
            .build()
            .map_err(|e| DirectoryError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            http_client,
            retry_policy: RetryPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(base_url: String, api_token: String, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            http_client,
            retry_policy: RetryPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Replace the retry policy (tests use a zero-delay policy).
    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Override the listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Operations ────────────────────────────────────────────────────

    /// Enumerate the entire remote user population.
    ///
    /// Pages through `GET /users` until a short or empty page signals the
    /// end of data. Each page fetch is retried on rate limiting. This never
    /// fails: if retries are exhausted or a hard error occurs mid-listing,
    /// the accumulated users are returned with `partial` set — callers must
    /// not treat such a snapshot as proof of absence.
    pub async fn list_all_users(&self) -> DirectorySnapshot {
        let mut users: Vec<DirectoryUser> = Vec::new();
        let mut page: u64 = 1;

        loop {
            let fetched = self
                .retry_policy
                .execute("list_users", || self.fetch_user_page(page))
                .await;

            match fetched {
                Ok(list_page) => {
                    let fetched_count = list_page.data.len();
                    users.extend(list_page.data);
                    debug!(page, fetched_count, total = users.len(), "fetched user page");

                    if fetched_count < self.page_size {
                        // Short page: end of data.
                        return DirectorySnapshot {
                            users,
                            partial: false,
                        };
                    }
                    page += 1;
                }
                Err(error) => {
                    warn!(
                        page,
                        accumulated = users.len(),
                        error = %error,
                        "user listing cut short, returning partial snapshot"
                    );
                    return DirectorySnapshot {
                        users,
                        partial: true,
                    };
                }
            }
        }
    }

    /// Invite a user so that an account exists to deactivate.
    ///
    /// Issues a non-administrative, non-licensed creation request with the
    /// notification email suppressed. Success requires the explicit
    /// `SUCCESS` message in the response envelope; a soft-failure body is a
    /// typed [`DirectoryError::Rejected`], never a panic.
    pub async fn invite_user(&self, email: &str) -> DirectoryResult<DirectoryUser> {
        let envelope: ApiResultEnvelope<DirectoryUser> = self
            .retry_policy
            .execute("invite_user", || async move {
                let url = format!("{}/users", self.base_url);
                let body = serde_json::json!({
                    "email": email,
                    "admin": false,
                    "licensedSheetCreator": false,
                });
                debug!(%email, "POST {url}");
                let response = self
                    .http_client
                    .post(&url)
                    .bearer_auth(&self.api_token)
                    .query(&[("sendEmail", "false")])
                    .json(&body)
                    .send()
                    .await?;
                self.decode_response(response).await
            })
            .await?;

        if !envelope.is_success() {
            return Err(DirectoryError::Rejected {
                message: envelope.message,
            });
        }
        envelope.result.ok_or_else(|| {
            DirectoryError::Parse("invite reported success but returned no user object".into())
        })
    }

    /// Deactivate a user account.
    ///
    /// Success requires the explicit `SUCCESS` message in the response body
    /// — the platform can answer 200 with a failure payload. Deactivating
    /// an already-deactivated user is benign: the failure is surfaced to
    /// the caller but is never process-fatal.
    pub async fn deactivate_user(&self, id: i64, email: &str) -> DirectoryResult<()> {
        let envelope: ApiResultEnvelope<serde_json::Value> = self
            .retry_policy
            .execute("deactivate_user", || async move {
                let url = format!("{}/users/{id}/deactivate", self.base_url);
                debug!(%email, user_id = id, "POST {url}");
                let response = self
                    .http_client
                    .post(&url)
                    .bearer_auth(&self.api_token)
                    .send()
                    .await?;
                self.decode_response(response).await
            })
            .await?;

        if envelope.is_success() {
            Ok(())
        } else {
            Err(DirectoryError::Rejected {
                message: envelope.message,
            })
        }
    }

    // ── Internals ─────────────────────────────────────────────────────

    async fn fetch_user_page(&self, page: u64) -> DirectoryResult<UserListPage> {
        let url = format!("{}/users", self.base_url);
        debug!(page, page_size = self.page_size, "GET {url}");
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .query(&[
                ("page", page.to_string()),
                ("pageSize", self.page_size.to_string()),
            ])
            .send()
            .await?;
        self.decode_response(response).await
    }

    async fn decode_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> DirectoryResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| DirectoryError::Parse(format!("failed to parse response: {e}")))
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn handle_error_response<T>(&self, response: reqwest::Response) -> DirectoryResult<T> {
        let status = response.status();

        // Retry-After hint, when the platform supplies one on 429.
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("directory API rate limited, retry after {retry_after:?}s");
                Err(DirectoryError::RateLimited {
                    retry_after_secs: retry_after,
                })
            }
            StatusCode::UNAUTHORIZED => Err(DirectoryError::Auth(format!(
                "authentication failed (401): {body}"
            ))),
            _ => {
                let detail = if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                };
                Err(DirectoryError::Remote {
                    status: status.as_u16(),
                    detail,
                })
            }
        }
    }
}
