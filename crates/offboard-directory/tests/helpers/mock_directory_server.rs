//! Mock directory API using wiremock for integration testing.
//!
//! Simulates the platform's paginated user listing, invite, and deactivate
//! endpoints with success, soft-failure, and rate-limit scenarios.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use offboard_directory::client::DirectoryClient;
use offboard_directory::retry::RetryPolicy;

/// A mock of the remote directory API.
pub struct MockDirectoryServer {
    server: MockServer,
}

impl MockDirectoryServer {
    /// Start a fresh mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URI of the mock server.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// A client pointed at this mock, with a zero-delay retry policy so
    /// rate-limit tests finish quickly.
    pub fn client(&self) -> DirectoryClient {
        DirectoryClient::with_http_client(
            self.uri(),
            "test-token-123".to_string(),
            reqwest::Client::new(),
        )
        .with_retry_policy(RetryPolicy::without_delay())
    }

    /// Requests received so far, in arrival order.
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    // ── User listing ──────────────────────────────────────────────────

    /// Mount one listing page for `page`, expected to be fetched exactly
    /// once.
    pub async fn mock_list_page(&self, page: u64, page_size: usize, users: &[(i64, &str)]) {
        self.mock_list_page_times(page, page_size, users, 1).await;
    }

    /// Mount one listing page expected to be fetched exactly `times` times.
    pub async fn mock_list_page_times(
        &self,
        page: u64,
        page_size: usize,
        users: &[(i64, &str)],
        times: u64,
    ) {
        let data: Vec<Value> = users.iter().map(|(id, email)| user_json(*id, email)).collect();
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", page.to_string()))
            .and(query_param("pageSize", page_size.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pageNumber": page,
                "pageSize": page_size,
                "totalCount": users.len(),
                "data": data,
            })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Mount a hard failure for one listing page.
    pub async fn mock_list_page_server_error(&self, page: u64) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "errorCode": 4000,
                "message": "internal error",
            })))
            .mount(&self.server)
            .await;
    }

    // ── Invite ────────────────────────────────────────────────────────

    /// Mount a successful invite returning `assigned_id`, expected exactly
    /// once.
    pub async fn mock_invite_success(&self, email: &str, assigned_id: i64) {
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(query_param("sendEmail", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "SUCCESS",
                "resultCode": 0,
                "result": user_json(assigned_id, email),
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mount an invite answering 200 with a failure payload.
    pub async fn mock_invite_soft_failure(&self, message: &str) {
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": message,
                "resultCode": 1025,
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount an invite rejected with 400 (e.g. duplicate user).
    pub async fn mock_invite_bad_request(&self) {
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorCode": 1025,
                "message": "user already exists",
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    // ── Deactivate ────────────────────────────────────────────────────

    /// Mount a successful deactivation for `user_id`, expected exactly
    /// `times` times.
    pub async fn mock_deactivate_success(&self, user_id: i64, times: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/users/{user_id}/deactivate")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "SUCCESS",
                "resultCode": 0,
            })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Mount a deactivation answering 200 with a failure payload — the
    /// platform reports operation outcome in the body.
    pub async fn mock_deactivate_soft_failure(&self, user_id: i64, message: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/users/{user_id}/deactivate")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": message,
                "resultCode": 5555,
            })))
            .mount(&self.server)
            .await;
    }

    // ── Failure scenarios ─────────────────────────────────────────────

    /// Mount a 429 for every request, optionally with a Retry-After hint.
    pub async fn mock_rate_limited(&self, retry_after_secs: Option<u64>) {
        let mut template = ResponseTemplate::new(429).set_body_json(json!({
            "errorCode": 4004,
            "message": "rate limit exceeded",
        }));
        if let Some(secs) = retry_after_secs {
            template = template.append_header("Retry-After", secs.to_string());
        }
        Mock::given(wiremock::matchers::any())
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    /// Mount a 429 that expires after `times` responses, taking priority
    /// over later-mounted success mocks.
    pub async fn mock_rate_limited_n_times(&self, times: u64) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "errorCode": 4004,
                "message": "rate limit exceeded",
            })))
            .up_to_n_times(times)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Mount a 401 for every request.
    pub async fn mock_unauthorized(&self) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errorCode": 1002,
                "message": "invalid token",
            })))
            .mount(&self.server)
            .await;
    }
}

/// Build a directory user object as the listing endpoint reports it.
pub fn user_json(id: i64, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "status": "ACTIVE",
    })
}
