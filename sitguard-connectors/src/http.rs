//! HTTP/JSON Event Store Connector
//!
//! ## Overview
//!
//! [`HttpReporter`] pushes monitor events to a JSON document store over
//! HTTP(S) and reads the device parameters back from it. The layout matches
//! realtime-database style REST APIs, where every path is addressable by
//! appending `.json`:
//!
//! ```text
//! GET  {base}/config.json   -> {"time_to_discharge_ms": .., "time_to_recharge_ms": .., "threshold_distance_cm": ..}
//! POST {base}/events.json   <- {"timestamp": {".sv": "timestamp"}, "action": "sit", "health": 87.5, ..}
//! ```
//!
//! ## Timestamps
//!
//! The device only knows milliseconds since boot. By default the body asks
//! the store to stamp the event on arrival (`{".sv": "timestamp"}`) and
//! carries the device time separately as `uptime_ms`. Stores without server
//! values can use [`HttpConfig::device_timestamps`].
//!
//! ## Blocking I/O
//!
//! Requests block the calling thread, retries included. On a single-loop
//! device this stalls sampling while the link is bad, so the defaults allow
//! one retry and a short timeout ([`DEFAULT_TIMEOUT`], [`DEFAULT_MAX_RETRIES`]).
//! The monitor's outbox carries failed events across ticks.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sitguard_connectors::http::{HttpConfig, HttpReporter};
//! use sitguard_connectors::ParamSource;
//! use sitguard_core::{ReportEvent, Reporter};
//!
//! let config = HttpConfig::new("https://sitguard-demo.firebaseio.com")
//!     .query_token("auth", "database-secret")
//!     .timeout_secs(5)
//!     .max_retries(1);
//!
//! let mut reporter = HttpReporter::new(config)?;
//! let params = reporter.fetch_params()?;
//! reporter.report(&ReportEvent::connected(0, 100.0, false))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::ParamSource;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use sitguard_core::{RemoteParams, ReportAction, ReportEvent, Reporter, Timestamp};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Resource holding the device parameters
pub const CONFIG_RESOURCE: &str = "config";
/// Resource events are appended to
pub const EVENTS_RESOURCE: &str = "events";

/// Per-request timeout, short enough to run inside the control loop
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);
/// Retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// HTTP-specific errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Server returned error status
    #[error("Server error {status}: {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Request counters for one reporter
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages failed to send
    pub messages_failed: u64,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Requests repeated after a retryable failure
    pub retries: u64,
    /// Last error message
    pub last_error: Option<String>,
}

/// HTTP configuration
#[derive(Clone)]
pub struct HttpConfig {
    /// Base URL for the store, without trailing slash
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Authentication method
    pub auth: AuthMethod,
    /// Custom headers
    pub headers: HashMap<String, String>,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each further one
    pub retry_base: Duration,
    /// Ask the store to stamp events on arrival
    pub server_timestamps: bool,
    /// User agent string
    pub user_agent: String,
}

/// Authentication methods
#[derive(Clone)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// Bearer token
    Bearer(String),
    /// Basic authentication
    Basic {
        /// User name
        username: String,
        /// Password
        password: String,
    },
    /// API key in header
    ApiKey {
        /// Header name
        header: String,
        /// Key
        value: String,
    },
    /// Token in the query string (`?auth=...`)
    Query {
        /// Parameter name
        name: String,
        /// Token
        value: String,
    },
}

impl HttpConfig {
    /// Create new configuration with base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            auth: AuthMethod::None,
            headers: HashMap::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base: Duration::from_millis(100),
            server_timestamps: true,
            user_agent: format!("SitGuard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set bearer token authentication
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMethod::Bearer(token.into());
        self
    }

    /// Set basic authentication
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set API key authentication
    pub fn api_key(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth = AuthMethod::ApiKey {
            header: header.into(),
            value: value.into(),
        };
        self
    }

    /// Set query string authentication
    pub fn query_token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth = AuthMethod::Query {
            name: name.into(),
            value: value.into(),
        };
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set retry count
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set first retry delay in milliseconds
    pub fn retry_base_ms(mut self, ms: u64) -> Self {
        self.retry_base = Duration::from_millis(ms);
        self
    }

    /// Send the device uptime as `timestamp` instead of a server value
    pub fn device_timestamps(mut self) -> Self {
        self.server_timestamps = false;
        self
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// JSON body of one stored event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBody {
    /// Server value placeholder or device uptime
    pub timestamp: serde_json::Value,
    /// Event kind
    pub action: ReportAction,
    /// Level at the time of the event
    pub health: f32,
    /// Posture at the time of the event
    pub occupied: bool,
    /// Device time since boot
    pub uptime_ms: Timestamp,
}

impl EventBody {
    /// Body for `event`
    pub fn new(event: &ReportEvent, server_timestamp: bool) -> Self {
        let timestamp = if server_timestamp {
            serde_json::json!({ ".sv": "timestamp" })
        } else {
            serde_json::json!(event.timestamp)
        };

        Self {
            timestamp,
            action: event.action,
            health: event.level,
            occupied: event.occupied,
            uptime_ms: event.timestamp,
        }
    }
}

/// Event store reporter using lightweight ureq client
pub struct HttpReporter {
    config: HttpConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl HttpReporter {
    /// Create new HTTP reporter
    pub fn new(mut config: HttpConfig) -> Result<Self, HttpError> {
        // Validate base URL
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(HttpError::Config("Base URL must start with http:// or https://".into()));
        }
        let trimmed = config.base_url.trim_end_matches('/').len();
        config.base_url.truncate(trimmed);

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: ConnectionStats::default(),
        })
    }

    /// URL of a store resource
    pub fn url(&self, resource: &str) -> String {
        format!("{}/{}.json", self.config.base_url, resource.trim_matches('/'))
    }

    /// Configuration in use
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Request counters so far
    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Append one event to the store
    pub fn push_event(&mut self, event: &ReportEvent) -> Result<(), HttpError> {
        let body = EventBody::new(event, self.config.server_timestamps);
        let json = serde_json::to_vec(&body).map_err(|e| HttpError::Serialization(e.to_string()))?;

        let request = self.build_request(self.agent.post(&self.url(EVENTS_RESOURCE)));
        self.execute(request, Some(&json))?;

        log::debug!("Pushed {} event at t={}", event.action, event.timestamp);
        Ok(())
    }

    /// Read the device parameters from the store
    pub fn get_params(&mut self) -> Result<RemoteParams, HttpError> {
        let request = self.build_request(self.agent.get(&self.url(CONFIG_RESOURCE)));
        let text = self.execute(request, None)?;

        serde_json::from_str(&text).map_err(|e| HttpError::Serialization(e.to_string()))
    }

    /// Authorization header for the configured method
    fn auth_header(&self) -> Option<(String, String)> {
        match &self.config.auth {
            AuthMethod::Bearer(token) => Some(("Authorization".into(), format!("Bearer {}", token))),
            AuthMethod::Basic { username, password } => {
                let credentials = STANDARD.encode(format!("{}:{}", username, password));
                Some(("Authorization".into(), format!("Basic {}", credentials)))
            }
            AuthMethod::ApiKey { header, value } => Some((header.clone(), value.clone())),
            AuthMethod::None | AuthMethod::Query { .. } => None,
        }
    }

    /// Build request with authentication and headers
    fn build_request(&self, mut request: ureq::Request) -> ureq::Request {
        if let Some((name, value)) = self.auth_header() {
            request = request.set(&name, &value);
        }
        if let AuthMethod::Query { name, value } = &self.config.auth {
            request = request.query(name, value);
        }

        // Add custom headers
        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }

        request
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
    }

    /// Execute request with retry logic, returning the response body
    fn execute(&mut self, request: ureq::Request, body: Option<&[u8]>) -> Result<String, HttpError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.config.retry_base, attempt);
                log::debug!("Retry {} of {} in {:?}", attempt, self.config.max_retries, delay);
                self.stats.retries += 1;
                std::thread::sleep(delay);
            }

            let response = match body {
                Some(bytes) => request.clone().send_bytes(bytes),
                None => request.clone().call(),
            };

            match response {
                Ok(resp) => {
                    self.stats.messages_sent += 1;
                    self.stats.bytes_sent += body.map_or(0, |b| b.len() as u64);

                    return resp.into_string().map_err(|e| HttpError::Request(e.to_string()));
                }
                Err(ureq::Error::Status(code, resp)) => {
                    let message = resp.into_string().unwrap_or_default();

                    if code == 401 || code == 403 {
                        return Err(self.fail(HttpError::Auth(format!("HTTP {}", code))));
                    }

                    let error = HttpError::ServerError { status: code, message };
                    if is_retryable(code) {
                        log::warn!("Store busy: {}", error);
                        last_error = Some(error);
                        continue;
                    }
                    return Err(self.fail(error));
                }
                Err(ureq::Error::Transport(e)) => {
                    log::warn!("Transport error: {}", e);
                    last_error = Some(HttpError::Request(e.to_string()));
                }
            }
        }

        // All retries exhausted
        let error = last_error.unwrap_or_else(|| HttpError::Request("No attempt made".into()));
        Err(self.fail(error))
    }

    fn fail(&mut self, error: HttpError) -> HttpError {
        self.stats.messages_failed += 1;
        self.stats.last_error = Some(error.to_string());
        log::error!("Store request failed: {}", error);
        error
    }
}

/// Server errors and rate limiting are worth another attempt
fn is_retryable(status: u16) -> bool {
    status >= 500 || status == 429
}

fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    base.saturating_mul(1 << exponent)
}

impl Reporter for HttpReporter {
    type Error = HttpError;

    fn report(&mut self, event: &ReportEvent) -> Result<(), Self::Error> {
        self.push_event(event)
    }
}

impl ParamSource for HttpReporter {
    type Error = HttpError;

    fn fetch_params(&mut self) -> Result<RemoteParams, Self::Error> {
        self.get_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::new("https://store.example.com")
            .bearer_token("test-token")
            .timeout_secs(60)
            .max_retries(5)
            .retry_base_ms(20)
            .header("X-Desk", "3F-12");

        assert_eq!(config.base_url, "https://store.example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_base, Duration::from_millis(20));
        assert!(config.server_timestamps);
        assert!(config.headers.contains_key("X-Desk"));

        match config.auth {
            AuthMethod::Bearer(token) => assert_eq!(token, "test-token"),
            _ => panic!("Wrong auth method"),
        }
    }

    #[test]
    fn test_defaults_fit_the_control_loop() {
        let config = HttpConfig::new("https://store.example.com");
        assert_eq!(config.max_retries, 1);
        assert!(config.timeout <= Duration::from_secs(3));

        // Worst case for one request: every attempt times out
        let worst = config.timeout * (config.max_retries + 1) + backoff_delay(config.retry_base, 1);
        assert!(worst < Duration::from_secs(10));
    }

    #[test]
    fn test_url_validation() {
        let result = HttpReporter::new(HttpConfig::new("not-a-url"));
        assert!(matches!(result, Err(HttpError::Config(_))));

        let result = HttpReporter::new(HttpConfig::new("https://valid.url"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_resource_urls() {
        let reporter = HttpReporter::new(HttpConfig::new("https://desk.example.com/")).unwrap();
        assert_eq!(reporter.url(EVENTS_RESOURCE), "https://desk.example.com/events.json");
        assert_eq!(reporter.url("/config/"), "https://desk.example.com/config.json");
    }

    #[test]
    fn test_basic_auth_header() {
        let reporter = HttpReporter::new(HttpConfig::new("https://x.example").basic_auth("user", "pass")).unwrap();
        assert_eq!(
            reporter.auth_header(),
            Some(("Authorization".to_string(), "Basic dXNlcjpwYXNz".to_string()))
        );

        let reporter = HttpReporter::new(HttpConfig::new("https://x.example").query_token("auth", "s3cret")).unwrap();
        assert_eq!(reporter.auth_header(), None);
    }

    #[test]
    fn test_event_body_with_server_timestamp() {
        let event = ReportEvent::transition(12_345, 87.5, true);
        let json = serde_json::to_value(EventBody::new(&event, true)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "timestamp": { ".sv": "timestamp" },
                "action": "sit",
                "health": 87.5,
                "occupied": true,
                "uptime_ms": 12_345
            })
        );
    }

    #[test]
    fn test_event_body_with_device_timestamp() {
        let event = ReportEvent::snapshot(60_000, 50.0, false);
        let json = serde_json::to_value(EventBody::new(&event, false)).unwrap();

        assert_eq!(json["timestamp"], serde_json::json!(60_000));
        assert_eq!(json["action"], "snapshot");
    }

    #[test]
    fn test_backoff_doubles() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(200));
        assert_eq!(backoff_delay(base, 4), Duration::from_millis(800));
        assert!(backoff_delay(base, u32::MAX) >= backoff_delay(base, 17));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(503));
        assert!(is_retryable(429));
        assert!(!is_retryable(404));
        assert!(!is_retryable(400));
    }

    #[test]
    fn test_stats_start_empty() {
        let reporter = HttpReporter::new(HttpConfig::new("https://x.example")).unwrap();
        assert_eq!(reporter.stats(), &ConnectionStats::default());
    }
}
