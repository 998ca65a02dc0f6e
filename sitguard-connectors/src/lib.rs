//! Event Store Connectors for SitGuard
//!
//! ## Overview
//!
//! A monitor in [`LinkMode::Online`] hands every event to a
//! [`sitguard_core::Reporter`]. This crate provides reporters that talk to a
//! remote event store, plus the boot-time fetch of remotely stored
//! parameters.
//!
//! The store is a JSON document tree reachable over HTTPS:
//!
//! | Resource              | Method | Purpose                          |
//! |-----------------------|--------|----------------------------------|
//! | `{base}/config.json`  | GET    | Time constants and threshold     |
//! | `{base}/events.json`  | POST   | Append one sit/stand/... event   |
//!
//! ## Boot Sequence
//!
//! ```text
//! fetch config ──ok──► usable? ──yes──► Online, remote values
//!      │                  │
//!      └──err─────────────┴──no───────► Offline, local defaults
//! ```
//!
//! [`resolve_config`] implements this sequence for any [`ParamSource`].
//!
//! ## Retry Logic
//!
//! Requests are retried on transport errors, 5xx and 429 with exponential
//! backoff:
//! ```text
//! retry_delay = retry_base * 2^(attempt - 1)
//! ```
//! Client errors (4xx) are returned at once. Events that still fail stay in
//! the monitor's outbox and are retried on the next tick.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sitguard_connectors::{http::{HttpConfig, HttpReporter}, resolve_config};
//! use sitguard_core::MonitorConfig;
//!
//! # fn ping() -> nb::Result<f32, sitguard_core::SensorError> { Ok(45.0) }
//! let mut reporter = HttpReporter::new(
//!     HttpConfig::new("https://sitguard-demo.firebaseio.com").query_token("auth", "secret"),
//! )?;
//!
//! let (config, mode) = resolve_config(MonitorConfig::default(), &mut reporter);
//! let mut monitor = config.monitor(config.hysteresis(ping)?, (), reporter, mode)?;
//! monitor.start(0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "http")]
pub mod http;

// Re-export common types
#[cfg(feature = "http")]
pub use http::{AuthMethod, ConnectionStats, HttpConfig, HttpError, HttpReporter};

use std::fmt;

use sitguard_core::{LinkMode, MonitorConfig, RemoteParams};

/// Anything that can supply remotely stored parameters
pub trait ParamSource {
    /// Why the fetch failed
    type Error: fmt::Display;

    /// Fetch the current parameters
    fn fetch_params(&mut self) -> Result<RemoteParams, Self::Error>;
}

/// Resolve the monitor configuration at boot
///
/// Fetch errors and unusable parameters both leave `base` untouched and
/// select [`LinkMode::Offline`].
pub fn resolve_config<P: ParamSource>(base: MonitorConfig, source: &mut P) -> (MonitorConfig, LinkMode) {
    log::info!("Retrieving remote parameters");

    let remote = match source.fetch_params() {
        Ok(params) => Some(params),
        Err(e) => {
            log::error!("Parameter fetch failed: {}", e);
            None
        }
    };

    let (config, mode) = base.resolve_remote(remote);
    match mode {
        LinkMode::Online => log::info!("Remote parameters applied, starting online"),
        LinkMode::Offline => log::warn!("Starting offline with local defaults"),
    }
    (config, mode)
}
