//! HTTP plumbing shared by the proxy and the dashboard.
//!
//! [`Transport`] is the seam for a single GET; [`RetryingClient`] wraps any
//! transport with bounded exponential backoff on rate limits and network
//! failures.

mod retry;
mod transport;

pub use retry::{RetryPolicy, RetryingClient};
pub use transport::{BackendRequest, HttpTransport, Transport, TransportResponse};

#[cfg(test)]
pub use transport::MockTransport;

use crate::error::{Error, Result};
use reqwest::Url;

/// Join a base URL (which may carry a path prefix such as `/api`) with a
/// resource path.
pub fn endpoint_url(base: &str, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| Error::invalid_input(format!("{joined}: {e}")))
}
