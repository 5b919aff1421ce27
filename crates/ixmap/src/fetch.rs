//! Async HTTP client wrapping reqwest.
//!
//! Not a browser: one plain GET with a desktop Chrome user-agent, a total
//! timeout and a short redirect chain. No retries: a failed request fails
//! the run.

use crate::error::{IxMapError, Result};
use std::time::Duration;

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body, decoded as UTF-8.
    pub body: String,
}

impl HttpResponse {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client used by the fetch stage.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client sending `user_agent` and giving up after `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent)
            .build()
            .map_err(|e| IxMapError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Perform a single GET request.
    ///
    /// Any response that arrives counts as success, whatever its status;
    /// a non-2xx status is only logged. Transport failures become
    /// [`IxMapError::Fetch`] and a body that is not UTF-8 becomes
    /// [`IxMapError::Decode`].
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        let fetch_err = |source: reqwest::Error| IxMapError::Fetch {
            url: url.to_string(),
            source,
        };

        let r = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();

        let bytes = r.bytes().await.map_err(fetch_err)?;
        let body = String::from_utf8(bytes.to_vec()).map_err(|source| IxMapError::Decode {
            url: url.to_string(),
            source,
        })?;

        let response = HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            body,
        };
        if !response.is_success() {
            tracing::warn!("{url} answered with HTTP {status}");
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client =
            HttpClient::new(crate::config::DEFAULT_USER_AGENT, Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[test]
    fn test_is_success_range() {
        let mut resp = HttpResponse {
            url: "https://www.peeringdb.com/net/457".to_string(),
            final_url: "https://www.peeringdb.com/net/457".to_string(),
            status: 200,
            body: String::new(),
        };
        assert!(resp.is_success());
        resp.status = 204;
        assert!(resp.is_success());
        resp.status = 301;
        assert!(!resp.is_success());
        resp.status = 503;
        assert!(!resp.is_success());
    }
}
