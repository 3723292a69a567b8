//! Network access for the shell worker

use crate::error::{Result, SaathiError};
use crate::shell::{ShellRequest, ShellResponse};
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Network used by the worker
///
/// Returns `Ok` for any HTTP response (including error statuses) and `Err`
/// only when no response was received.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform the request
    async fn fetch(&self, request: &ShellRequest) -> Result<ShellResponse>;
}

/// `reqwest` implementation resolving paths against an origin
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: Url,
}

impl HttpFetcher {
    /// Create a fetcher for an origin such as `http://localhost:5173`
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::Config` for an invalid origin and
    /// `SaathiError::Network` if the HTTP client cannot be built
    pub fn new(origin: &str, timeout: Duration) -> Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| SaathiError::Config(format!("Invalid shell origin {}: {}", origin, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SaathiError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, origin })
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        self.origin
            .join(path)
            .map_err(|e| SaathiError::Validation(format!("Invalid path {}: {}", path, e)).into())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &ShellRequest) -> Result<ShellResponse> {
        let url = self.resolve(&request.path)?;
        let method = Method::from_bytes(request.method.to_uppercase().as_bytes())
            .map_err(|e| SaathiError::Validation(format!("Invalid method: {}", e)))?;

        tracing::debug!("Shell fetch {} {}", method, url);
        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(|e| SaathiError::Network(format!("Fetch failed: {}", e)))?;

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_lowercase(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| SaathiError::Network(format!("Failed to read body: {}", e)))?;

        Ok(ShellResponse {
            status,
            headers,
            body,
        })
    }
}
