use std::time::Duration;

use reqwest::{Response, StatusCode};
use tracing::warn;

use crate::error::PeerError;

/// Basic credentials presented on outbound peer calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct PeerOptions {
    pub timeout: Duration,
    pub credentials: Option<Credentials>,
}

impl Default for PeerOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            credentials: None,
        }
    }
}

/// HTTP client bound to one peer service.
#[derive(Debug, Clone)]
pub struct PeerClient {
    http: reqwest::Client,
    service: &'static str,
    base_url: String,
    credentials: Option<Credentials>,
}

impl PeerClient {
    pub fn new(
        service: &'static str,
        base_url: impl Into<String>,
        options: &PeerOptions,
    ) -> Result<Self, PeerError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| PeerError::upstream(service, e.to_string()))?;

        Ok(Self {
            http,
            service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: options.credentials.clone(),
        })
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` on the peer. Transport failures are logged and mapped to
    /// `Upstream`; the status is left for the caller to interpret.
    pub(crate) async fn get(&self, path: &str) -> Result<Response, PeerError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url);
        if let Some(c) = &self.credentials {
            request = request.basic_auth(&c.username, Some(&c.password));
        }

        request.send().await.map_err(|e| {
            warn!(peer = self.service, %url, error = %e, "peer call failed");
            PeerError::upstream(self.service, e.to_string())
        })
    }

    pub(crate) fn unexpected(&self, path: &str, status: StatusCode) -> PeerError {
        warn!(peer = self.service, path, %status, "peer answered with unexpected status");
        PeerError::upstream(self.service, format!("unexpected status {status}"))
    }

    pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, PeerError> {
        response.json::<T>().await.map_err(|e| {
            warn!(peer = self.service, error = %e, "peer body could not be decoded");
            PeerError::upstream(self.service, e.to_string())
        })
    }
}
