use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};

use crate::endpoints::{Candidate, Plan, Verb};
use crate::{ClientConfig, ConfigError, Device, DeviceId, responses};

/// An API client for the device inventory backend.
///
/// Every operation probes an ordered [`Plan`] of candidate endpoints and
/// settles on the first response that is not a 404.
pub struct APIClient {
    pub config: ClientConfig,
    pub inner_client: reqwest::Client,
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            inner_client: reqwest::Client::new(),
        }
    }

    /// Client configured from `API_BASE_URL`, `AUTH_AUDIENCE` and `PAGE_URL`.
    pub fn from_env() -> Result<Self, ClientError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    fn request(
        &self,
        candidate: &Candidate,
        token: Option<&SecretString>,
    ) -> reqwest::RequestBuilder {
        let mut request = self
            .inner_client
            .request(candidate.verb.method(), candidate.url.clone())
            .header(ACCEPT, "application/json");

        if candidate.verb == Verb::Post {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        if let Some(body) = &candidate.body {
            request = request.json(body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        request
    }

    /// Try each candidate in order.
    ///
    /// A success or any status other than 404 ends the probe: the former is
    /// returned, the latter becomes [`ClientError::APIError`]. A 404 or a
    /// request that got no response moves on to the next candidate.
    pub async fn probe(
        &self,
        plan: &Plan,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut not_found = 0;
        let mut last_network_error = None;

        for stage in plan.stages() {
            for candidate in &stage.candidates {
                tracing::debug!(
                    stage = stage.name,
                    "{} {}",
                    candidate.verb.method(),
                    candidate.url
                );
                let response = match self.request(candidate, token).send().await
                {
                    Ok(response) => response,
                    Err(source) => {
                        tracing::debug!("No response from {}: {source}", candidate.url);
                        last_network_error = Some(ClientError::Network {
                            url: candidate.url.clone(),
                            source,
                        });
                        continue;
                    }
                };

                let status = response.status();
                if status.is_success() {
                    tracing::info!("Accepted {} from {}", status, candidate.url);
                    return Ok(response);
                }
                if status == StatusCode::NOT_FOUND {
                    not_found += 1;
                    continue;
                }
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::debug!("Unreadable error body from {}: {e}", candidate.url);
                        String::new()
                    }
                };
                return Err(ClientError::APIError {
                    url: candidate.url.clone(),
                    status,
                    body,
                });
            }
            tracing::debug!(stage = stage.name, "Stage exhausted");
        }

        Err(last_network_error
            .unwrap_or(ClientError::Exhausted { attempts: not_found }))
    }
}

/// Methods on the backend API
impl APIClient {
    /// Fetch and normalize the device list.
    pub async fn get_devices(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Vec<Device>, ClientError> {
        let plan = Plan::fetch_devices(&self.config);
        let response = self.probe(&plan, token).await?;
        ok_devices(response).await
    }

    /// Reserve a device. Any accepted success counts; the body is ignored.
    pub async fn reserve_device(
        &self,
        id: &DeviceId,
        token: Option<&SecretString>,
    ) -> Result<(), ClientError> {
        let plan = Plan::reserve_device(&self.config, id);
        self.probe(&plan, token).await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A candidate answered with an error status other than 404.
    #[error("Request to {url} failed with {status}{}", body_suffix(.body))]
    APIError {
        url: Url,
        status: StatusCode,
        body: String,
    },
    #[error("No device endpoint found: {attempts} candidate URLs returned 404")]
    Exhausted { attempts: usize },
    #[error("Network error contacting {url}: {source}")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

/// Read an accepted response body into a normalized device list.
pub async fn ok_devices(
    response: reqwest::Response,
) -> Result<Vec<Device>, ClientError> {
    let url = response.url().clone();
    let text = response
        .text()
        .await
        .map_err(|source| ClientError::Network { url, source })?;
    let body: serde_json::Value = serde_json::from_str(&text)?;
    Ok(responses::normalize_devices(body))
}
