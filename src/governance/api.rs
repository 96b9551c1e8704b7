//! Governance HTTP API client.

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::GovernanceConfig;
use crate::governance::types::{GovernanceError, VoteSubmission, VotingStatus};

/// The two calls a vote needs.
#[async_trait]
pub trait GovernanceApi: Send + Sync {
    /// Voting status of `voter` on the configured proposal.
    async fn voting_status(&self, voter: Address) -> Result<VotingStatus, GovernanceError>;

    /// Submit a signed vote on `contract`. Only HTTP 200 counts as success.
    async fn submit_vote(
        &self,
        contract: Address,
        vote: &VoteSubmission,
    ) -> Result<(), GovernanceError>;
}

/// `reqwest` implementation, optionally routed through a proxy.
#[derive(Debug, Clone)]
pub struct HttpGovernanceApi {
    client: Client,
    base_url: url::Url,
    proposal: String,
}

impl HttpGovernanceApi {
    pub fn new(config: &GovernanceConfig, proxy: Option<&str>) -> Result<Self, GovernanceError> {
        let mut base = config.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url: url::Url = base
            .parse()
            .map_err(|e| GovernanceError::Url(format!("'{}': {}", config.api_base_url, e)))?;

        let mut builder = Client::builder()
            .default_headers(default_headers(config)?)
            .timeout(Duration::from_secs(config.request_timeout_secs));
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            proposal: config.proposal.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, GovernanceError> {
        self.base_url
            .join(path)
            .map_err(|e| GovernanceError::Url(format!("'{}': {}", path, e)))
    }
}

fn default_headers(config: &GovernanceConfig) -> Result<HeaderMap, GovernanceError> {
    let header = |value: &str| {
        HeaderValue::from_str(value).map_err(|e| GovernanceError::Url(format!("bad header value '{}': {}", value, e)))
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header(&config.user_agent)?);
    if !config.origin.is_empty() {
        headers.insert(ORIGIN, header(&config.origin)?);
        headers.insert(REFERER, header(&format!("{}/", config.origin.trim_end_matches('/')))?);
    }
    Ok(headers)
}

async fn error_for_status(res: reqwest::Response) -> GovernanceError {
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    GovernanceError::Status { status, body }
}

#[async_trait]
impl GovernanceApi for HttpGovernanceApi {
    async fn voting_status(&self, voter: Address) -> Result<VotingStatus, GovernanceError> {
        let url = self.endpoint(&format!("api/vote/{}/user/{}", self.proposal, voter))?;
        let res = self.client.get(url).send().await?;
        if res.status() != StatusCode::OK {
            return Err(error_for_status(res).await);
        }
        Ok(res.json().await?)
    }

    async fn submit_vote(
        &self,
        contract: Address,
        vote: &VoteSubmission,
    ) -> Result<(), GovernanceError> {
        let url = self.endpoint(&format!("api/vote/{}/vote", contract))?;
        let res = self.client.put(url).json(vote).send().await?;
        if res.status() != StatusCode::OK {
            return Err(error_for_status(res).await);
        }
        Ok(())
    }
}
