//! Typed HTTP client for the proving service.
//!
//! The service owns blueprint compilation and proof generation; this
//! client only submits raw email bytes against a blueprint, polls the
//! request until it reaches a terminal state and fetches the resulting
//! proof artifact. A `Failed` status is terminal and is never retried.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use mailproof_core::{ProofArtifact, PublicOutputs};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Identifier of a compiled circuit bundle on the proving service,
/// e.g. `yagopajarino/Deel_YouHaveBeenPaid@v2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlueprintSlug(String);

impl BlueprintSlug {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

}

impl fmt::Display for BlueprintSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BlueprintSlug {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Client configuration. The blueprint is part of the construction-time
/// config so several blueprints can coexist in one process, each behind
/// its own client.
#[derive(Debug, Clone)]
pub struct ProverConfig {
    /// Base URL of the proving service API.
    pub base_url: Url,
    /// Blueprint to prove against.
    pub blueprint: BlueprintSlug,
    /// Delay between status checks while a request is in progress.
    pub poll_interval: Duration,
    /// Give up after this many status checks.
    pub poll_limit: usize,
}

#[derive(Debug, Error)]
pub enum ProverError {
    #[error("proving service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid proving service endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("proving service returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("proof generation failed for request {0}")]
    ProofFailed(String),

    #[error("completed proof request {0} is missing proof data")]
    MissingProofData(String),

    #[error("proof request {0} still in progress after {1} status checks")]
    PollLimit(String, usize),
}

/// Status of a submitted proof request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofStatus {
    InProgress,
    Completed,
    Failed,
}

/// Proof artifact plus public outputs of a completed request.
#[derive(Debug, Clone)]
pub struct ProofResult {
    pub proof: ProofArtifact,
    pub public_outputs: PublicOutputs,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProofRecord {
    status: ProofStatus,
    proof: Option<ProofArtifact>,
    public_outputs: Option<PublicOutputs>,
}

pub struct ProverClient {
    http: reqwest::Client,
    config: ProverConfig,
}

impl ProverClient {
    pub fn new(config: ProverConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn blueprint(&self) -> &BlueprintSlug {
        &self.config.blueprint
    }

    /// Submit raw email bytes for proving. Returns the request id used
    /// for all subsequent status checks.
    pub async fn submit(&self, raw_email: &str) -> Result<String, ProverError> {
        let url = self
            .config
            .base_url
            .join(&format!("blueprints/{}/prove", self.config.blueprint))?;
        debug!("Submitting proof request to {url}");

        let response = self
            .http
            .post(url)
            .json(&SubmitRequest { email: raw_email })
            .send()
            .await?;
        let submitted: SubmitResponse = check_api(response).await?.json().await?;

        info!("Proof request {} submitted", submitted.id);
        Ok(submitted.id)
    }

    /// Current status of a proof request.
    pub async fn status(&self, id: &str) -> Result<ProofStatus, ProverError> {
        Ok(self.fetch(id).await?.status)
    }

    /// Poll a request until it reaches a terminal state and return its
    /// proof data. `Failed` and an exhausted poll budget are terminal
    /// errors; neither is retried.
    pub async fn wait_for_completion(&self, id: &str) -> Result<ProofResult, ProverError> {
        for attempt in 1..=self.config.poll_limit {
            let record = self.fetch(id).await?;
            match record.status {
                ProofStatus::InProgress => {
                    debug!(
                        "Proof request {id} in progress (check {attempt}/{})",
                        self.config.poll_limit
                    );
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                ProofStatus::Failed => return Err(ProverError::ProofFailed(id.to_string())),
                ProofStatus::Completed => {
                    let proof = record
                        .proof
                        .ok_or_else(|| ProverError::MissingProofData(id.to_string()))?;
                    let public_outputs = record
                        .public_outputs
                        .ok_or_else(|| ProverError::MissingProofData(id.to_string()))?;
                    return Ok(ProofResult {
                        proof,
                        public_outputs,
                    });
                }
            }
        }
        Err(ProverError::PollLimit(
            id.to_string(),
            self.config.poll_limit,
        ))
    }

    async fn fetch(&self, id: &str) -> Result<ProofRecord, ProverError> {
        let url = self.config.base_url.join(&format!("proofs/{id}"))?;
        let response = self.http.get(url).send().await?;
        Ok(check_api(response).await?.json().await?)
    }
}

async fn check_api(response: reqwest::Response) -> Result<reqwest::Response, ProverError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ProverError::Api { status, message })
}
