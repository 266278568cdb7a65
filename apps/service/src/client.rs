//! Registry access for the poller.
//!
//! The poller only ever needs two registry operations: list every watch and
//! report one result. [`HttpRegistryClient`] reaches a running server; the
//! registry itself implements the trait too, for running both in one process.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;
use watches::{CheckReport, WatchError, WatchRegistry};

use crate::monitoring::WatchSnapshot;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("registry answered {code}: {body}")]
    Status { code: u16, body: String },
    #[error("invalid registry url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Registry(#[from] WatchError),
}

#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn list_watches(&self) -> Result<Vec<WatchSnapshot>, ClientError>;

    async fn report_result(&self, report: &CheckReport) -> Result<(), ClientError>;
}

pub struct HttpRegistryClient {
    client: reqwest::Client,
    watches_url: Url,
    results_url: Url,
}

impl HttpRegistryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        // Url::join drops the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { client, watches_url: base.join("watches")?, results_url: base.join("results")? })
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { code: status.as_u16(), body })
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn list_watches(&self) -> Result<Vec<WatchSnapshot>, ClientError> {
        let response = self.client.get(self.watches_url.clone()).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn report_result(&self, report: &CheckReport) -> Result<(), ClientError> {
        let response = self.client.post(self.results_url.clone()).json(report).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RegistryClient for WatchRegistry {
    async fn list_watches(&self) -> Result<Vec<WatchSnapshot>, ClientError> {
        let watches = WatchRegistry::list_watches(self).await?;
        Ok(watches.into_iter().map(WatchSnapshot::from).collect())
    }

    async fn report_result(&self, report: &CheckReport) -> Result<(), ClientError> {
        self.apply_report(report.clone()).await?;
        Ok(())
    }
}
