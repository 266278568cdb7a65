use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;

/// Why a check produced no HTTP status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFailure {
    #[error("timeout")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
}

/// Checker trait for URL liveness checks
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Fetch `target` and return the response status, whatever it is
    async fn check(&self, target: &str) -> Result<u16, CheckFailure>;
}

/// Plain GET checker
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn check(&self, target: &str) -> Result<u16, CheckFailure> {
        // Any status counts, 5xx included: it is what the target answered
        match self.client.get(target).send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(error) => Err(classify(&error)),
        }
    }
}

fn classify(error: &reqwest::Error) -> CheckFailure {
    if error.is_timeout() {
        CheckFailure::Timeout
    } else if error.is_connect() {
        CheckFailure::Connect(describe(error))
    } else {
        CheckFailure::Request(describe(error))
    }
}

/// reqwest's own message hides the interesting part (DNS, refused, TLS) in its sources
fn describe(error: &(dyn StdError + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
