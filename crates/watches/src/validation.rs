//! Input validation for create requests.

use url::Url;

use crate::error::WatchError;

/// Validate and normalize a watch target, returning the trimmed url
pub(crate) fn validate_url(target: &str) -> Result<String, WatchError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(WatchError::InvalidArgument("url must not be empty".to_string()));
    }

    let url = Url::parse(target)
        .map_err(|e| WatchError::InvalidArgument(format!("invalid url {target:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(target.to_string()),
        other => Err(WatchError::InvalidArgument(format!(
            "unsupported scheme {other:?}, expected http or https"
        ))),
    }
}

/// Intervals are whole seconds and must be positive
pub(crate) fn validate_interval(interval: i64) -> Result<i64, WatchError> {
    if interval <= 0 {
        return Err(WatchError::InvalidArgument(format!(
            "interval must be a positive number of seconds, got {interval}"
        )));
    }
    Ok(interval)
}
