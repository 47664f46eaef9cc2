use reqwest::{Response, Url};
use thiserror::Error;

/// Reasons a remote call failed. Never leaves this crate: the public clients
/// log it and return a sentinel instead.
#[derive(Debug, Error)]
pub(crate) enum TransportError {
    #[error("invalid endpoint {base}: {reason}")]
    Endpoint { base: String, reason: String },
    #[error("auth token is not a valid header value: {0}")]
    Token(String),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl TransportError {
    /// Wraps a send failure. The URL is dropped: it may carry the API key.
    pub(crate) fn request(err: reqwest::Error) -> Self {
        TransportError::Request(err.without_url())
    }

    pub(crate) fn decode(err: reqwest::Error) -> Self {
        TransportError::Decode(err.without_url())
    }
}

/// Joins path segments onto a base URL, percent-encoding each segment.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url, TransportError> {
    let invalid = |reason: String| TransportError::Endpoint {
        base: base.to_string(),
        reason,
    };
    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("cannot be a base URL".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Rejects non-2xx responses.
pub(crate) fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status {
            status: status.as_u16(),
            url: without_query(response.url()),
        })
    }
}

/// Scheme, host, and path only; query strings may hold credentials.
fn without_query(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}
