use std::time::Duration;

/// Errors returned while talking to the Docker Engine API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid docker endpoint `{0}` (expected unix://, tcp:// or http://)")]
    InvalidEndpoint(String),
    #[error("failed to connect to `{endpoint}`: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build request for `{path}`: {source}")]
    Request {
        path: String,
        #[source]
        source: http::Error,
    },
    #[error("request to `{path}` failed: {source}")]
    Http {
        path: String,
        #[source]
        source: hyper::Error,
    },
    #[error("request to `{path}` returned {status}: {message}")]
    Status {
        path: String,
        status: http::StatusCode,
        message: String,
    },
    #[error("failed to decode response from `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("request to `{path}` timed out after {}s", .timeout.as_secs())]
    Timeout { path: String, timeout: Duration },
}

pub type Result<T> = std::result::Result<T, Error>;
