/// Error types shared across the portfolio crates.
///
/// These cover failures of the shared HTTP fetch client. Application-specific errors
/// live in each binary crate.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}
