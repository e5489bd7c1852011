#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The daemon answered with a failure status; the body carries the
    /// specific reason.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}
