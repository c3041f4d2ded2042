use reqwest::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can abort a run. None of these are retried; the binary
/// reports the failing step and exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} rejected our credentials ({status})")]
    Auth {
        service: &'static str,
        status: StatusCode,
    },

    #[error("malformed response from {service}: {detail}")]
    MalformedResponse {
        service: &'static str,
        detail: String,
    },

    #[error("unrecognised charity cause `{0}`")]
    UnrecognizedCause(String),

    #[error("charity search term is empty")]
    EmptySearchTerm,

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
