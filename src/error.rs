use std::time::Duration;

use thiserror::Error;

use crate::provider::transport::TransportError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not a valid filter value: {key}={value}")]
    InvalidToken { key: String, value: String },

    #[error("a required filter was not provided: {name}")]
    MissingFilter { name: String },

    #[error("unknown {name}: {value}, must be one of: {expected}")]
    InvalidFilterValue {
        name: String,
        value: String,
        expected: String,
    },

    #[error("unknown or unsupported language: {name}")]
    UnknownLanguage { name: String },

    #[error("no snippet for {language} found in {platform} response")]
    SnippetNotFound { platform: String, language: String },

    #[error("provided source does not have a submission region")]
    NoSubmissionRegion,

    #[error("{platform} rejected the submission: {reason}")]
    SubmitRejected { platform: String, reason: String },

    #[error("request timed out after {timeout:?}")]
    PollTimeout { timeout: Duration },

    #[error("unknown provider: {name}, must be one of: leetcode, hackerrank")]
    UnknownProvider { name: String },

    #[error("current login config for {platform} invalid: try running: coderound login {platform}")]
    NotSignedIn { platform: String },

    #[error("could not find a viable challenge: {reason}")]
    NoChallengeFound { reason: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
