//! Error taxonomy shared by every stage of the pipeline.
//!
//! Failures are grouped by where they come from rather than by the library
//! that raised them:
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | [`NewsError::Network`] | feed, article, image or model transport failures |
//! | [`NewsError::Parse`] | malformed feed XML, unreadable article pages |
//! | [`NewsError::Model`] | the summarization endpoint rejected or botched a request |
//! | [`NewsError::Config`] | invalid configuration or request parameters |
//! | [`NewsError::Io`] | local file system output |

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for NewsError {
    fn from(e: reqwest::Error) -> Self {
        NewsError::Network(e.to_string())
    }
}

impl From<quick_xml::DeError> for NewsError {
    fn from(e: quick_xml::DeError) -> Self {
        NewsError::Parse(e.to_string())
    }
}

impl From<serde_yaml::Error> for NewsError {
    fn from(e: serde_yaml::Error) -> Self {
        NewsError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for NewsError {
    fn from(e: serde_json::Error) -> Self {
        NewsError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;
