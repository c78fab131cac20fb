//! Error enum
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Http(reqwest::Error),
    Url(url::ParseError),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    UnknownLang(String),
    /// A dataset could not be opened or stopped streaming (network failure, missing dataset, bad schema).
    SourceUnavailable {
        source: String,
        reason: String,
    },
    /// The hub refused the request for lack of (valid) credentials.
    AuthenticationRequired(String),
    /// A record did not expose the expected text field.
    MalformedRecord(String),
    Custom(String),
}

impl Error {
    pub fn source_unavailable(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::SourceUnavailable {
            source: source.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Serde(e) => write!(f, "json error: {e}"),
            Error::Http(e) => write!(f, "http error: {e}"),
            Error::Url(e) => write!(f, "invalid url: {e}"),
            Error::Glob(e) => write!(f, "glob error: {e}"),
            Error::GlobPattern(e) => write!(f, "invalid glob pattern: {e}"),
            Error::UnknownLang(l) => write!(f, "unknown language: {l}"),
            Error::SourceUnavailable { source, reason } => {
                write!(f, "source {source} unavailable: {reason}")
            }
            Error::AuthenticationRequired(source) => {
                write!(f, "authentication required for {source}")
            }
            Error::MalformedRecord(reason) => write!(f, "malformed record: {reason}"),
            Error::Custom(s) => write!(f, "{s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Http(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
