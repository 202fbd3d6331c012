use std::fmt;

#[derive(Debug, Clone)]
pub enum FetchError {
    /// Upstream rejected the credentials (401/403).
    Auth(String),
    /// No record exists for the key (404).
    NotFound(String),
    /// Transport failure or upstream server error.
    Upstream(String),
    /// Response body could not be read as a record.
    Parse(String),
    /// Fetcher misconfiguration (bad base URL, client build failure).
    Config(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth(msg) => write!(f, "auth failed: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Upstream(msg) => write!(f, "upstream error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Config(msg) => write!(f, "fetch config error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}
