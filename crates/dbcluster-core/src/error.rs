//! Error types for cluster routing.

use std::fmt;

/// The primary error type for all cluster operations.
#[derive(Debug)]
pub enum Error {
    /// Endpoint configuration is unusable (empty DSN, malformed config)
    Config(ConfigError),
    /// The connector failed to open a connection
    Connection(ConnectionError),
    /// `master()` was called on a cluster with no endpoints
    NoMaster,
    /// `slave()` was called on a cluster with no endpoints
    NoSlave,
    /// Statement or query failed on an executor
    Query(QueryError),
    /// Operation was cancelled via asupersync
    Cancelled,
    /// Serialization/deserialization errors
    Serde(String),
    /// Custom error with message
    Custom(String),
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    /// Driver identifier the open was attempted with
    pub driver: String,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// The connector rejected or failed the open call
    Open,
    /// No connector is registered for the driver identifier
    UnknownDriver,
}

#[derive(Debug)]
pub struct QueryError {
    pub sql: Option<String>,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl ConnectionError {
    /// An open failure reported by the connector, keeping its error as the source.
    pub fn open(
        driver: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let source = source.into();
        Self {
            kind: ConnectionErrorKind::Open,
            driver: driver.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn unknown_driver(driver: impl Into<String>) -> Self {
        let driver = driver.into();
        Self {
            kind: ConnectionErrorKind::UnknownDriver,
            message: format!("unknown driver '{driver}'"),
            driver,
            source: None,
        }
    }
}

impl Error {
    /// Empty-DSN style error for an endpoint.
    pub fn empty_dsn() -> Self {
        Error::Config(ConfigError::new("DSN should not be empty"))
    }

    /// Did the call fail because the cluster has no endpoints at all?
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Error::NoMaster | Error::NoSlave)
    }

    /// Did the call fail while opening a connection to a configured endpoint?
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Did the call fail because of bad input?
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Serde(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Connection(e) => write!(f, "Connection error ({}): {}", e.driver, e.message),
            Error::NoMaster => write!(f, "No master endpoint configured"),
            Error::NoSlave => write!(f, "No slave endpoint configured"),
            Error::Query(e) => write!(f, "Query error: {}", e.message),
            Error::Cancelled => write!(f, "Operation cancelled"),
            Error::Serde(msg) => write!(f, "Serialization error: {}", msg),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source = match self {
            Error::Config(e) => e.source.as_deref(),
            Error::Connection(e) => e.source.as_deref(),
            Error::Query(e) => e.source.as_deref(),
            _ => None,
        };
        source.map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Connection(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::Query(err)
    }
}

/// Result type alias for cluster operations.
pub type Result<T> = std::result::Result<T, Error>;
