//! Core types and traits for dbcluster.
//!
//! This crate provides the abstractions the router is built against:
//!
//! - `Connector` trait for opening connections from a driver and DSN
//! - `Executor` trait for the connections handed back to callers
//! - `PoolOptions` forwarded to the connector at open time
//! - `Error` taxonomy shared by every dbcluster crate
//! - `Outcome` and `Cx` re-exported from asupersync

pub use asupersync::{Cx, Outcome};

pub mod connection;
pub mod error;
pub mod row;
pub mod value;

pub use connection::{Connector, Executor, PoolOptions};
pub use error::{ConfigError, ConnectionError, ConnectionErrorKind, Error, QueryError, Result};
pub use row::Row;
pub use value::Value;
