//! Connection capabilities the router depends on.
//!
//! - [`Connector`] - opens a connection from a driver identifier and a DSN
//! - [`Executor`] - runs statements and queries against an open connection
//! - [`PoolOptions`] - pool tuning handed to the connector at open time
//!
//! Both traits are implemented outside this workspace by the SQL layer; the
//! router only opens, caches, and hands out connections.

use crate::error::Result;
use crate::row::Row;
use crate::value::Value;
use asupersync::{Cx, Outcome};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Opens database connections.
///
/// `connect` is called at most once per endpoint for every successful open.
/// Implementations should report malformed DSNs, unknown drivers, and eager
/// reachability failures through [`ConnectionError::open`](crate::ConnectionError::open)
/// or any other [`Error`](crate::Error); the router passes the error through
/// unchanged.
pub trait Connector: Send + Sync {
    /// The connection handle produced by this connector.
    type Conn: Executor;

    /// Open a connection for `driver` using `dsn`, applying `options`.
    fn connect(&self, driver: &str, dsn: &str, options: &PoolOptions) -> Result<Self::Conn>;
}

impl<T: Connector + ?Sized> Connector for std::sync::Arc<T> {
    type Conn = T::Conn;

    fn connect(&self, driver: &str, dsn: &str, options: &PoolOptions) -> Result<Self::Conn> {
        (**self).connect(driver, dsn, options)
    }
}

/// A connection capable of executing statements.
///
/// All operations are async and take a `Cx` context for cancellation/timeout
/// support. Implementations must be `Send + Sync` because the router shares
/// one handle between every caller of the same endpoint.
///
/// # Example
///
/// ```rust,ignore
/// let writer = cluster.master()?;
/// writer.execute(&cx, "INSERT INTO logs (msg) VALUES ($1)", &[Value::from("hi")]).await;
///
/// let reader = cluster.slave()?;
/// let rows = reader.query(&cx, "SELECT * FROM logs", &[]).await;
/// ```
pub trait Executor: Send + Sync {
    /// Execute a statement (INSERT, UPDATE, DELETE) and return rows affected.
    fn execute(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, crate::Error>> + Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, crate::Error>> + Send;
}

/// Pool tuning applied by the SQL layer when a connection is opened.
///
/// `None` leaves the driver's own default in place. The router never reads
/// these values; it forwards them to [`Connector::connect`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolOptions {
    /// Maximum lifetime of a pooled connection in milliseconds
    pub conn_max_lifetime_ms: Option<u64>,
    /// Maximum number of idle connections kept by the pool
    pub max_idle_conns: Option<u32>,
    /// Maximum number of open connections
    pub max_open_conns: Option<u32>,
}

impl PoolOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum connection lifetime.
    pub fn conn_max_lifetime(mut self, lifetime: Duration) -> Self {
        self.conn_max_lifetime_ms = Some(u64::try_from(lifetime.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Set the maximum number of idle connections.
    pub fn max_idle_conns(mut self, n: u32) -> Self {
        self.max_idle_conns = Some(n);
        self
    }

    /// Set the maximum number of open connections.
    pub fn max_open_conns(mut self, n: u32) -> Self {
        self.max_open_conns = Some(n);
        self
    }

    /// The configured lifetime, if any.
    pub fn lifetime(&self) -> Option<Duration> {
        self.conn_max_lifetime_ms.map(Duration::from_millis)
    }
}
