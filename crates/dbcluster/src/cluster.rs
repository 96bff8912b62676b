//! Master/replica routing over an ordered set of endpoints.
//!
//! Endpoint 0 is the master. [`Cluster::master`] always targets it;
//! [`Cluster::slave`] rotates over endpoints `1..len` and falls back to the
//! master when no replica is configured.

use crate::endpoint::{Endpoint, redact_dsn};
use dbcluster_core::{Connector, Error, PoolOptions, Result};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A read/write-splitting router for one primary and its replicas.
///
/// The endpoint list is fixed at construction. Each endpoint connects lazily
/// on first use and keeps that connection; the only other mutable state is
/// the replica rotation counter.
///
/// # Example
///
/// ```rust,ignore
/// let cluster = Cluster::builder(connector)
///     .endpoint("pg", "postgres://primary/app")
///     .endpoint("pg", "postgres://replica-1/app")
///     .endpoint("pg", "postgres://replica-2/app")
///     .build();
///
/// let writer = cluster.master()?;
/// let reader = cluster.slave()?;
/// ```
pub struct Cluster<C: Connector> {
    connector: C,
    options: PoolOptions,
    endpoints: Vec<Endpoint<C::Conn>>,
    counter: AtomicU64,
}

impl<C: Connector> Cluster<C> {
    /// Create a cluster from `(driver, dsn)` pairs. The first pair is the master.
    pub fn new<I, D, S>(connector: C, endpoints: I) -> Self
    where
        I: IntoIterator<Item = (D, S)>,
        D: Into<String>,
        S: Into<String>,
    {
        Self::with_options(connector, PoolOptions::default(), endpoints)
    }

    /// Like [`new`](Cluster::new), forwarding `options` to every open.
    pub fn with_options<I, D, S>(connector: C, options: PoolOptions, endpoints: I) -> Self
    where
        I: IntoIterator<Item = (D, S)>,
        D: Into<String>,
        S: Into<String>,
    {
        Self {
            connector,
            options,
            endpoints: endpoints
                .into_iter()
                .map(|(driver, dsn)| Endpoint::new(driver, dsn))
                .collect(),
            counter: AtomicU64::new(0),
        }
    }

    /// Start a builder that appends endpoints in call order.
    pub fn builder(connector: C) -> ClusterBuilder<C> {
        ClusterBuilder::new(connector)
    }

    /// Connection to the master (endpoint 0), for writes.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn master(&self) -> Result<Arc<C::Conn>> {
        let endpoint = self.endpoints.first().ok_or(Error::NoMaster)?;
        tracing::debug!(
            driver = %endpoint.driver(),
            dsn = %redact_dsn(endpoint.dsn()),
            "db: [master]"
        );
        endpoint.connect(&self.connector, &self.options)
    }

    /// Connection to the next replica in rotation, for reads.
    ///
    /// With no replicas configured this returns the master's connection.
    /// A failed open is returned as-is; no other endpoint is tried.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn slave(&self) -> Result<Arc<C::Conn>> {
        let index = self.next_slave_index().ok_or(Error::NoSlave)?;
        let endpoint = &self.endpoints[index];
        tracing::debug!(
            index,
            driver = %endpoint.driver(),
            dsn = %redact_dsn(endpoint.dsn()),
            "db: [slave]"
        );
        endpoint.connect(&self.connector, &self.options)
    }

    /// Advance the rotation and return the endpoint index `slave()` would use.
    ///
    /// Returns `None` for an empty cluster without touching the counter.
    pub fn next_slave_index(&self) -> Option<usize> {
        if self.endpoints.is_empty() {
            return None;
        }
        let replicas = (self.endpoints.len() - 1) as u64;
        let v = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        if replicas == 0 {
            return Some(0);
        }
        Some((v % replicas) as usize + 1)
    }

    /// Number of configured endpoints, master included.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Number of replicas taking part in the `slave()` rotation.
    pub fn replica_count(&self) -> usize {
        self.endpoints.len().saturating_sub(1)
    }

    pub fn endpoint(&self, index: usize) -> Option<&Endpoint<C::Conn>> {
        self.endpoints.get(index)
    }

    pub fn endpoints(&self) -> &[Endpoint<C::Conn>] {
        &self.endpoints
    }

    /// Options forwarded to the connector on every open.
    pub fn pool_options(&self) -> &PoolOptions {
        &self.options
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}

impl<C: Connector> fmt::Debug for Cluster<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cluster")
            .field("endpoints", &self.endpoints)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Builds a [`Cluster`] one endpoint at a time.
///
/// The first endpoint added becomes the master.
pub struct ClusterBuilder<C: Connector> {
    connector: C,
    options: PoolOptions,
    endpoints: Vec<(String, String)>,
}

impl<C: Connector> ClusterBuilder<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            options: PoolOptions::default(),
            endpoints: Vec::new(),
        }
    }

    /// Append an endpoint.
    pub fn endpoint(mut self, driver: impl Into<String>, dsn: impl Into<String>) -> Self {
        self.add_endpoint(driver, dsn);
        self
    }

    /// Append an endpoint in place.
    pub fn add_endpoint(&mut self, driver: impl Into<String>, dsn: impl Into<String>) -> &mut Self {
        self.endpoints.push((driver.into(), dsn.into()));
        self
    }

    /// Set the pool options forwarded to the connector.
    pub fn pool_options(mut self, options: PoolOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Cluster<C> {
        Cluster::with_options(self.connector, self.options, self.endpoints)
    }
}
