//! dbcluster - read/write-splitting connection routing.
//!
//! A [`Cluster`] holds one master endpoint and any number of replica
//! endpoints. Writes go through [`Cluster::master`], reads through
//! [`Cluster::slave`], which rotates over the replicas. Each endpoint opens
//! its connection lazily, once, through a caller-supplied [`Connector`].
//!
//! # Quick Start
//!
//! ```ignore
//! use dbcluster::prelude::*;
//!
//! let cluster = Cluster::builder(my_connector)
//!     .pool_options(PoolOptions::new().max_open_conns(16))
//!     .endpoint("pg", "postgres://primary/app")
//!     .endpoint("pg", "postgres://replica-1/app")
//!     .build();
//!
//! async fn work(cx: &Cx, cluster: &Cluster<MyConnector>) -> Result<()> {
//!     let writer = cluster.master()?;
//!     writer.execute(cx, "UPDATE counters SET n = n + 1", &[]).await;
//!
//!     let reader = cluster.slave()?;
//!     let rows = reader.query(cx, "SELECT n FROM counters", &[]).await;
//!     Ok(())
//! }
//! ```
//!
//! Failures are never retried or redirected to another endpoint; callers
//! decide their own fallback from the [`Error`] they get back.

pub mod cluster;
pub mod config;
pub mod endpoint;
pub mod set;

pub use cluster::{Cluster, ClusterBuilder};
pub use config::{ClusterConfig, EndpointConfig};
pub use endpoint::{Endpoint, redact_dsn};
pub use set::{ClusterSet, DEFAULT_CLUSTER};

// Re-export the core surface
pub use dbcluster_core::{
    ConfigError, ConnectionError, ConnectionErrorKind, Connector, Cx, Error, Executor, Outcome,
    PoolOptions, QueryError, Result, Row, Value,
};

/// Common imports.
///
/// ```ignore
/// use dbcluster::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Cluster, ClusterBuilder, ClusterConfig, ClusterSet, Connector, Cx, Error, Executor,
        Outcome, PoolOptions, Result, Row, Value,
    };
}
