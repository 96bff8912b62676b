//! Serializable cluster configuration.
//!
//! A cluster is described by an ordered endpoint list whose first entry is
//! the master:
//!
//! ```json
//! {
//!   "driver": "pg",
//!   "endpoints": [
//!     "postgres://primary/app",
//!     "postgres://replica-1/app",
//!     { "driver": "pg", "dsn": "postgres://replica-2/app" }
//!   ],
//!   "pool": { "max_open_conns": 16, "conn_max_lifetime_ms": 60000 }
//! }
//! ```
//!
//! Endpoints may be bare DSN strings (using the cluster-level driver) or
//! objects that override it. Only the JSON shape is checked here; DSN
//! emptiness is reported when the endpoint first connects.

use crate::cluster::Cluster;
use dbcluster_core::{Connector, Error, PoolOptions, Result};
use serde::{Deserialize, Serialize};

/// Configuration for one cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Driver used by endpoints that do not name their own
    pub driver: Option<String>,
    /// Endpoints in order; the first is the master
    pub endpoints: Vec<EndpointConfig>,
    /// Pool tuning forwarded to the connector
    pub pool: PoolOptions,
}

/// Configuration for one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EndpointRepr")]
pub struct EndpointConfig {
    pub driver: Option<String>,
    pub dsn: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EndpointRepr {
    Dsn(String),
    Full {
        #[serde(default)]
        driver: Option<String>,
        #[serde(default)]
        dsn: String,
    },
}

impl From<EndpointRepr> for EndpointConfig {
    fn from(repr: EndpointRepr) -> Self {
        match repr {
            EndpointRepr::Dsn(dsn) => Self { driver: None, dsn },
            EndpointRepr::Full { driver, dsn } => Self { driver, dsn },
        }
    }
}

impl EndpointConfig {
    pub fn new(driver: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            driver: Some(driver.into()),
            dsn: dsn.into(),
        }
    }
}

impl ClusterConfig {
    /// Create a config where every endpoint uses `driver`.
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: Some(driver.into()),
            ..Default::default()
        }
    }

    /// Append an endpoint DSN using the cluster driver.
    pub fn endpoint(mut self, dsn: impl Into<String>) -> Self {
        self.endpoints.push(EndpointConfig {
            driver: None,
            dsn: dsn.into(),
        });
        self
    }

    /// Set the pool options.
    pub fn pool(mut self, options: PoolOptions) -> Self {
        self.pool = options;
        self
    }

    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serde(e.to_string()))
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serde(e.to_string()))
    }

    /// Resolved `(driver, dsn)` pairs in configuration order.
    ///
    /// An endpoint with no driver of its own and no cluster driver resolves to
    /// an empty driver name, which the connector is expected to reject.
    pub fn resolved_endpoints(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.endpoints.iter().map(|ep| {
            let driver = ep
                .driver
                .as_deref()
                .or(self.driver.as_deref())
                .unwrap_or_default();
            (driver.to_string(), ep.dsn.clone())
        })
    }

    /// Build a cluster that opens connections through `connector`.
    pub fn build<C: Connector>(&self, connector: C) -> Cluster<C> {
        Cluster::with_options(connector, self.pool.clone(), self.resolved_endpoints())
    }
}
