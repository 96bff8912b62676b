//! Named clusters.

use crate::cluster::Cluster;
use crate::config::ClusterConfig;
use dbcluster_core::{Connector, Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Name of the cluster used when callers do not pick one.
pub const DEFAULT_CLUSTER: &str = "default";

/// A registry of clusters keyed by name.
///
/// Looking up an unknown name behaves like an empty cluster: `master` fails
/// with [`Error::NoMaster`] and `slave` with [`Error::NoSlave`].
pub struct ClusterSet<C: Connector> {
    clusters: BTreeMap<String, Cluster<C>>,
}

impl<C: Connector> ClusterSet<C> {
    pub fn new() -> Self {
        Self {
            clusters: BTreeMap::new(),
        }
    }

    /// Register `cluster` under `name`, returning any cluster it replaces.
    pub fn insert(&mut self, name: impl Into<String>, cluster: Cluster<C>) -> Option<Cluster<C>> {
        self.clusters.insert(name.into(), cluster)
    }

    pub fn get(&self, name: &str) -> Option<&Cluster<C>> {
        self.clusters.get(name)
    }

    /// The cluster registered as [`DEFAULT_CLUSTER`].
    pub fn default_cluster(&self) -> Option<&Cluster<C>> {
        self.get(DEFAULT_CLUSTER)
    }

    /// Master connection of the named cluster.
    pub fn master(&self, name: &str) -> Result<Arc<C::Conn>> {
        self.get(name).ok_or(Error::NoMaster)?.master()
    }

    /// Next replica connection of the named cluster.
    pub fn slave(&self, name: &str) -> Result<Arc<C::Conn>> {
        self.get(name).ok_or(Error::NoSlave)?.slave()
    }

    /// Cluster names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clusters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

impl<C: Connector + Clone> ClusterSet<C> {
    /// Build one cluster per config entry, all sharing `connector`.
    pub fn from_configs(configs: &BTreeMap<String, ClusterConfig>, connector: &C) -> Self {
        let clusters = configs
            .iter()
            .map(|(name, config)| (name.clone(), config.build(connector.clone())))
            .collect();
        Self { clusters }
    }

    /// Parse `{ "<name>": <cluster config>, ... }` and build every cluster.
    pub fn from_json(json: &str, connector: &C) -> Result<Self> {
        let configs: BTreeMap<String, ClusterConfig> =
            serde_json::from_str(json).map_err(|e| Error::Serde(e.to_string()))?;
        tracing::debug!(clusters = configs.len(), "Loaded cluster configuration");
        Ok(Self::from_configs(&configs, connector))
    }
}

impl<C: Connector> Default for ClusterSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> fmt::Debug for ClusterSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.clusters.iter()).finish()
    }
}
