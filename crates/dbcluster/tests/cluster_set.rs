mod support;

use dbcluster::{ClusterConfig, ClusterSet, DEFAULT_CLUSTER, Error, PoolOptions};
use std::sync::Arc;
use support::MemConnector;

const CONFIG: &str = r#"{
    "default": {
        "driver": "pg",
        "endpoints": ["pg-primary", "pg-replica-1", "pg-replica-2"],
        "pool": { "max_open_conns": 20, "max_idle_conns": 5, "conn_max_lifetime_ms": 300000 }
    },
    "reporting": {
        "driver": "mysql",
        "endpoints": ["mysql-primary"]
    }
}"#;

#[test]
fn loads_every_named_cluster() {
    let connector = Arc::new(MemConnector::new());
    let set = ClusterSet::from_json(CONFIG, &connector).unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.names().collect::<Vec<_>>(), ["default", "reporting"]);

    let default = set.default_cluster().unwrap();
    assert_eq!(default.len(), 3);
    assert_eq!(default.pool_options().max_open_conns, Some(20));
    assert_eq!(
        default.pool_options().lifetime(),
        Some(std::time::Duration::from_secs(300))
    );
}

#[test]
fn routes_by_cluster_name() {
    let connector = Arc::new(MemConnector::new());
    let set = ClusterSet::from_json(CONFIG, &connector).unwrap();

    let writer = set.master(DEFAULT_CLUSTER).unwrap();
    assert_eq!((writer.driver.as_str(), writer.dsn.as_str()), ("pg", "pg-primary"));

    let reader = set.slave(DEFAULT_CLUSTER).unwrap();
    assert!(reader.dsn.starts_with("pg-replica-"));

    // Single-node cluster: reads land on the master connection.
    let report_writer = set.master("reporting").unwrap();
    let report_reader = set.slave("reporting").unwrap();
    assert!(Arc::ptr_eq(&report_writer, &report_reader));
    assert_eq!(report_reader.driver, "mysql");

    // The shared connector saw one open per endpoint touched.
    assert_eq!(connector.opens("pg-primary"), 1);
    assert_eq!(connector.opens("mysql-primary"), 1);
}

#[test]
fn unknown_name_behaves_like_empty_cluster() {
    let set: ClusterSet<MemConnector> = ClusterSet::new();
    assert!(set.is_empty());
    assert!(set.default_cluster().is_none());
    assert!(matches!(set.master("missing"), Err(Error::NoMaster)));
    assert!(matches!(set.slave("missing"), Err(Error::NoSlave)));
}

#[test]
fn insert_replaces_existing_cluster() {
    let mut set = ClusterSet::new();
    let first = ClusterConfig::new("pg").endpoint("old-primary").build(MemConnector::new());
    let second = ClusterConfig::new("pg")
        .endpoint("new-primary")
        .pool(PoolOptions::new().max_open_conns(4))
        .build(MemConnector::new());

    assert!(set.insert(DEFAULT_CLUSTER, first).is_none());
    let replaced = set.insert(DEFAULT_CLUSTER, second).unwrap();
    assert_eq!(replaced.endpoint(0).unwrap().dsn(), "old-primary");
    assert_eq!(set.master(DEFAULT_CLUSTER).unwrap().dsn, "new-primary");
}

#[test]
fn bad_json_is_rejected() {
    let connector = Arc::new(MemConnector::new());
    let err = ClusterSet::from_json(r#"{ "default": [1, 2] }"#, &connector).unwrap_err();
    assert!(err.is_config_error());
}
