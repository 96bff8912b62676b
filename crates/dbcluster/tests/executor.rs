mod support;

use asupersync::runtime::RuntimeBuilder;
use dbcluster::{Cluster, Cx, Error, Executor, Outcome, Value};
use support::MemConnector;

fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

#[test]
fn writes_reach_master_and_reads_reach_replica() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();
    let cluster = Cluster::new(
        MemConnector::new(),
        [("pg", "dsn-master"), ("pg", "dsn-r1")],
    );

    rt.block_on(async {
        let writer = cluster.master().unwrap();
        let affected = unwrap_outcome(
            writer
                .execute(&cx, "INSERT INTO t (v) VALUES ($1)", &[Value::from(1_i64)])
                .await,
        );
        assert_eq!(affected, 1);

        let reader = cluster.slave().unwrap();
        let rows = unwrap_outcome(
            reader
                .query(&cx, "SELECT v FROM t WHERE v = $1", &[Value::from(1_i64)])
                .await,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_by_name("server").and_then(Value::as_str), Some("dsn-r1"));
        assert_eq!(rows[0].get(1), Some(&Value::BigInt(1)));

        assert_eq!(
            writer.statements.lock().unwrap().as_slice(),
            ["INSERT INTO t (v) VALUES ($1)"]
        );
        assert_eq!(
            reader.statements.lock().unwrap().as_slice(),
            ["SELECT v FROM t WHERE v = $1"]
        );
    });
}
