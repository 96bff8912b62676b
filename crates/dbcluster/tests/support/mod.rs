//! In-memory connector that records every open.

#![allow(dead_code)]

use dbcluster::{
    ConnectionError, Connector, Cx, Error, Executor, Outcome, PoolOptions, Row, Value,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct MemConn {
    pub driver: String,
    pub dsn: String,
    pub serial: usize,
    pub statements: Mutex<Vec<String>>,
}

impl Executor for MemConn {
    async fn execute(&self, _cx: &Cx, sql: &str, _params: &[Value]) -> Outcome<u64, Error> {
        self.statements.lock().unwrap().push(sql.to_string());
        Outcome::Ok(1)
    }

    async fn query(&self, _cx: &Cx, sql: &str, params: &[Value]) -> Outcome<Vec<Row>, Error> {
        self.statements.lock().unwrap().push(sql.to_string());
        let mut values = vec![Value::Text(self.dsn.clone())];
        values.extend(params.iter().cloned());
        let columns = (0..values.len())
            .map(|i| if i == 0 { "server".to_string() } else { format!("p{i}") })
            .collect();
        Outcome::Ok(vec![Row::new(columns, values)])
    }
}

#[derive(Default)]
pub struct MemConnector {
    serial: AtomicUsize,
    opens: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
    delay: Option<Duration>,
}

impl MemConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep inside every open, widening the first-use race window.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Make opens of `dsn` fail until `recover` is called.
    pub fn fail(&self, dsn: &str) {
        self.failing.lock().unwrap().insert(dsn.to_string());
    }

    pub fn recover(&self, dsn: &str) {
        self.failing.lock().unwrap().remove(dsn);
    }

    /// Number of open attempts for `dsn`, failed ones included.
    pub fn opens(&self, dsn: &str) -> usize {
        self.opens.lock().unwrap().get(dsn).copied().unwrap_or(0)
    }

    pub fn total_opens(&self) -> usize {
        self.opens.lock().unwrap().values().sum()
    }
}

impl Connector for MemConnector {
    type Conn = MemConn;

    fn connect(
        &self,
        driver: &str,
        dsn: &str,
        _options: &PoolOptions,
    ) -> dbcluster::Result<MemConn> {
        *self.opens.lock().unwrap().entry(dsn.to_string()).or_default() += 1;
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if driver.is_empty() {
            return Err(ConnectionError::unknown_driver(driver).into());
        }
        if self.failing.lock().unwrap().contains(dsn) {
            let reason = format!("dial {dsn}: connection refused");
            return Err(ConnectionError::open(driver, reason).into());
        }
        Ok(MemConn {
            driver: driver.to_string(),
            dsn: dsn.to_string(),
            serial: self.serial.fetch_add(1, Ordering::SeqCst),
            statements: Mutex::new(Vec::new()),
        })
    }
}
