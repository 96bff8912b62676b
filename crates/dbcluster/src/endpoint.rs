//! A single database server and its lazily opened connection.

use dbcluster_core::{Connector, Error, Executor, PoolOptions, Result};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

/// One configured database server.
///
/// The driver and DSN are fixed at construction. The connection is opened on
/// the first successful [`connect`](Endpoint::connect) and reused for the
/// endpoint's lifetime; a failed open leaves the slot empty so the next call
/// retries.
pub struct Endpoint<E> {
    driver: String,
    dsn: String,
    // Held across the open call: concurrent first use opens exactly once.
    conn: Mutex<Option<Arc<E>>>,
}

impl<E: Executor> Endpoint<E> {
    /// Create an unconnected endpoint. The DSN is validated at connect time.
    pub fn new(driver: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            dsn: dsn.into(),
            conn: Mutex::new(None),
        }
    }

    /// The driver identifier this endpoint opens with.
    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// The raw connection string.
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Whether a connection has been established.
    pub fn is_connected(&self) -> bool {
        self.slot().is_some()
    }

    /// Return the cached connection, opening it through `connector` first if needed.
    ///
    /// An empty DSN fails with [`Error::Config`] without calling the connector.
    /// Open failures are returned exactly as the connector reported them.
    pub fn connect<C>(&self, connector: &C, options: &PoolOptions) -> Result<Arc<E>>
    where
        C: Connector<Conn = E> + ?Sized,
    {
        if self.dsn.is_empty() {
            return Err(Error::empty_dsn());
        }

        let mut slot = self.slot();
        if let Some(conn) = slot.as_ref() {
            return Ok(Arc::clone(conn));
        }

        let conn = Arc::new(connector.connect(&self.driver, &self.dsn, options)?);
        tracing::debug!(
            driver = %self.driver,
            dsn = %redact_dsn(&self.dsn),
            "Opened endpoint connection"
        );
        *slot = Some(Arc::clone(&conn));
        Ok(conn)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Arc<E>>> {
        // The slot only ever holds None or a fully opened handle.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> fmt::Debug for Endpoint<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connected = match self.conn.try_lock() {
            Ok(slot) => slot.is_some(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
            // Held while an open is in flight; nothing is stored yet.
            Err(TryLockError::WouldBlock) => false,
        };
        f.debug_struct("Endpoint")
            .field("driver", &self.driver)
            .field("dsn", &redact_dsn(&self.dsn))
            .field("connected", &connected)
            .finish()
    }
}

/// Mask credentials in a connection string for logs and debug output.
///
/// Handles URL style (`postgres://user:pw@host/db?password=pw`), Go-MySQL
/// style (`user:pw@tcp(host)/db`), and key/value style (`host=h password=pw`,
/// `Server=h;Password=pw`).
pub fn redact_dsn(dsn: &str) -> String {
    let (scheme, rest) = match dsn.find("://") {
        Some(i) => dsn.split_at(i + 3),
        None => ("", dsn),
    };

    // Userinfo can only sit in the authority, before any path, query or pair.
    let authority_end = rest
        .find(|c: char| c == '/' || c == '?' || c.is_whitespace())
        .unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    if !authority.contains('=') {
        if let Some(at) = authority.rfind('@') {
            return format!("{scheme}***@{}", mask_passwords(&rest[at + 1..]));
        }
    }

    format!("{scheme}{}", mask_passwords(rest))
}

/// Replace every `password=<value>` value, keeping the key as written.
fn mask_passwords(s: &str) -> String {
    const KEY: &str = "password=";

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = find_password_key(rest) {
        let value_start = pos + KEY.len();
        out.push_str(&rest[..value_start]);
        out.push_str("***");
        let tail = &rest[value_start..];
        let end = tail
            .find(|c: char| c == '&' || c == ';' || c.is_whitespace())
            .unwrap_or(tail.len());
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

fn find_password_key(s: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets valid for `s`.
    let lower = s.to_ascii_lowercase();
    let mut from = 0;
    while let Some(i) = lower[from..].find("password=") {
        let at = from + i;
        let starts_pair = at == 0
            || matches!(lower.as_bytes()[at - 1], b'?' | b'&' | b';')
            || lower.as_bytes()[at - 1].is_ascii_whitespace();
        if starts_pair {
            return Some(at);
        }
        from = at + 1;
    }
    None
}
