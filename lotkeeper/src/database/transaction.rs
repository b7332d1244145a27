//! Time-bounded write transactions.
//!
//! Every lifecycle operation runs inside one `BEGIN IMMEDIATE` transaction so
//! that its reads and its conditional writes see a single snapshot and
//! commit together. The whole transaction, including time spent waiting for
//! the write lock, must finish within a wall-clock budget; otherwise it is
//! rolled back and reported as [`Error::TransactionTimeout`].

use std::time::{Duration, Instant};

use rusqlite::{Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::connection::Database;

fn timeout_error(budget: Duration) -> Error {
    Error::TransactionTimeout {
        millis: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
    }
}

impl Database {
    /// Runs `f` inside an immediate transaction bounded by `budget`.
    ///
    /// The transaction commits only if `f` succeeds and the budget has not
    /// elapsed. Any error from `f` rolls everything back and is returned
    /// unchanged, except lock contention which surfaces as a timeout.
    ///
    /// Waiting for the write lock is capped by the smaller of `budget` and
    /// the connection's busy timeout; a timeout caused by lock contention
    /// reports that cap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionTimeout`] when the write lock cannot be
    /// taken in time or the work overruns the budget, otherwise whatever `f`
    /// or the commit fails with.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use lotkeeper::database::Database;
    ///
    /// let mut db = Database::open_in_memory().unwrap();
    /// let count: i64 = db
    ///     .with_transaction(Duration::from_secs(10), |tx| {
    ///         Ok(tx.query_row("SELECT COUNT(*) FROM slots", [], |row| row.get(0))?)
    ///     })
    ///     .unwrap();
    /// assert_eq!(count, 0);
    /// ```
    pub fn with_transaction<T, F>(&mut self, budget: Duration, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let started = Instant::now();
        let lock_wait = budget.min(self.config().busy_timeout);
        let restore = self.config().busy_timeout;

        self.conn.busy_timeout(lock_wait)?;
        let result = self.run_bounded(started, budget, f);
        self.conn.busy_timeout(restore)?;

        result.map_err(|e| {
            if e.is_lock_contention() {
                log::warn!("write lock not acquired within {lock_wait:?}");
                timeout_error(lock_wait)
            } else {
                e
            }
        })
    }

    fn run_bounded<T, F>(&mut self, started: Instant, budget: Duration, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Dropping `tx` without commit rolls back.
        let value = f(&tx)?;

        if started.elapsed() > budget {
            tx.rollback()?;
            log::warn!("transaction overran its {budget:?} budget and was rolled back");
            return Err(timeout_error(budget));
        }

        tx.commit()?;
        Ok(value)
    }
}
