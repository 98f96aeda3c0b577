//! Request Context
//!
//! Context carried explicitly from the handler through the service into
//! the store. Holds the request id, the database handle and an optional
//! deadline. The deadline bounds waiting for a connection; a statement that
//! has already been sent always runs to completion.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::store::Database;

/// Context carried through one request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for tracing
    pub request_id: Uuid,

    db: Option<Database>,

    deadline: Option<Instant>,

    started_at: Instant,
}

/// The context deadline passed before the work finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineExceeded;

impl RequestContext {
    /// Create a context bound to a database
    pub fn new(db: Database) -> Self {
        Self {
            db: Some(db),
            ..Self::detached()
        }
    }

    /// Create a context with no database handle (in-memory stores, tests)
    pub fn detached() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            db: None,
            deadline: None,
            started_at: Instant::now(),
        }
    }

    /// Bound the request to `timeout` from now
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Database handle, if the request carries one
    pub fn db(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    /// True once the deadline, if any, has passed
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    /// Drive `fut` to completion unless the deadline passes first.
    ///
    /// On expiry the future is dropped. Only hand this futures that are
    /// safe to cancel, such as waiting for a pooled connection.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| DeadlineExceeded),
            None => Ok(fut.await),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::detached()
    }
}
