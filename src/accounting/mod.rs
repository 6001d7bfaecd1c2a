//! Call Accounting Module
//!
//! Counts invocations of an operation and, optionally, records every call's
//! input and output in the store.
//!
//! Keys written for an identity `id`:
//! - `id` - invocation counter
//! - `id:inputs` - `Debug` rendering of each call's arguments
//! - `id:outputs` - `Display` rendering of each successful result

use std::fmt::{Debug, Display};
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::store::{get_as, KeyValueStore};


/// List key holding recorded inputs for `identity`.
pub fn inputs_key(identity: &str) -> String {
    format!("{}:inputs", identity)
}

/// List key holding recorded outputs for `identity`.
pub fn outputs_key(identity: &str) -> String {
    format!("{}:outputs", identity)
}

// == Call Accounting ==
/// Accounting policy for one operation identity.
#[derive(Clone)]
pub struct CallAccounting {
    store: Arc<dyn KeyValueStore>,
    identity: String,
    history: bool,
}

impl CallAccounting {
    /// Counts calls under `identity`; history recording starts disabled.
    ///
    /// `identity` must be unique per operation and is the name `replay` reads.
    pub fn new(store: Arc<dyn KeyValueStore>, identity: impl Into<String>) -> Self {
        Self {
            store,
            identity: identity.into(),
            history: false,
        }
    }

    /// Turns input/output history recording on or off.
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.history = enabled;
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn records_history(&self) -> bool {
        self.history
    }

    /// Binds an operation to this policy.
    pub fn wrap<F>(self, op: F) -> Accounted<F> {
        Accounted {
            accounting: self,
            op,
        }
    }

    // == Count ==
    /// Number of calls recorded for this identity, zero if none.
    pub async fn count(&self) -> Result<i64> {
        Ok(get_as::<i64>(self.store.as_ref(), &self.identity)
            .await?
            .unwrap_or(0))
    }

    // == Invoke ==
    /// Runs `op(args)` under accounting and returns its result unchanged.
    ///
    /// The counter and the input record are written before `op` runs. When
    /// `op` fails its error is returned as is and no output is recorded, so
    /// the input list can end up longer than the output list.
    pub async fn invoke<A, R, F, Fut>(&self, args: A, op: F) -> Result<R>
    where
        A: Debug,
        R: Display,
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let calls = self.store.incr(&self.identity).await?;
        debug!(identity = %self.identity, calls, "accounted call");

        if self.history {
            let input = format!("{:?}", args);
            self.store
                .rpush(&inputs_key(&self.identity), input.into_bytes())
                .await?;
        }

        let result = match op(args).await {
            Ok(result) => result,
            Err(e) => {
                warn!(identity = %self.identity, error = %e, "accounted operation failed");
                return Err(e);
            }
        };

        if self.history {
            self.store
                .rpush(&outputs_key(&self.identity), result.to_string().into_bytes())
                .await?;
        }

        Ok(result)
    }
}

// == Accounted ==
/// An operation bound to a [`CallAccounting`] policy.
///
/// Calling it has the same signature and result as the bare operation.
pub struct Accounted<F> {
    accounting: CallAccounting,
    op: F,
}

impl<F> Accounted<F> {
    /// Invokes the wrapped operation with accounting.
    pub async fn call<A, R, Fut>(&self, args: A) -> Result<R>
    where
        A: Debug,
        R: Display,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        self.accounting.invoke(args, &self.op).await
    }

    pub fn accounting(&self) -> &CallAccounting {
        &self.accounting
    }
}
