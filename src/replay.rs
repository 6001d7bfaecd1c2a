//! Replay Module
//!
//! Reads the call history recorded by [`CallAccounting`](crate::accounting::CallAccounting)
//! and renders it for inspection.

use std::fmt;

use serde::Serialize;

use crate::accounting::{inputs_key, outputs_key};
use crate::error::Result;
use crate::store::{KeyValueStore, StoreValue};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayEntry {
    pub input: String,
    pub output: String,
}

/// Recorded history of one operation identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replay {
    pub identity: String,
    /// Number of recorded inputs
    pub calls: usize,
    /// Inputs paired with outputs by position
    pub entries: Vec<ReplayEntry>,
}

impl Replay {
    /// Summary line followed by one line per recorded call.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 1);
        lines.push(format!("{} was called {} times:", self.identity, self.calls));
        lines.extend(
            self.entries
                .iter()
                .map(|entry| format!("{}(*{}) -> {}", self.identity, entry.input, entry.output)),
        );
        lines
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

// == Replay ==
/// Loads the history of `identity`.
///
/// Inputs and outputs are paired positionally. If a failed call left an
/// input without an output the lists differ in length; pairing stops at the
/// shorter one and the rest is ignored.
pub async fn replay(store: &dyn KeyValueStore, identity: &str) -> Result<Replay> {
    let inputs = read_list(store, &inputs_key(identity)).await?;
    let outputs = read_list(store, &outputs_key(identity)).await?;

    let calls = inputs.len();
    let entries = inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| ReplayEntry { input, output })
        .collect();

    Ok(Replay {
        identity: identity.to_string(),
        calls,
        entries,
    })
}

async fn read_list(store: &dyn KeyValueStore, key: &str) -> Result<Vec<String>> {
    store
        .lrange(key, 0, -1)
        .await?
        .iter()
        .map(|bytes| String::decode(key, bytes))
        .collect()
}
