//! Fixed-point resolution of forward references
//!
//! Items that could not be resolved when first seen are retried in whole
//! passes until the pending set is empty or a pass resolves nothing.

use anyhow::Result;
use std::future::Future;

/// Outcome of [`resolve_pending`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<T> {
    /// Items resolved, in the order they were resolved
    pub resolved: Vec<T>,
    /// Items still pending when progress stopped, in input order
    pub unresolved: Vec<T>,
    /// Number of passes run (0 when nothing was pending)
    pub passes: usize,
}

impl<T> Resolution<T> {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Retry `attempt` over `pending` until it is empty or a full pass makes no progress.
///
/// `attempt` returns `Ok(true)` once an item is resolved. An `Err` aborts the
/// whole routine. Terminates after at most `pending.len() + 1` passes.
pub async fn resolve_pending<T, F, Fut>(pending: Vec<T>, mut attempt: F) -> Result<Resolution<T>>
where
    T: Clone,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let mut pending = pending;
    let mut resolved = Vec::new();
    let mut passes = 0;

    while !pending.is_empty() {
        passes += 1;
        let before = pending.len();
        let mut still_pending = Vec::with_capacity(before);

        for item in pending {
            if attempt(item.clone()).await? {
                resolved.push(item);
            } else {
                still_pending.push(item);
            }
        }

        pending = still_pending;
        tracing::debug!(
            "Resolution pass {}: {} resolved, {} pending",
            passes,
            before - pending.len(),
            pending.len()
        );

        if pending.len() == before {
            break;
        }
    }

    Ok(Resolution {
        resolved,
        unresolved: pending,
        passes,
    })
}
