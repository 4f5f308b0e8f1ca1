//! Bulk Operation Helper
//!
//! Fans a collection out to concurrent per-item calls and waits for all of them

use std::future::Future;

use futures::future::join_all;
use futures::stream::{self, StreamExt};

/// Run `op` over every item concurrently and collect every result
///
/// All futures are polled on the caller's task. With `limit = None` every call
/// is in flight at once; `Some(n)` keeps at most `n` outstanding. Resolves only
/// once every call has completed. Result order is unspecified.
///
/// # Arguments
/// - `items`: Inputs to fan out over
/// - `limit`: Optional cap on in-flight calls (`Some(0)` is treated as 1)
/// - `op`: Per-item operation; it must not fail, failures belong in `T`
pub async fn run_all<I, F, Fut>(items: I, limit: Option<usize>, op: F) -> Vec<Fut::Output>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future,
{
    match limit {
        None => join_all(items.into_iter().map(op)).await,
        Some(limit) => {
            stream::iter(items)
                .map(op)
                .buffer_unordered(limit.max(1))
                .collect()
                .await
        }
    }
}
