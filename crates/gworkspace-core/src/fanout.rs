//! Fan-out Aggregator
//!
//! Issues one detail fetch per enumerated reference, all concurrently on the
//! current task, and joins them in enumeration order. The first failure fails
//! the whole batch; no partial list is returned.

use std::future::Future;

use futures::future::try_join_all;
use tracing::debug;

use crate::common::{AppError, AppResult};

/// Fetch details for every item concurrently.
///
/// `key` names an item in the aggregation error when its fetch fails.
pub async fn fan_out<T, R, K, F, Fut>(items: Vec<T>, key: K, fetch: F) -> AppResult<Vec<R>>
where
    K: Fn(&T) -> String,
    F: Fn(T) -> Fut,
    Fut: Future<Output = AppResult<R>>,
{
    debug!("Fanning out {} detail fetches", items.len());

    let fetches = items.into_iter().map(|item| {
        let name = key(&item);
        let pending = fetch(item);
        async move { pending.await.map_err(|e| AppError::aggregation(name, e)) }
    });

    try_join_all(fetches).await
}
