//! Bounded-concurrency fan-out.

use std::future::Future;

use futures_util::StreamExt;
use futures_util::stream;

/// Run `f` over `items` with at most `limit` futures in flight.
///
/// Results come back in input order regardless of completion order. A `limit`
/// of zero is treated as one.
pub async fn map_limit<T, R, F, Fut>(items: Vec<T>, limit: usize, f: F) -> Vec<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(f)
        .buffered(limit.max(1))
        .collect()
        .await
}
