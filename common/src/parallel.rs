//! Concurrency-limited parallel mapping.
//!
//! Wraps rayon's `into_par_iter` to process owned items in parallel while
//! limiting the number of items in flight at once (e.g. to cap memory held by
//! per-item buffers).

use rayon::prelude::*;

/// Maps `f` over owned `items` in parallel, with at most `max_concurrent`
/// items in flight.
///
/// Semantically equivalent to `items.into_par_iter().map(f).collect()`: the
/// output order matches the input order and the call returns only after every
/// item has been processed.
///
/// # Panics
///
/// Panics if `max_concurrent` is 0.
pub fn par_map_limited<T, R, F>(items: Vec<T>, max_concurrent: usize, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    assert!(max_concurrent > 0, "max_concurrent must be > 0");

    let mut results = Vec::with_capacity(items.len());
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        let chunk: Vec<T> = items.by_ref().take(max_concurrent).collect();
        let chunk_results: Vec<R> = chunk.into_par_iter().map(&f).collect();
        results.extend(chunk_results);
    }
    results
}
