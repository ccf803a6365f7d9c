use crossbeam_channel::unbounded;

use std::{sync::Arc, thread};

/// A simple thread pool implementation that takes a vector of items, splits them into chunks, and
/// processes each chunk in a separate thread. The results are collected and returned.
///
/// Note that the order of the results is not guaranteed to match the order of the input items;
/// callers that need to correlate results with inputs should carry an index through `f`.
///
/// ```
/// use hugin_common::utils::threading::task_pool;
///
/// let items = vec![1, 2, 3, 4, 5];
/// let num_threads = 2;
/// let mut results = task_pool(items, num_threads, |item| item * 2);
///
/// // sort
/// results.sort();
///
/// assert_eq!(results, vec![2, 4, 6, 8, 10]);
/// ```
pub fn task_pool<
    T: Clone + Send + Sync + 'static,
    R: Send + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
>(
    items: Vec<T>,
    num_threads: usize,
    f: F,
) -> Vec<R> {
    // if items is empty, return empty results
    if items.is_empty() {
        return Vec::new();
    }

    let (tx, rx) = unbounded();
    let mut handles = Vec::new();

    // Split items into chunks for each thread to process
    let chunk_size = items.len().div_ceil(num_threads);
    let chunks = items.chunks(chunk_size);

    // Share ownership of f across threads with Arc
    let shared_f = Arc::new(f);

    for chunk in chunks {
        let chunk = chunk.to_owned();
        let tx = tx.clone();
        let shared_f = Arc::clone(&shared_f);
        let handle = thread::spawn(move || {
            let chunk_results: Vec<R> = chunk.into_iter().map(|item| shared_f(item)).collect();
            let _ = tx.send(chunk_results);
        });
        handles.push(handle);
    }

    // drop the original sender so the channel disconnects once every worker
    // is done; there may be fewer chunks than threads
    drop(tx);

    // Wait for all threads to finish and collect the results
    let mut results = Vec::new();
    while let Ok(chunk_results) = rx.recv() {
        results.extend(chunk_results);
    }

    for handle in handles {
        if handle.join().is_ok() {}
    }

    results
}

#[cfg(test)]
mod tests {
    use crate::utils::threading::*;

    #[test]
    fn test_task_pool_with_single_thread() {
        let items = vec![1, 2, 3, 4, 5];
        let num_threads = 1;
        let expected_results = vec![2, 4, 6, 8, 10];

        let f = |x: i32| x * 2;

        let mut results = task_pool(items, num_threads, f);
        results.sort();
        assert_eq!(results, expected_results);
    }

    #[test]
    fn test_task_pool_with_multiple_threads() {
        let items = vec![1, 2, 3, 4, 5];
        let num_threads = 3;
        let expected_results = vec![2, 4, 6, 8, 10];

        let f = |x: i32| x * 2;

        let mut results = task_pool(items, num_threads, f);
        results.sort();
        assert_eq!(results, expected_results);
    }

    #[test]
    fn test_task_pool_with_more_threads_than_items() {
        let items = vec![1, 2];
        let num_threads = 8;

        let mut results = task_pool(items, num_threads, |x: i32| x * 2);
        results.sort();
        assert_eq!(results, vec![2, 4]);
    }

    #[test]
    fn test_task_pool_with_empty_items() {
        let items: Vec<i32> = Vec::new();
        let num_threads = 2;

        let f = |x: i32| x * 2;

        let results = task_pool(items, num_threads, f);
        assert!(results.is_empty());
    }
}
