//! Parallel task dispatch

use crossbeam_channel::{bounded, unbounded};

/// Runs `f(task_index)` for every index in `0..n_tasks` on a pool of
/// `n_threads` scoped worker threads. Returns once all tasks are done.
///
/// * `n_tasks`   - Number of tasks.
/// * `n_threads` - Number of worker threads (at least one is used).
/// * `f`         - The task body.
pub fn parallel_for<F>(n_tasks: usize, n_threads: usize, f: F) -> Result<(), String>
where
    F: Fn(usize) + Sync,
{
    let n_threads = n_threads.clamp(1, n_tasks.max(1));

    crossbeam::scope(|scope| {
        let (tx, rx) = bounded(n_threads);

        // Spawn worker threads.
        for _ in 0..n_threads {
            let rxc = rx.clone();
            let f = &f;
            scope.spawn(move |_| {
                for task in rxc.iter() {
                    f(task);
                }
            });
        }
        drop(rx); // Each worker holds its own clone.

        // Send work.
        for task in 0..n_tasks {
            if tx.send(task).is_err() {
                break;
            }
        }
    })
    .map_err(|_| "A worker thread panicked".to_string())
}

/// Evaluates `f(task_index)` for every index in `0..n_tasks` in parallel and
/// returns the results ordered by index.
///
/// * `n_tasks`   - Number of tasks.
/// * `n_threads` - Number of worker threads (at least one is used).
/// * `f`         - The task body.
pub fn parallel_map<T, F>(n_tasks: usize, n_threads: usize, f: F) -> Result<Vec<T>, String>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let (result_tx, result_rx) = unbounded();

    parallel_for(n_tasks, n_threads, |task| {
        let _ = result_tx.send((task, f(task)));
    })?;
    drop(result_tx);

    let mut slots: Vec<Option<T>> = (0..n_tasks).map(|_| None).collect();
    for (task, value) in result_rx.iter() {
        slots[task] = Some(value);
    }
    slots
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or(format!("Task {i} produced no result")))
        .collect()
}

/// Returns one of `n_chunks` contiguous, nearly equal length ranges that
/// partition `0..n`.
///
/// * `n`        - Length of the range.
/// * `n_chunks` - Number of chunks.
/// * `chunk`    - Index of the chunk to return.
pub fn chunk_range(n: usize, n_chunks: usize, chunk: usize) -> std::ops::Range<usize> {
    let n_chunks = n_chunks.max(1);
    let start = chunk * n / n_chunks;
    let end = (chunk + 1) * n / n_chunks;
    start..end
}
