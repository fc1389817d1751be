//! Bounded worker pool
//!
//! A fixed number of tokio tasks drain one shared queue. Each result is sent
//! back over a channel as soon as it is ready, so the caller receives results
//! in completion order. The pool returns only after every worker has exited.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Runs `task` over every item with at most `workers` concurrent tasks
///
/// Never spawns more workers than there are items. A worker that panics
/// loses the result of the item it was processing; the panic is logged and
/// the remaining workers keep draining the queue.
///
/// Dropping the returned future aborts all workers.
///
/// # Arguments
///
/// * `items` - The work items
/// * `workers` - Maximum number of concurrent tasks (at least 1 is used)
/// * `task` - The async function applied to each item
///
/// # Returns
///
/// One result per completed item, in completion order
pub async fn run_pool<T, R, F, Fut>(items: Vec<T>, workers: usize, task: F) -> Vec<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    if items.is_empty() {
        return Vec::new();
    }

    let total = items.len();
    let workers = workers.clamp(1, total);
    tracing::debug!("Starting {} workers for {} items", workers, total);

    let queue = Arc::new(Mutex::new(VecDeque::from(items)));
    let task = Arc::new(task);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut set = JoinSet::new();
    for worker_id in 0..workers {
        let queue = Arc::clone(&queue);
        let task = Arc::clone(&task);
        let tx = tx.clone();

        set.spawn(async move {
            let mut handled = 0usize;
            loop {
                let next = queue.lock().await.pop_front();
                let Some(item) = next else { break };

                let result = task(item).await;
                handled += 1;
                if tx.send(result).is_err() {
                    break;
                }
            }
            tracing::trace!("Worker {} finished after {} items", worker_id, handled);
        });
    }
    drop(tx);

    // Phase barrier: wait for every worker before handing results back
    while let Some(joined) = set.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Worker task failed: {}", e);
        }
    }

    let mut results = Vec::with_capacity(total);
    while let Some(result) = rx.recv().await {
        results.push(result);
    }
    results
}
