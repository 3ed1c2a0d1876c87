use std::future::Future;
use tokio::time::{sleep, Duration};

/// Keep a long-running task alive. The task is spawned, and if it panics or
/// returns it is started again after `restart_delay`. Never returns.
pub async fn supervise<F, Fut>(name: &'static str, restart_delay: Duration, task: F)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    loop {
        tracing::info!("Starting task '{}'", name);

        match tokio::spawn(task()).await {
            Ok(()) => tracing::warn!("Task '{}' returned, restarting in {:?}", name, restart_delay),
            Err(e) if e.is_panic() => {
                tracing::error!("Task '{}' panicked, restarting in {:?}", name, restart_delay)
            }
            Err(e) => tracing::error!("Task '{}' failed: {}, restarting in {:?}", name, e, restart_delay),
        }

        sleep(restart_delay).await;
    }
}
