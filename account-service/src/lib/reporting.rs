use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::user::ports::UserServicePort;

/// Spawn a task that logs the number of stored users every `interval`.
///
/// The task exits once `shutdown` flips to `true` or its sender is dropped.
pub fn spawn_user_count_reporter(
    user_service: Arc<dyn UserServicePort>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match user_service.count_users().await {
                        Ok(count) => tracing::info!(user_count = count, "User count"),
                        Err(e) => tracing::error!(error = %e, "Failed to count users"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("User count reporter stopped");
    })
}
