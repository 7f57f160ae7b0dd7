use chrono::Utc;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::AppState;

pub async fn start_scheduler(state: Arc<AppState>) {
    let sched = match JobScheduler::new().await {
        Ok(sched) => sched,
        Err(e) => {
            error!("Failed to create scheduler: {}", e);
            return;
        }
    };

    // Every ten minutes, drop sessions nobody has touched within the ttl
    let state_clone = Arc::clone(&state);
    let eviction_job = match Job::new_async("0 */10 * * * *", move |_, _| {
        let state = state_clone.clone();
        Box::pin(async move {
            let evicted = state.sessions.evict_idle(Utc::now());
            if evicted > 0 {
                info!(
                    "Evicted {} idle intake sessions, {} remaining",
                    evicted,
                    state.sessions.len()
                );
            }
        })
    }) {
        Ok(job) => job,
        Err(e) => {
            error!("Failed to create session eviction job: {}", e);
            return;
        }
    };

    if let Err(e) = sched.add(eviction_job).await {
        error!("Failed to add session eviction job: {}", e);
        return;
    }

    if let Err(e) = sched.start().await {
        error!("Failed to start scheduler: {}", e);
    }
}
