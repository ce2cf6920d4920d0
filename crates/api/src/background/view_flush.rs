//! Periodic flush of buffered page views.
//!
//! Drains the [`ViewCounter`] on a fixed interval and persists each object's
//! view count and referer tallies. A final flush runs on cancellation so
//! views counted just before shutdown are not lost.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::logic::ViewLogic;
use crate::tracking::ViewCounter;

/// Run the view flush loop until `cancel` is triggered.
pub async fn run(
    counter: Arc<ViewCounter>,
    views: Arc<dyn ViewLogic>,
    period: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = period.as_secs(), "View flush job started");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; nothing is buffered yet.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let flushed = flush(&counter, views.as_ref()).await;
                tracing::info!(flushed, "View flush job stopping");
                break;
            }
            _ = interval.tick() => {
                let flushed = flush(&counter, views.as_ref()).await;
                if flushed > 0 {
                    tracing::info!(flushed, "View flush: persisted buffered views");
                } else {
                    tracing::debug!("View flush: nothing to persist");
                }
            }
        }
    }
}

/// Persist everything buffered so far. Returns the number of objects written.
///
/// Failed objects are logged and skipped; their views are not retried.
pub async fn flush(counter: &ViewCounter, views: &dyn ViewLogic) -> usize {
    let mut flushed = 0;
    for pending in counter.drain() {
        match views
            .persist_views(pending.objtype, pending.objid, pending.views, &pending.sources)
            .await
        {
            Ok(()) => flushed += 1,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    objtype = %pending.objtype,
                    objid = pending.objid,
                    views = pending.views,
                    "View flush: failed to persist views"
                );
            }
        }
    }
    flushed
}
