//! Bounded queue for per-user view records.
//!
//! Detail pages hand view records to [`ViewRecorder::record`], which never
//! waits: when the queue is full the record is dropped and counted. A fixed
//! number of worker tasks drain the queue into [`ViewLogic::record_viewer`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::logic::ViewLogic;

/// One signed-in user's visit to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRecord {
    pub objid: DbId,
    pub objtype: ObjectType,
    pub uid: DbId,
}

/// Cheaply cloneable handle for enqueueing view records.
#[derive(Clone)]
pub struct ViewRecorder {
    sender: mpsc::Sender<ViewRecord>,
    dropped: Arc<AtomicU64>,
}

impl ViewRecorder {
    /// Create the queue and spawn `workers` tasks draining it.
    ///
    /// Workers stop when `cancel` fires or every handle has been dropped.
    pub fn start(
        views: Arc<dyn ViewLogic>,
        capacity: usize,
        workers: usize,
        cancel: CancellationToken,
    ) -> (Self, Vec<JoinHandle<()>>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));

        let handles = (0..workers)
            .map(|worker| {
                tokio::spawn(run_worker(
                    worker,
                    Arc::clone(&views),
                    Arc::clone(&receiver),
                    cancel.clone(),
                ))
            })
            .collect();

        tracing::info!(capacity, workers, "View recorder started");

        let recorder = Self {
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (recorder, handles)
    }

    /// Enqueue a record without waiting. Returns `false` if it was dropped.
    pub fn record(&self, objid: DbId, objtype: ObjectType, uid: DbId) -> bool {
        match self.sender.try_send(ViewRecord {
            objid,
            objtype,
            uid,
        }) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(record)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    objid = record.objid,
                    uid = record.uid,
                    dropped,
                    "View record queue full, dropping record"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(objid, uid, "View recorder stopped, dropping record");
                false
            }
        }
    }

    /// Records dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

async fn run_worker(
    worker: usize,
    views: Arc<dyn ViewLogic>,
    receiver: Arc<Mutex<mpsc::Receiver<ViewRecord>>>,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => None,
            record = async { receiver.lock().await.recv().await } => record,
        };
        let Some(record) = next else {
            tracing::debug!(worker, "View record worker stopping");
            break;
        };

        if let Err(e) = views
            .record_viewer(record.objid, record.objtype, record.uid)
            .await
        {
            tracing::error!(
                error = %e,
                objid = record.objid,
                uid = record.uid,
                "Failed to record viewer"
            );
        }
    }
}
