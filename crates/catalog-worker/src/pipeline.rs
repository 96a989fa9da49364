//! One long-lived producer task and one long-lived worker task per process.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::consumer::ImageWorker;
use crate::error::WorkerError;
use crate::producer::{EventProducer, ProducerStats};
use crate::queue::EventQueueReceiver;

pub struct Pipeline;

/// Whether the image worker task is still consuming.
///
/// Cheap to clone; handlers hold a copy to report liveness.
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    stopped: CancellationToken,
}

impl WorkerStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.is_cancelled()
    }

    pub(crate) fn mark_stopped(&self) {
        self.stopped.cancel();
    }
}

impl Pipeline {
    /// Spawn the producer over `queue` and the image worker. Both stop when
    /// `cancel` fires; the producer also stops once the queue is drained.
    pub fn spawn(
        producer: EventProducer,
        worker: ImageWorker,
        queue: EventQueueReceiver,
        cancel: CancellationToken,
    ) -> PipelineHandle {
        let producer = tokio::spawn(producer.run(queue, cancel.clone()));

        let worker = Arc::new(worker);
        let worker_cancel = cancel.clone();
        let status = WorkerStatus::new();
        let worker_status = status.clone();
        let worker = tokio::spawn(async move {
            let result = worker.run(worker_cancel).await;
            worker_status.mark_stopped();
            if let Err(ref e) = result {
                tracing::error!(error = %e, "Image worker exited");
            }
            result
        });

        PipelineHandle {
            cancel,
            status,
            producer,
            worker,
        }
    }
}

pub struct PipelineHandle {
    cancel: CancellationToken,
    status: WorkerStatus,
    producer: JoinHandle<ProducerStats>,
    worker: JoinHandle<Result<(), WorkerError>>,
}

impl PipelineHandle {
    pub fn worker_status(&self) -> WorkerStatus {
        self.status.clone()
    }

    pub fn is_worker_running(&self) -> bool {
        !self.worker.is_finished()
    }

    /// Stop the pipeline. Call after every `EventQueue` has been dropped so the
    /// producer can drain what is left; it gets `drain_timeout` before it is
    /// cancelled. The worker is cancelled afterwards.
    pub async fn shutdown(self, drain_timeout: Duration) -> Result<(), WorkerError> {
        let mut producer = self.producer;
        match tokio::time::timeout(drain_timeout, &mut producer).await {
            Ok(Ok(stats)) => {
                tracing::info!(
                    published = stats.published,
                    failed = stats.failed,
                    "Event queue drained"
                );
            }
            Ok(Err(e)) => tracing::error!(error = %e, "Event producer task failed"),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = drain_timeout.as_secs(),
                    "Event queue not drained in time, cancelling producer"
                );
                self.cancel.cancel();
                if let Err(e) = producer.await {
                    tracing::error!(error = %e, "Event producer task failed");
                }
            }
        }

        self.cancel.cancel();
        match self.worker.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Image worker task failed");
                Ok(())
            }
        }
    }
}
