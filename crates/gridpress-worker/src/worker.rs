//! The worker task: a dedicated async task owning the puzzle cache,
//! processing generation requests one at a time, and warming the cache
//! whenever it is idle.
//!
//! Nothing is shared with the caller — all communication crosses the two
//! channels, and once a request is accepted it runs to completion. There
//! is no cancellation message in the protocol.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::PuzzleCache;
use crate::error::WorkerError;
use crate::orchestrator::Orchestrator;
use crate::protocol::{WorkerRequest, WorkerResponse};

const REQUEST_BUFFER: usize = 8;
const RESPONSE_BUFFER: usize = 64;

/// Caller's end of a spawned worker
pub struct WorkerHandle {
    requests: mpsc::Sender<WorkerRequest>,
    responses: mpsc::Receiver<WorkerResponse>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Queue a generation request
    pub async fn send(&self, request: WorkerRequest) -> Result<(), WorkerError> {
        self.requests.send(request).await?;
        Ok(())
    }

    /// Next response, or `None` once the worker has shut down
    pub async fn recv(&mut self) -> Option<WorkerResponse> {
        self.responses.recv().await
    }

    /// Close the request channel and wait for the task to drain and exit
    pub async fn shutdown(self) {
        let WorkerHandle { requests, responses, task } = self;
        drop(requests);
        drop(responses);
        let _ = task.await;
    }
}

/// Spawn a worker task on the current runtime
pub fn spawn() -> WorkerHandle {
    let (request_tx, request_rx) = mpsc::channel(REQUEST_BUFFER);
    let (response_tx, response_rx) = mpsc::channel(RESPONSE_BUFFER);
    let task = tokio::spawn(run(request_rx, response_tx));
    WorkerHandle {
        requests: request_tx,
        responses: response_rx,
        task,
    }
}

/// Worker main loop. Requests take priority; between them the cache warms
/// one puzzle at a time, yielding to the runtime after each.
pub async fn run(
    mut requests: mpsc::Receiver<WorkerRequest>,
    responses: mpsc::Sender<WorkerResponse>,
) {
    let mut cache = PuzzleCache::new();

    loop {
        let request = if cache.is_warm() {
            requests.recv().await
        } else {
            tokio::select! {
                biased;
                request = requests.recv() => request,
                _ = tokio::task::yield_now() => {
                    cache.warm_step();
                    continue;
                }
            }
        };

        let Some(request) = request else {
            debug!("request channel closed, worker exiting");
            break;
        };
        if handle(request, &mut cache, &responses).await.is_err() {
            debug!("response channel closed, worker exiting");
            break;
        }
    }
}

/// Process one request. `Err` means the caller is gone and the loop should
/// stop; every run-level failure is reported on the channel instead.
async fn handle(
    request: WorkerRequest,
    cache: &mut PuzzleCache,
    responses: &mpsc::Sender<WorkerResponse>,
) -> Result<(), WorkerError> {
    match request {
        WorkerRequest::Generate { config } => {
            match Orchestrator::new(cache, responses).run(&config).await {
                Ok(()) => Ok(()),
                Err(WorkerError::ChannelClosed) => Err(WorkerError::ChannelClosed),
                Err(err) => {
                    responses
                        .send(WorkerResponse::Error {
                            error: err.to_string(),
                        })
                        .await?;
                    Ok(())
                }
            }
        }
    }
}
