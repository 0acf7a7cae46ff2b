//! Async driver for a [`QuerySynchronizer`].
//!
//! Owns the synchronizer on a single task. User intents arrive over an mpsc
//! channel; requests run concurrently and are never aborted; the rendered
//! state is published on a watch channel after every step.

use futures::stream::{FuturesUnordered, StreamExt};
use hydrodash_listing::ListingResponse;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::synchronizer::{Dispatch, QuerySynchronizer, ResponseOutcome, SyncIntent, SyncPhase};
use crate::transport::ListingTransport;

const INTENT_BUFFER: usize = 64;

/// What the listing page should render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncView {
    pub result: Option<ListingResponse>,
    pub loading: bool,
    pub phase: SyncPhase,
    pub applied_seq: u64,
    pub last_error: Option<String>,
}

impl SyncView {
    fn of(sync: &QuerySynchronizer) -> Self {
        Self {
            result: sync.result().cloned(),
            loading: sync.is_loading(),
            phase: sync.phase(),
            applied_seq: sync.applied_seq(),
            last_error: sync.last_error().map(str::to_owned),
        }
    }
}

/// Handle to a running driver.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    intents: mpsc::Sender<SyncIntent>,
    view: watch::Receiver<SyncView>,
}

impl SyncHandle {
    /// Queues a user intent.
    pub async fn send(&self, intent: SyncIntent) -> ClientResult<()> {
        self.intents
            .send(intent)
            .await
            .map_err(|_| ClientError::ChannelClosed)
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> SyncView {
        self.view.borrow().clone()
    }

    /// A receiver that is notified on every view change.
    pub fn subscribe(&self) -> watch::Receiver<SyncView> {
        self.view.clone()
    }
}

/// Spawns the driver task. It stops when every [`SyncHandle`] is dropped.
pub fn spawn_driver(
    transport: Arc<dyn ListingTransport>,
    sync: QuerySynchronizer,
) -> (SyncHandle, JoinHandle<()>) {
    let (intent_tx, intent_rx) = mpsc::channel(INTENT_BUFFER);
    let (view_tx, view_rx) = watch::channel(SyncView::of(&sync));
    let task = tokio::spawn(run(transport, sync, intent_rx, view_tx));
    (
        SyncHandle {
            intents: intent_tx,
            view: view_rx,
        },
        task,
    )
}

async fn run(
    transport: Arc<dyn ListingTransport>,
    mut sync: QuerySynchronizer,
    mut intents: mpsc::Receiver<SyncIntent>,
    view: watch::Sender<SyncView>,
) {
    let mut in_flight = FuturesUnordered::new();
    loop {
        let deadline = sync.deadline().map(Instant::from_std);
        tokio::select! {
            intent = intents.recv() => {
                let Some(intent) = intent else {
                    debug!("intent channel closed; stopping listing driver");
                    break;
                };
                if let Some(dispatch) = sync.apply(intent, now()) {
                    in_flight.push(perform(Arc::clone(&transport), dispatch));
                }
            }
            Some((seq, result)) = in_flight.next(), if !in_flight.is_empty() => {
                match result {
                    Ok(response) => {
                        sync.on_response(seq, response);
                    }
                    Err(err) => {
                        if sync.on_failure(seq, err.to_string()) == ResponseOutcome::Failed {
                            warn!(seq, error = %err, "listing request failed");
                        }
                    }
                }
            }
            () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(dispatch) = sync.poll(now()) {
                    in_flight.push(perform(Arc::clone(&transport), dispatch));
                }
            }
        }
        view.send_replace(SyncView::of(&sync));
    }
}

async fn perform(
    transport: Arc<dyn ListingTransport>,
    dispatch: Dispatch,
) -> (u64, ClientResult<ListingResponse>) {
    let result = transport.fetch(&dispatch.query).await;
    (dispatch.seq, result)
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}
