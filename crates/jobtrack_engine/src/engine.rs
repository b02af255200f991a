use std::sync::Arc;

use jobtrack_core::{Effect, Msg};
use jobtrack_logging::jobtrack_trace;
use tokio::sync::mpsc;

use crate::JobApi;

/// Runs effects as tasks on the current tokio runtime and queues the
/// resulting messages for the update loop.
///
/// On a current-thread runtime every task interleaves with the caller at
/// request and timer boundaries only.
pub struct EngineHandle {
    api: Arc<dyn JobApi>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn JobApi>) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            api,
            msg_tx,
            msg_rx,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn execute(&self, effect: Effect) {
        let api = self.api.clone();
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let msg = run_effect(api.as_ref(), effect).await;
            let _ = msg_tx.send(msg);
        });
    }

    /// Waits for the next message produced by an executed effect.
    pub async fn next_msg(&mut self) -> Option<Msg> {
        self.msg_rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Msg> {
        self.msg_rx.try_recv().ok()
    }
}

async fn run_effect(api: &dyn JobApi, effect: Effect) -> Msg {
    match effect {
        Effect::SubmitJob {
            generation,
            request,
        } => Msg::JobSubmitted {
            generation,
            result: api.submit(&request).await,
        },
        Effect::SchedulePoll { generation, delay } => {
            jobtrack_trace!("Generation {} sleeping {:?} before poll", generation, delay);
            tokio::time::sleep(delay).await;
            Msg::PollDue { generation }
        }
        Effect::PollStatus {
            generation,
            handle,
            credentials,
        } => Msg::PollCompleted {
            generation,
            result: api.poll(&handle, &credentials).await,
        },
        Effect::DiscoverFields {
            slot,
            ticket,
            request,
        } => Msg::FieldsDiscovered {
            slot,
            ticket,
            result: api.discover_fields(&request).await,
        },
    }
}
