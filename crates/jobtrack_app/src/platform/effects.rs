use std::sync::Arc;

use jobtrack_core::{Effect, Msg};
use jobtrack_engine::{EngineHandle, JobApi};
use jobtrack_logging::{jobtrack_debug, jobtrack_info};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(api: Arc<dyn JobApi>) -> Self {
        Self {
            engine: EngineHandle::new(api),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match &effect {
                Effect::SubmitJob {
                    generation,
                    request,
                } => {
                    jobtrack_info!(
                        "SubmitJob generation={} target={} files={}",
                        generation,
                        request.target(),
                        request.files().len()
                    );
                }
                Effect::SchedulePoll { generation, delay } => {
                    jobtrack_debug!("SchedulePoll generation={} delay={:?}", generation, delay);
                }
                Effect::PollStatus {
                    generation, handle, ..
                } => {
                    jobtrack_debug!("PollStatus generation={} job={}", generation, handle);
                }
                Effect::DiscoverFields { slot, request, .. } => {
                    jobtrack_info!(
                        "DiscoverFields slot={} file={:?}",
                        slot,
                        request.file().path()
                    );
                }
            }
            self.engine.execute(effect);
        }
    }

    pub async fn next_msg(&mut self) -> Option<Msg> {
        self.engine.next_msg().await
    }
}
