use ferrous_relay_infrastructure::dns::ResolutionPipeline;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ResolutionPipeline>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(pipeline: Arc<ResolutionPipeline>) -> Self {
        Self {
            pipeline,
            started_at: Instant::now(),
        }
    }
}
