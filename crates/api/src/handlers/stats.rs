use crate::{
    dto::{AdmissionStats, CacheStats, CoalescerStats, StatsResponse},
    state::AppState,
};
use axum::{extract::State, Json};
use std::sync::atomic::Ordering;
use tracing::{debug, instrument};

#[instrument(skip(state), name = "api_get_stats")]
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let pipeline = &state.pipeline;
    let cache = pipeline.cache();
    let metrics = cache.metrics();
    let admission = pipeline.admission();
    let coalescer = pipeline.coalescer();

    let response = StatsResponse {
        uptime_secs: state.started_at.elapsed().as_secs(),
        cache: CacheStats {
            entries: cache.len(),
            hits: metrics.hits.load(Ordering::Relaxed),
            misses: metrics.misses.load(Ordering::Relaxed),
            insertions: metrics.insertions.load(Ordering::Relaxed),
            refreshes: metrics.refreshes.load(Ordering::Relaxed),
            removals: metrics.removals.load(Ordering::Relaxed),
            hit_rate: metrics.hit_rate(),
        },
        admission: AdmissionStats {
            in_flight: admission.in_flight(),
            ceiling: admission.ceiling(),
            denied: admission.denied(),
        },
        coalescer: CoalescerStats {
            in_flight: coalescer.in_flight(),
            executions: coalescer.executions(),
            joins: coalescer.joins(),
        },
    };

    debug!(
        entries = response.cache.entries,
        hit_rate = response.cache.hit_rate,
        in_flight = response.admission.in_flight,
        "Statistics retrieved"
    );

    Json(response)
}
