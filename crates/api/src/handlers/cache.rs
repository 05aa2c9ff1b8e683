use crate::{
    dto::{CacheEntryResponse, CacheRecordResponse, ErrorResponse},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ferrous_relay_domain::RecordType;
use ferrous_relay_infrastructure::dns::cache::{CacheEntry, CacheKey};
use ferrous_relay_infrastructure::dns::forwarding::ResponseParser;
use std::time::Instant;
use tracing::{debug, info, instrument};

#[instrument(skip(state), name = "api_get_cache_snapshot")]
pub async fn get_cache_snapshot(State(state): State<AppState>) -> Json<Vec<CacheEntryResponse>> {
    let now = Instant::now();
    let mut entries: Vec<CacheEntryResponse> = state
        .pipeline
        .cache()
        .snapshot_at(now)
        .into_iter()
        .map(|(key, entry)| to_response(&key, &entry, now))
        .collect();

    entries.sort_by(|a, b| {
        a.domain
            .cmp(&b.domain)
            .then_with(|| a.record_type.cmp(&b.record_type))
    });

    debug!(entries = entries.len(), "Cache snapshot taken");
    Json(entries)
}

#[instrument(skip(state), name = "api_evict_cache_entry")]
pub async fn evict_cache_entry(
    State(state): State<AppState>,
    Path((domain, record_type)): Path<(String, String)>,
) -> Response {
    let record_type = match record_type.parse::<RecordType>() {
        Ok(record_type) => record_type,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e))).into_response(),
    };

    let key = CacheKey::new(&domain, record_type);
    if state.pipeline.cache().remove(&key) {
        info!(key = %key, "Cache entry evicted via API");
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("{} is not cached", key))),
        )
            .into_response()
    }
}

fn to_response(key: &CacheKey, entry: &CacheEntry, now: Instant) -> CacheEntryResponse {
    let ttl_remaining = entry.remaining_ttl(now);
    CacheEntryResponse {
        domain: key.domain.to_string(),
        record_type: key.record_type.to_string(),
        rcode: ResponseParser::rcode_to_status(entry.response_code).to_string(),
        ttl_remaining,
        answers: entry
            .answers
            .iter()
            .map(|record| CacheRecordResponse {
                name: record.name().to_string(),
                record_type: record.record_type().to_string(),
                ttl: ttl_remaining,
                data: record.data().to_string(),
            })
            .collect(),
    }
}
