use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ferrous_relay_api::{create_api_routes, AppState};
use ferrous_relay_domain::config::UpstreamPool;
use ferrous_relay_domain::RecordType;
use ferrous_relay_infrastructure::dns::cache::{CacheKey, Deadlines};
use ferrous_relay_infrastructure::dns::{
    PipelineBuilder, PoolDispatcher, ResolutionPipeline, RuleRouter, UdpDnsServer,
    UdpPacketSender,
};
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use http_body_util::BodyExt;
use serde_json::Value;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;

async fn pipeline() -> Arc<ResolutionPipeline> {
    let socket = UdpDnsServer::bind("127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let dispatcher = PoolDispatcher::new(
        &[UpstreamPool::new("default", vec!["127.0.0.1:53".to_string()])],
        Duration::from_millis(100),
        3,
    )
    .unwrap();

    Arc::new(
        PipelineBuilder::new(
            Arc::new(RuleRouter::new(vec![], Some("default"))),
            Arc::new(dispatcher),
            Arc::new(UdpPacketSender::new(socket)),
        )
        .build(),
    )
}

fn seed(pipeline: &ResolutionPipeline, domain: &str, ttl_secs: u64) {
    let now = Instant::now();
    let record = Record::from_rdata(
        Name::from_str(&format!("{}.", domain)).unwrap(),
        ttl_secs as u32,
        RData::A(A(Ipv4Addr::new(192, 0, 2, 7))),
    );
    pipeline.cache().upsert(
        CacheKey::new(domain, RecordType::A),
        Arc::from(vec![record]),
        ResponseCode::NoError,
        Deadlines {
            deadline: now + Duration::from_secs(ttl_secs),
            original_deadline: now + Duration::from_secs(ttl_secs),
        },
    );
}

fn app(pipeline: Arc<ResolutionPipeline>) -> Router {
    Router::new().nest("/api", create_api_routes(AppState::new(pipeline)))
}

async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = call(app(pipeline().await), "GET", "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_stats_reports_counters() {
    let pipeline = pipeline().await;
    seed(&pipeline, "example.com", 300);

    let (status, body) = call(app(pipeline), "GET", "/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["cache"]["entries"], 1);
    assert_eq!(json["cache"]["insertions"], 1);
    assert_eq!(json["admission"]["in_flight"], 0);
    assert_eq!(json["admission"]["ceiling"], 5000);
    assert_eq!(json["coalescer"]["executions"], 0);
}

#[tokio::test]
async fn test_cache_snapshot_lists_fresh_entries() {
    let pipeline = pipeline().await;
    seed(&pipeline, "b.example", 300);
    seed(&pipeline, "a.example", 120);

    let (status, body) = call(app(pipeline), "GET", "/api/cache").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["domain"], "a.example");
    assert_eq!(entries[0]["record_type"], "A");
    assert_eq!(entries[0]["rcode"], "NOERROR");
    assert_eq!(entries[0]["answers"][0]["data"], "192.0.2.7");
    assert!(entries[1]["ttl_remaining"].as_u64().unwrap() <= 300);
}

#[tokio::test]
async fn test_evict_removes_entry() {
    let pipeline = pipeline().await;
    seed(&pipeline, "example.com", 300);

    let (status, _) = call(app(pipeline.clone()), "DELETE", "/api/cache/example.com/a").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(pipeline.cache().is_empty());
}

#[tokio::test]
async fn test_evict_missing_entry_is_not_found() {
    let (status, body) = call(app(pipeline().await), "DELETE", "/api/cache/example.com/A").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("example.com/A"));
}

#[tokio::test]
async fn test_evict_with_bad_record_type_is_bad_request() {
    let (status, _) = call(app(pipeline().await), "DELETE", "/api/cache/example.com/BOGUS").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
