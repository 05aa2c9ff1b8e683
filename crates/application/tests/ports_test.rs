use ferrous_relay_application::ports::{PacketSender, Router, UpstreamDispatcher};
use ferrous_relay_domain::{DnsQuery, DomainError, RecordType, RouteDecision, UpstreamSelection};
use std::sync::Arc;

mod helpers;
use helpers::{EchoDispatcher, RecordingSender, SuffixRouter};

#[test]
fn test_router_as_trait_object() {
    let router: Arc<dyn Router> = Arc::new(SuffixRouter::rejecting("ads.example"));

    let rejected = router
        .select(&DnsQuery::new("tracker.ads.example", RecordType::A))
        .unwrap();
    let forwarded = router
        .select(&DnsQuery::new("example.com", RecordType::AAAA))
        .unwrap();

    assert_eq!(rejected, RouteDecision::Reject);
    assert_eq!(
        forwarded,
        RouteDecision::Forward(UpstreamSelection::new("default"))
    );
}

#[tokio::test]
async fn test_dispatcher_as_trait_object() {
    let echo = Arc::new(EchoDispatcher::for_pool("default"));
    let dispatcher: Arc<dyn UpstreamDispatcher> = echo.clone();

    let ok = dispatcher
        .send(b"\x12\x34", &UpstreamSelection::new("default"))
        .await
        .unwrap();
    let err = dispatcher
        .send(b"\x12\x34", &UpstreamSelection::new("corp"))
        .await;

    assert_eq!(&ok[..], b"\x12\x34");
    assert_eq!(err, Err(DomainError::UnknownUpstreamPool("corp".into())));
    assert_eq!(echo.call_count(), 2);
}

#[tokio::test]
async fn test_packet_sender_shared_across_tasks() {
    let recorder = Arc::new(RecordingSender::default());
    let sender: Arc<dyn PacketSender> = recorder.clone();

    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let sender = Arc::clone(&sender);
            tokio::spawn(async move {
                let dest = format!("127.0.0.1:{}", 5300 + i as u16).parse().unwrap();
                sender.send(&[i], dest).await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(recorder.sent().await.len(), 4);
}
