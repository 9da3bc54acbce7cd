mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test, App};
use push_server::{
    configuration::{AppState, State},
    server,
    types::NotificationEnvelope,
};
use serde_json::{json, Value};

use common::{app_state, gone, RecordingDelivery};

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new().configure(server::configure($state.clone())),
        )
        .await
    };
}

fn subscription_json(endpoint: &str) -> Value {
    json!({
        "endpoint": endpoint,
        "expirationTime": null,
        "keys": { "p256dh": common::CLIENT_P256DH, "auth": common::CLIENT_AUTH }
    })
}

fn state_with(delivery: RecordingDelivery) -> (AppState<State>, Arc<RecordingDelivery>) {
    let delivery = Arc::new(delivery);
    (app_state(delivery.clone()), delivery)
}

#[actix_web::test]
async fn test_subscribe_without_endpoint_is_rejected() {
    let (state, _) = state_with(RecordingDelivery::default());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/subscribe")
        .set_json(json!({ "keys": { "p256dh": "a", "auth": "b" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    assert_eq!(state.registry.count(), 0);
}

#[actix_web::test]
async fn test_subscribe_replaces_same_endpoint() {
    let (state, _) = state_with(RecordingDelivery::default());
    let app = init_app!(state);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/subscribe")
            .set_json(subscription_json("https://push.example/E1"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Subscription added successfully");
        assert_eq!(body["totalSubscriptions"], 1);
    }

    assert_eq!(state.registry.count(), 1);
}

#[actix_web::test]
async fn test_unsubscribe_is_idempotent() {
    let (state, _) = state_with(RecordingDelivery::default());
    state
        .registry
        .upsert(common::subscription("https://push.example/E1"));
    let app = init_app!(state);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/unsubscribe")
            .set_json(subscription_json("https://push.example/E1"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Subscription removed successfully");
    }

    assert_eq!(state.registry.count(), 0);
}

#[actix_web::test]
async fn test_unsubscribe_without_endpoint_is_rejected() {
    let (state, _) = state_with(RecordingDelivery::default());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/unsubscribe")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_json_is_rejected() {
    let (state, _) = state_with(RecordingDelivery::default());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/subscribe")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"endpoint\":")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.registry.count(), 0);
}

#[actix_web::test]
async fn test_send_notification_success() {
    let (state, delivery) = state_with(RecordingDelivery::default());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/sendNotification")
        .set_json(json!({
            "subscription": subscription_json("https://push.example/E1"),
            "payload": { "title": "Kitchen", "body": "Table 5 order ready" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Notification sent successfully");
    assert_eq!(body["statusCode"], 201);

    let payloads = delivery.payloads();
    assert_eq!(payloads.len(), 1);
    let sent: Value = serde_json::from_slice(&payloads[0].1).unwrap();
    assert_eq!(sent, json!({ "title": "Kitchen", "body": "Table 5 order ready" }));
}

#[actix_web::test]
async fn test_send_notification_without_subscription_is_rejected() {
    let (state, delivery) = state_with(RecordingDelivery::default());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/sendNotification")
        .set_json(json!({ "payload": "Hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(delivery.calls(), 0);
}

#[actix_web::test]
async fn test_send_notification_gone_prunes_registry() {
    let (state, _) = state_with(
        RecordingDelivery::default()
            .respond("https://push.example/E2", Err(gone())),
    );
    state
        .registry
        .upsert(common::subscription("https://push.example/E2"));
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/sendNotification")
        .set_json(json!({
            "subscription": subscription_json("https://push.example/E2"),
            "payload": "Hello"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["statusCode"], 410);
    assert!(body["message"].as_str().unwrap().contains("410"));
    assert_eq!(state.registry.count(), 0);
}

#[actix_web::test]
async fn test_broadcast_empty_registry_short_circuits() {
    let (state, delivery) = state_with(RecordingDelivery::default());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/broadcast")
        .set_json(json!({ "payload": "Hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["successCount"], 0);
    assert_eq!(body["failureCount"], 0);
    assert_eq!(body["totalSubscriptions"], 0);
    assert_eq!(delivery.calls(), 0);
}

#[actix_web::test]
async fn test_broadcast_prunes_gone_endpoint() {
    let (state, delivery) = state_with(
        RecordingDelivery::default()
            .respond("https://push.example/E1", Ok(200))
            .respond("https://push.example/E2", Err(gone())),
    );
    let app = init_app!(state);

    for endpoint in ["https://push.example/E1", "https://push.example/E2"] {
        let req = test::TestRequest::post()
            .uri("/api/subscribe")
            .set_json(subscription_json(endpoint))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = test::TestRequest::post()
        .uri("/api/broadcast")
        .set_json(json!({ "payload": "Table 5 order ready" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Broadcast completed");
    assert_eq!(body["successCount"], 1);
    assert_eq!(body["failureCount"], 1);
    assert_eq!(body["totalSubscriptions"], 1);

    for (_, payload) in delivery.payloads() {
        let envelope: NotificationEnvelope =
            serde_json::from_slice(&payload).unwrap();
        assert_eq!(envelope.title, "Push Notification");
        assert_eq!(envelope.body, "Table 5 order ready");
    }

    let req = test::TestRequest::get().uri("/api/subscriptions").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["subscriptions"][0]["endpoint"], "https://push.example/E1");
}

#[actix_web::test]
async fn test_broadcast_without_payload_is_rejected() {
    let (state, _) = state_with(RecordingDelivery::default());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/broadcast")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_subscriptions_omit_keys() {
    let (state, _) = state_with(RecordingDelivery::default());
    let mut sub = common::subscription("https://push.example/E1");
    sub.expiration_time = Some(1_700_000_000_000);
    state.registry.upsert(sub);
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/subscriptions").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        json!({
            "count": 1,
            "subscriptions": [{
                "endpoint": "https://push.example/E1",
                "expirationTime": 1_700_000_000_000_i64
            }]
        })
    );
}

#[actix_web::test]
async fn test_health_and_public_key() {
    let (state, _) = state_with(RecordingDelivery::default());
    state
        .registry
        .upsert(common::subscription("https://push.example/E1"));
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["subscriptions"], 1);
    assert!(body["timestamp"].as_str().is_some());

    let req = test::TestRequest::get().uri("/api/vapidPublicKey").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, common::VAPID_PUBLIC_KEY.trim().as_bytes());
}
