#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use push_server::{
    configuration::{AppState, Config, State},
    push::{DeliveryError, PushDelivery},
    types::{Subscription, SubscriptionKeys, Urgency},
};

pub const VAPID_PRIVATE_KEY: &[u8] =
    include_bytes!("../fixtures/vapid_private.pem");
pub const VAPID_PUBLIC_KEY: &str = include_str!("../fixtures/vapid_public.b64");

/// Public key and auth secret of a throwaway browser key pair.
pub const CLIENT_P256DH: &str = "BKqBY1xSLahOFCkAbisiotoexAiFzvONAhTl1ba6K36geDePGMaFGPQpHivmRcSv-ofuV7Dqn0i-6apb1yyN7xM";
pub const CLIENT_AUTH: &str = "pjjY1R9JoKIKttf--YAGOA";

pub fn test_config() -> Config {
    Config {
        server_host: String::from("127.0.0.1"),
        port: 0,
        allowed_origins: vec![String::from("*")],
        static_dir: String::from("public"),
        timeout: 5,
        max_tasks: 8,
        status_code_to_delete: vec![404, 410],
        mail_to: String::from("admin@example.com"),
        vapid_private_key: VAPID_PRIVATE_KEY.to_vec(),
        vapid_public_key: VAPID_PUBLIC_KEY.trim().to_owned(),
        push_ttl: 86400,
        push_urgency: Urgency::High,
        notification_title: String::from("Push Notification"),
        notification_icon: String::from("/icons/icon-192.png"),
        notification_badge: String::from("/icons/badge-72.png"),
    }
}

pub fn subscription(endpoint: &str) -> Subscription {
    Subscription {
        endpoint: endpoint.to_owned(),
        expiration_time: None,
        keys: SubscriptionKeys {
            p256dh: String::from(CLIENT_P256DH),
            auth: String::from(CLIENT_AUTH),
        },
    }
}

pub fn app_state(delivery: Arc<dyn PushDelivery>) -> AppState<State> {
    AppState::new(State::with_delivery(test_config(), delivery))
}

/// Records every delivery and answers 201 unless a response is scripted.
#[derive(Debug, Default)]
pub struct RecordingDelivery {
    responses: HashMap<String, Result<u16, DeliveryError>>,
    pub calls: AtomicUsize,
    pub delivered: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingDelivery {
    pub fn respond(
        mut self,
        endpoint: &str,
        response: Result<u16, DeliveryError>,
    ) -> Self {
        self.responses.insert(endpoint.to_owned(), response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<(String, Vec<u8>)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushDelivery for RecordingDelivery {
    async fn deliver(
        &self,
        subscription: &Subscription,
        payload: &[u8],
    ) -> Result<u16, DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.delivered
            .lock()
            .unwrap()
            .push((subscription.endpoint.to_owned(), payload.to_vec()));

        self.responses
            .get(&subscription.endpoint)
            .cloned()
            .unwrap_or(Ok(201))
    }
}

pub fn gone() -> DeliveryError {
    DeliveryError::Rejected {
        status: 410,
        body: String::from("push subscription has unsubscribed or expired."),
    }
}
