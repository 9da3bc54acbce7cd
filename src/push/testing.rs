use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    push::{DeliveryError, PushDelivery},
    types::{Subscription, SubscriptionKeys},
};

pub fn subscription(endpoint: &str) -> Subscription {
    Subscription {
        endpoint: endpoint.to_owned(),
        expiration_time: None,
        keys: SubscriptionKeys {
            p256dh: String::from("BPub"),
            auth: String::from("secret"),
        },
    }
}

/// Delivery double: answers 201 unless a response is scripted for the
/// endpoint. Endpoints ending in `/panic` panic mid-delivery.
#[derive(Debug, Default)]
pub struct FakeDelivery {
    responses: HashMap<String, Result<u16, DeliveryError>>,
    delay: Duration,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeDelivery {
    pub fn respond(
        mut self,
        endpoint: &str,
        response: Result<u16, DeliveryError>,
    ) -> Self {
        self.responses.insert(endpoint.to_owned(), response);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PushDelivery for FakeDelivery {
    async fn deliver(
        &self,
        subscription: &Subscription,
        _payload: &[u8],
    ) -> Result<u16, DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if subscription.endpoint.ends_with("/panic") {
            panic!("delivery panicked for {}", subscription.endpoint);
        }

        self.responses
            .get(&subscription.endpoint)
            .cloned()
            .unwrap_or(Ok(201))
    }
}
