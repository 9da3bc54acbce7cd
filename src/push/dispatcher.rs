use std::{sync::Arc, time::Duration};

use tokio::{sync::Semaphore, task::JoinSet, time};
use tracing::{error, info, warn};

use crate::{
    push::{DeliveryError, PushDelivery},
    types::Subscription,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(u16),
    Failure { reason: String, status: Option<u16> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub endpoint: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub success_count: usize,
    pub failure_count: usize,
    pub targeted: usize,
    /// Endpoints whose delivery failed with a gone status.
    pub gone: Vec<String>,
    pub results: Vec<DispatchResult>,
}

impl BroadcastSummary {
    fn record(&mut self, result: DispatchResult, gone: bool) {
        match result.outcome {
            Outcome::Success(_) => self.success_count += 1,
            Outcome::Failure { .. } => self.failure_count += 1,
        }
        if gone {
            self.gone.push(result.endpoint.to_owned());
        }
        self.results.push(result);
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    delivery: Arc<dyn PushDelivery>,
    permits: Arc<Semaphore>,
    timeout: Duration,
    gone_status_codes: Vec<u16>,
}

impl Dispatcher {
    pub fn new(
        delivery: Arc<dyn PushDelivery>,
        max_tasks: usize,
        timeout: Duration,
        gone_status_codes: Vec<u16>,
    ) -> Dispatcher {
        Dispatcher {
            delivery,
            permits: Arc::new(Semaphore::new(max_tasks.max(1))),
            timeout,
            gone_status_codes,
        }
    }

    /// Single delivery attempt, bounded by the configured timeout.
    pub async fn send_one(
        &self,
        subscription: &Subscription,
        payload: &[u8],
    ) -> Result<u16, DeliveryError> {
        deliver_with_timeout(
            self.delivery.as_ref(),
            subscription,
            payload,
            self.timeout,
        )
        .await
    }

    /// Deliver `payload` to every target concurrently and fold the
    /// outcomes. One failing target never affects the others.
    pub async fn broadcast(
        &self,
        payload: &[u8],
        targets: Vec<Subscription>,
    ) -> BroadcastSummary {
        let mut summary = BroadcastSummary {
            targeted: targets.len(),
            ..Default::default()
        };

        if targets.is_empty() {
            return summary;
        }

        let payload: Arc<[u8]> = Arc::from(payload);
        let mut set = JoinSet::new();

        for subscription in targets {
            let delivery = self.delivery.clone();
            let permits = self.permits.clone();
            let payload = payload.clone();
            let timeout = self.timeout;

            set.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        deliver_with_timeout(
                            delivery.as_ref(),
                            &subscription,
                            &payload,
                            timeout,
                        )
                        .await
                    },
                    Err(e) => Err(DeliveryError::Failed(e.to_string())),
                };
                (subscription.endpoint, result)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((endpoint, result)) => {
                    let gone = match &result {
                        Err(err) => self.is_gone(err),
                        Ok(_) => false,
                    };
                    summary.record(to_dispatch_result(endpoint, result), gone);
                },
                Err(e) => {
                    error!("Push task failed: {}", e);
                    summary.failure_count += 1;
                },
            }
        }

        info!(
            "Broadcast to {} subscriptions: {} succeeded, {} failed, {} gone",
            summary.targeted,
            summary.success_count,
            summary.failure_count,
            summary.gone.len()
        );

        summary
    }

    pub fn is_gone(&self, err: &DeliveryError) -> bool {
        err.status_code()
            .is_some_and(|status| self.gone_status_codes.contains(&status))
    }
}

async fn deliver_with_timeout(
    delivery: &dyn PushDelivery,
    subscription: &Subscription,
    payload: &[u8],
    timeout: Duration,
) -> Result<u16, DeliveryError> {
    match time::timeout(timeout, delivery.deliver(subscription, payload)).await
    {
        Ok(result) => result,
        Err(_) => Err(DeliveryError::Timeout(timeout)),
    }
}

fn to_dispatch_result(
    endpoint: String,
    result: Result<u16, DeliveryError>,
) -> DispatchResult {
    let outcome = match result {
        Ok(status) => Outcome::Success(status),
        Err(err) => {
            warn!("Push to {} failed: {}", endpoint, err);
            Outcome::Failure {
                reason: err.to_string(),
                status: err.status_code(),
            }
        },
    };

    DispatchResult { endpoint, outcome }
}
