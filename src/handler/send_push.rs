use serde_json::Value;
use tracing::{info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
    push::{reconciler, BroadcastSummary, Payload},
    types::Subscription,
};

/// Registry-level result of a broadcast, measured after pruning.
#[derive(Debug)]
pub struct BroadcastReport {
    pub summary: BroadcastSummary,
    pub pruned: usize,
    pub total_subscriptions: usize,
}

pub async fn send(
    app_state: AppState<State>,
    subscription: Subscription,
    payload: &Value,
) -> Result<u16, Error> {
    let data = Payload::from_json(payload).to_envelope(&app_state.envelope)?;

    match app_state.dispatcher.send_one(&subscription, &data).await {
        Ok(status) => {
            info!(
                "Push sent to {} with status {}",
                subscription.endpoint, status
            );
            Ok(status)
        },
        Err(err) => {
            warn!("Push to {} failed: {}", subscription.endpoint, err);
            reconciler::reconcile_failure(
                &app_state.registry,
                &app_state.dispatcher,
                &subscription.endpoint,
                &err,
            );
            Err(Error::Delivery(err))
        },
    }
}

pub async fn broadcast(
    app_state: AppState<State>,
    payload: &Value,
) -> Result<BroadcastReport, Error> {
    let targets = app_state.registry.snapshot();

    if targets.is_empty() {
        return Ok(BroadcastReport {
            summary: BroadcastSummary::default(),
            pruned: 0,
            total_subscriptions: 0,
        });
    }

    let data = Payload::from_json(payload).to_envelope(&app_state.envelope)?;
    let summary = app_state.dispatcher.broadcast(&data, targets).await;
    let pruned = reconciler::reconcile_broadcast(&app_state.registry, &summary);

    Ok(BroadcastReport {
        summary,
        pruned,
        total_subscriptions: app_state.registry.count(),
    })
}
