//! Pruning of subscriptions the push service reports as gone. This is the
//! only path by which the registry drops browser-revoked endpoints.

use tracing::info;

use crate::{
    push::{BroadcastSummary, DeliveryError, Dispatcher},
    registry::SubscriptionRegistry,
};

/// Remove every endpoint; returns how many were actually present.
pub fn prune<'a, I>(registry: &SubscriptionRegistry, endpoints: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let mut removed = 0;

    for endpoint in endpoints {
        if registry.remove(endpoint) {
            info!("Removed expired subscription {}", endpoint);
            removed += 1;
        }
    }

    removed
}

pub fn reconcile_broadcast(
    registry: &SubscriptionRegistry,
    summary: &BroadcastSummary,
) -> usize {
    prune(registry, summary.gone.iter().map(String::as_str))
}

/// Prune `endpoint` if `err` carries a gone status. Returns `true` when the
/// error was a gone status, whether or not the record was still present.
pub fn reconcile_failure(
    registry: &SubscriptionRegistry,
    dispatcher: &Dispatcher,
    endpoint: &str,
    err: &DeliveryError,
) -> bool {
    if !dispatcher.is_gone(err) {
        return false;
    }

    prune(registry, [endpoint]);
    true
}
