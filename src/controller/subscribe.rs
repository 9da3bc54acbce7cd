use actix_web::{post, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    types::SubscriptionRequest,
};

#[post("/subscribe")]
pub async fn index(
    state: web::Data<AppState<State>>,
    subscription: web::Json<SubscriptionRequest>,
) -> Result<HttpResponse, Error> {
    let subscription = subscription.into_inner().into_subscription()?;
    let endpoint = subscription.endpoint.to_owned();

    let replaced = state.registry.upsert(subscription);
    let total_subscriptions = state.registry.count();

    if replaced {
        info!("Subscription replaced: {}", endpoint);
    } else {
        info!("Subscription added: {}", endpoint);
    }

    Ok(HttpResponse::Created().json(Response {
        message: String::from("Subscription added successfully"),
        total_subscriptions,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub message: String,
    pub total_subscriptions: usize,
}
