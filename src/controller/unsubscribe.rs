use actix_web::{post, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    types::SubscriptionRequest,
};

#[post("/unsubscribe")]
pub async fn index(
    state: web::Data<AppState<State>>,
    subscription: web::Json<SubscriptionRequest>,
) -> Result<HttpResponse, Error> {
    let endpoint = subscription.endpoint()?;

    if state.registry.remove(endpoint) {
        info!("Subscription removed: {}", endpoint);
    }

    Ok(HttpResponse::Ok().json(Response {
        message: String::from("Subscription removed successfully"),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
}
