use actix_web::{post, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::send_push,
    types::SubscriptionRequest,
};

#[post("/sendNotification")]
pub async fn index(
    state: web::Data<AppState<State>>,
    data: web::Json<Request>,
) -> Result<HttpResponse, Error> {
    let Request {
        subscription,
        payload,
    } = data.into_inner();

    let subscription = subscription
        .ok_or_else(|| Error::MissingParams(String::from("subscription")))?
        .into_subscription()?;
    let payload =
        payload.ok_or_else(|| Error::MissingParams(String::from("payload")))?;

    let status_code =
        send_push::send(state.as_ref().clone(), subscription, &payload).await?;

    Ok(HttpResponse::Ok().json(Response {
        message: String::from("Notification sent successfully"),
        status_code,
    }))
}

#[derive(Debug, Deserialize)]
pub struct Request {
    pub subscription: Option<SubscriptionRequest>,
    pub payload: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub message: String,
    pub status_code: u16,
}
