use actix_web::{post, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::send_push,
};

#[post("/broadcast")]
pub async fn index(
    state: web::Data<AppState<State>>,
    data: web::Json<Request>,
) -> Result<HttpResponse, Error> {
    let payload = data
        .payload
        .as_ref()
        .ok_or_else(|| Error::MissingParams(String::from("payload")))?;

    let report = send_push::broadcast(state.as_ref().clone(), payload).await?;

    let message = if report.summary.targeted == 0 {
        String::from("No subscriptions to broadcast to")
    } else {
        String::from("Broadcast completed")
    };

    Ok(HttpResponse::Ok().json(Response {
        message,
        success_count: report.summary.success_count,
        failure_count: report.summary.failure_count,
        total_subscriptions: report.total_subscriptions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct Request {
    pub payload: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub message: String,
    pub success_count: usize,
    pub failure_count: usize,
    pub total_subscriptions: usize,
}
