use actix_web::{get, web, HttpResponse, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/health")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(Response {
        status: String::from("ok"),
        subscriptions: state.registry.count(),
        timestamp: Utc::now(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    pub subscriptions: usize,
    pub timestamp: DateTime<Utc>,
}
