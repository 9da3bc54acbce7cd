use actix_web::{get, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

/// Lists registered endpoints. Keys are never exposed.
#[get("/subscriptions")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<HttpResponse, Error> {
    let subscriptions = state
        .registry
        .snapshot()
        .into_iter()
        .map(|item| Item {
            endpoint: item.endpoint,
            expiration_time: item.expiration_time,
        })
        .collect::<Vec<Item>>();

    Ok(HttpResponse::Ok().json(Response {
        count: subscriptions.len(),
        subscriptions,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub count: usize,
    pub subscriptions: Vec<Item>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub endpoint: String,
    pub expiration_time: Option<i64>,
}
