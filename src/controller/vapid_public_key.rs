use actix_web::{get, web, HttpResponse, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/vapidPublicKey")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(state.config.vapid_public_key.to_owned()))
}
