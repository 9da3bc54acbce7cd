use std::path::Path;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{dev::Server, http::header, middleware, web, App, HttpServer};
use tracing::info;

use crate::{
    configuration::{AppState, State},
    controller::{
        broadcast, health, send_notification, subscribe, subscriptions,
        unsubscribe, vapid_public_key, version,
    },
    error::Error,
};

const JSON_LIMIT: usize = 4096;

pub async fn server_task(app_state: &AppState<State>) -> Result<(), Error> {
    let app = app_state.clone();
    tokio::spawn(async move {
        let server = init_server(app)?;
        server.await?;
        Ok(())
    })
    .await?
}

/// Routes, JSON extractor limits and shared state. Used by the server and
/// by the integration tests.
pub fn configure(
    app_state: AppState<State>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(app_state))
            .app_data(
                web::JsonConfig::default()
                    .limit(JSON_LIMIT)
                    .error_handler(|err, _req| {
                        Error::InvalidBody(err.to_string()).into()
                    }),
            )
            .service(health::index)
            .service(
                web::scope("/api")
                    .service(vapid_public_key::index)
                    .service(subscribe::index)
                    .service(unsubscribe::index)
                    .service(send_notification::index)
                    .service(broadcast::index)
                    .service(subscriptions::index)
                    .service(version::index),
            );
    }
}

fn init_server(app_state: AppState<State>) -> Result<Server, Error> {
    let host = app_state.config.server_host.to_owned();
    let port = app_state.config.port;

    info!("Starting push server on {}:{}", host, port);

    let server = HttpServer::new(move || {
        let app = app_state.clone();
        let static_dir = app_state.config.static_dir.to_owned();
        let allowed_cors = String::from("*");
        let cors_access_all =
            app.config.allowed_origins.contains(&allowed_cors);
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                if cors_access_all {
                    return true;
                }
                let allowed = &app.config.allowed_origins;
                if let Ok(origin) = origin.to_str() {
                    return allowed.contains(&origin.to_owned());
                }
                false
            })
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT])
            .allowed_header(header::CONTENT_TYPE);

        let mut service = App::new()
            .wrap(cors)
            .wrap(middleware::Compress::default())
            .configure(configure(app_state.clone()));

        if Path::new(&static_dir).is_dir() {
            service = service
                .service(Files::new("/", static_dir).index_file("index.html"));
        }

        service
    })
    .bind((host, port))?
    .run();
    Ok(server)
}
