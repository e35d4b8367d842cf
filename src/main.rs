use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};

use papercheck_server::{
    app_state::AppState,
    config::Config,
    handlers,
    middleware::{cors, RequestIdMiddleware},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    config.validate_for_production();

    let bind_address = (config.web_server_host.clone(), config.web_server_port);
    let allowed_origin = config.cors_allowed_origin.clone();

    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let state = web::Data::new(Arc::new(state));

    log::info!(
        "Starting HTTP server on {}:{} (archive {})",
        bind_address.0,
        bind_address.1,
        if state.db.is_some() { "enabled" } else { "disabled" }
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(&allowed_origin))
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
