mod api;
mod config;
mod gateway;
mod middleware;
mod models;
mod services;
mod session;
mod utils;
mod views;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::PortalConfig;
use crate::gateway::{DataGateway, Gateway};
use crate::session::SessionStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = PortalConfig::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Internship Portal...");
    log::info!("🗄️  Document API: {} (db: {})", config.gateway.base_url, config.gateway.db_name);

    let gateway = Gateway::new(&config.gateway).map_err(|e| {
        log::error!("❌ Failed to build gateway client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let gateway: Arc<dyn DataGateway> = Arc::new(gateway);
    let gateway_data: web::Data<dyn DataGateway> = web::Data::from(gateway);
    let store_data = web::Data::new(SessionStore::new());

    let host = config.host.clone();
    let port = config.port;
    let origins = config.cors_allowed_origins.clone();
    let config_data = web::Data::new(config);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(gateway_data.clone())
            .app_data(store_data.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
