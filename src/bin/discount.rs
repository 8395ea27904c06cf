use axum::http::{header, HeaderValue, Method};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concert_seats::config::Config;
use concert_seats::controllers::discount::{self, DiscountState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting loyalty discount service");

    let state = DiscountState {
        jwt_secret: Arc::new(config.auth.jwt_secret.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .app
                .cors_origin
                .parse::<HeaderValue>()
                .expect("CORS_ORIGIN must be a valid origin"),
        )
        .allow_methods([Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let app = discount::routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind((config.app.host.as_str(), config.discount.port))
        .await
        .expect("Failed to bind server address");
    info!(
        "Discount service listening on {}:{}",
        config.app.host, config.discount.port
    );

    axum::serve(listener, app.into_make_service()).await.unwrap();
}
