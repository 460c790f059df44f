pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod store;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use cache::Cache;
use config::Config;
use models::Item;
use store::Store;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
    pub cache: Arc<Cache<Vec<Item>>>,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> Self {
        AppState {
            config: Arc::new(config),
            store,
            cache: Arc::new(Cache::new()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    let protected = Router::new()
        .route(
            "/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route(
            "/items/:item_id",
            get(handlers::items::get_item)
                .put(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
        .route("/items/:item_id/restore", post(handlers::items::restore_item))
        .route(
            "/bills",
            get(handlers::bills::list_bills).post(handlers::bills::create_bill),
        )
        .route(
            "/bills/:bill_id",
            get(handlers::bills::get_bill)
                .put(handlers::bills::update_bill)
                .delete(handlers::bills::delete_bill),
        )
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    let api = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    match origin.parse::<HeaderValue>() {
        Ok(value) if origin != "*" => CorsLayer::new()
            .allow_origin(value)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .allow_credentials(true),
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}
