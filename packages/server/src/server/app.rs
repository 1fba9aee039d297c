//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::domains::items::ItemService;
use crate::kernel::ServerDeps;
use crate::server::middleware::identity_middleware;
use crate::server::routes::{
    add_item, delete_item, get_item, get_items, health_handler, search, update_item, verify_jwt,
    verify_oauth,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub items: Arc<ItemService>,
    pub deps: ServerDeps,
}

/// Hard ceiling on request handling. Wide enough for the store round-trips
/// and the two-hop provider exchange.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the Axum application router
///
/// Every RPC operation is a POST under /rpc/, mirroring the call names the
/// clients use. Identity is resolved once per request by the middleware;
/// handlers read it from extensions.
pub fn build_app(deps: ServerDeps) -> Router {
    let items = Arc::new(ItemService::new(deps.clone()));

    // Create shared app state
    let app_state = AxumAppState {
        items,
        deps: deps.clone(),
    };

    // CORS configuration - the RPC surface is called straight from browsers
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Clone token service for middleware closure
    let tokens_for_middleware = deps.tokens.clone();

    Router::new()
        // RPC operations
        .route("/rpc/AddItem", post(add_item))
        .route("/rpc/GetItem", post(get_item))
        .route("/rpc/GetItems", post(get_items))
        .route("/rpc/UpdateItem", post(update_item))
        .route("/rpc/DeleteItem", post(delete_item))
        .route("/rpc/Search", post(search))
        .route("/rpc/VerifyOauth", post(verify_oauth))
        .route("/rpc/VerifyJwt", post(verify_jwt))
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            identity_middleware(tokens_for_middleware.clone(), req, next)
        })) // Identity resolution
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(Extension(app_state)) // Add shared state (must be after middlewares that need it)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
