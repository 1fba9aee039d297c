// HTTP server setup (Axum RPC bridge)
pub mod app;
pub mod middleware;
pub mod routes;

pub use app::*;
