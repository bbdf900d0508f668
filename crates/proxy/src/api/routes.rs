//! API route definitions

use crate::api::handlers;
use crate::app::AppState;
use axum::{routing::get, Router};
use config::Configuration;
use std::sync::Arc;
use tracing::warn;

pub const VERSION_PATH: &str = "/--version";

/// Create the main API router
pub fn create_routes(config: &Configuration) -> Router<Arc<AppState>> {
    let mut router = Router::new().route(VERSION_PATH, get(handlers::version_info));

    if let Some(path) = config.health_check_route() {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        if path == VERSION_PATH {
            warn!(path = %path, "Health check path collides with the version route, ignoring it");
        } else if !is_literal_path(&path) {
            warn!(path = %path, "Health check path contains route parameters, ignoring it");
        } else {
            router = router.route(&path, get(handlers::health_check));
        }
    }

    router.fallback(handlers::not_found)
}

/// `:` and `*` start path parameters in the router
fn is_literal_path(path: &str) -> bool {
    !path.contains([':', '*'])
}
