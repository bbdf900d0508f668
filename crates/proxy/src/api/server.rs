//! HTTP API server implementation

use crate::api::routes;
use crate::app::AppState;
use anyhow::{Context, Result};
use axum::{
    http::{HeaderName, HeaderValue, Method},
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use config::{Configuration, ListenMode};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// HTTP API server
pub struct ApiServer {
    app: Router,
    addr: SocketAddr,
    listen_mode: ListenMode,
    handle: Handle,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(state: Arc<AppState>) -> Result<Self> {
        let config = state.config.clone();

        let addr = config
            .bind_address()
            .context("Invalid server host/port configuration")?;

        let mut app = routes::create_routes(&config)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .with_state(state);

        if let Some(cors) = cors_layer(&config)? {
            app = app.layer(cors);
        }

        let listen_mode = config.listen_mode();
        info!(listen_mode = ?listen_mode, "API server configured for {}", addr);

        Ok(Self {
            app,
            addr,
            listen_mode,
            handle: Handle::new(),
        })
    }

    /// Run the API server
    pub async fn run(&mut self) -> Result<()> {
        match &self.listen_mode {
            ListenMode::Plain => {
                let listener = TcpListener::bind(self.addr)
                    .await
                    .context("Failed to bind to server address")?;

                info!("[service] listening on {}", self.addr);

                axum::serve(listener, self.app.clone())
                    .await
                    .context("API server error")?;
            }
            ListenMode::Tls { cert_path, key_path } => {
                let tls = RustlsConfig::from_pem_file(cert_path, key_path)
                    .await
                    .with_context(|| format!("Failed to load TLS certificate {} / key {}", cert_path, key_path))?;

                info!("[service] listening on {} (TLS)", self.addr);

                axum_server::bind_rustls(self.addr, tls)
                    .handle(self.handle.clone())
                    .serve(self.app.clone().into_make_service())
                    .await
                    .context("API server error")?;
            }
        }

        Ok(())
    }

    /// Shutdown the API server
    pub async fn shutdown(&mut self) -> Result<()> {
        // Plain listeners stop when the serving future is dropped
        self.handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        info!("API server shutdown initiated");
        Ok(())
    }
}

/// CORS layer from the configuration; none when no origin is allowed
fn cors_layer(config: &Configuration) -> Result<Option<CorsLayer>> {
    if config.cors_allow_origin.is_empty() {
        return Ok(None);
    }

    let origin = if split_list(&config.cors_allow_origin).any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins = split_list(&config.cors_allow_origin)
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {}", o)))
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    let methods = if config.cors_allow_methods.is_empty() {
        vec![Method::GET, Method::HEAD]
    } else {
        split_list(&config.cors_allow_methods)
            .map(|m| {
                Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                    .with_context(|| format!("Invalid CORS method: {}", m))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let headers = if config.cors_allow_headers.trim() == "*" {
        AllowHeaders::any()
    } else {
        let names = split_list(&config.cors_allow_headers)
            .map(|h| HeaderName::from_bytes(h.as_bytes()).with_context(|| format!("Invalid CORS header: {}", h)))
            .collect::<Result<Vec<_>>>()?;
        AllowHeaders::list(names)
    };

    let max_age = Duration::from_secs(u64::try_from(config.cors_max_age).unwrap_or_default());

    Ok(Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(max_age),
    ))
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}
