//! HTTP preview server.
//!
//! Serves a built site directory over HTTP for local preview. The server
//! is a thin file server: it never renders anything itself, so a rebuild
//! followed by a browser refresh is the full development loop.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Built site directory to serve.
    pub site_dir: PathBuf,
}

impl ServerConfig {
    /// Derive a server configuration from a loaded site configuration.
    #[must_use]
    pub fn from_site_config(config: &stela_config::Config, host: String, port: u16) -> Self {
        Self {
            host,
            port,
            site_dir: config.paths.site_dir.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            site_dir: PathBuf::from("site"),
        }
    }
}

/// Error while starting or running the preview server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Site directory missing, run a build first.
    #[error("Site directory not found: {}", .0.display())]
    SiteNotFound(PathBuf),
    /// Invalid host/port combination.
    #[error("Invalid bind address: {0}")]
    BindAddress(#[from] std::net::AddrParseError),
    /// Socket or filesystem failure.
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the preview server until Ctrl-C.
///
/// # Errors
///
/// Returns error if the site directory does not exist or the listener
/// cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    if !config.site_dir.is_dir() {
        return Err(ServerError::SiteNotFound(config.site_dir));
    }

    let app = site_router(&config.site_dir);
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, site_dir = %config.site_dir.display(), "serving site");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Static file router over a built site directory.
///
/// `ServeDir` resolves directory requests to their `index.html`.
fn site_router(site_dir: &std::path::Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(site_dir))
        .layer(TraceLayer::new_for_http())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install Ctrl-C handler");
        return;
    }
    tracing::info!("shutdown signal received, stopping server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::create_dir(dir.path().join("k8s")).unwrap();
        std::fs::write(dir.path().join("k8s/index.html"), "<h1>k8s</h1>").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_serves_pages() {
        let dir = site();
        let app = site_router(dir.path());
        let response = app
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_directory_resolves_to_index() {
        let dir = site();
        let app = site_router(dir.path());
        let response = app
            .oneshot(Request::get("/k8s/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_page_is_404() {
        let dir = site();
        let app = site_router(dir.path());
        let response = app
            .oneshot(Request::get("/nope.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_site_dir_rejected() {
        let config = ServerConfig {
            site_dir: PathBuf::from("/nonexistent/site"),
            ..ServerConfig::default()
        };
        let err = run_server(config).await.unwrap_err();
        assert!(matches!(err, ServerError::SiteNotFound(_)));
    }
}
