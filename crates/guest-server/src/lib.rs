//! # guest-server
//!
//! HTTP surface for the guest list.
//!
//! One resource, `/guest-list`:
//! - `OPTIONS` answers the CORS preflight with 204
//! - `GET` returns `{ households, updatedAt }`
//! - `POST` takes `{ households }` (full replace) or `{ upserts, deletes }`
//!
//! Every response is JSON and carries `Access-Control-Allow-Origin: *`.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Path the endpoint is mounted on.
pub const GUEST_LIST_PATH: &str = "/guest-list";

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let guest_list = get(routes::load_guest_list)
        .post(routes::save_guest_list)
        .options(routes::preflight)
        .fallback(routes::method_not_allowed);

    Router::new()
        .route(GUEST_LIST_PATH, guest_list)
        .layer(middleware::map_response(routes::allow_any_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an I/O error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
