pub use crate::common::RouteResult;

use std::sync::Arc;

use axum::{routing::on, Router};
use measurement::store::MeasurementStore;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod common;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Clone)]
pub struct WebState {
    pub store: Arc<dyn MeasurementStore>,
}

impl WebState {
    pub fn new<S: MeasurementStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// All routes of the service, ready to be served.
pub fn app(state: WebState) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(on(common::METHOD_FILTER_ALL, common::route_not_found))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listener: TcpListener, state: WebState) -> std::io::Result<()> {
    log::info!("Listening on {}.", listener.local_addr()?);
    axum::serve(listener, app(state).into_make_service()).await
}

pub async fn start_web_server<A: ToSocketAddrs>(state: WebState, address: A) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    serve(listener, state).await
}
