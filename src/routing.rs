use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use axum::error_handling::HandleErrorLayer;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::net::{error, layer};
use crate::state::ArcShared;

mod handle;

async fn ping() -> (StatusCode, &'static str) {
    (StatusCode::OK, "pong")
}

pub fn routes(state: &ArcShared) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .nest("/auth", handle::auth::routes())
        .nest("/api", handle::face::routes())
        .layer(ServiceBuilder::new()
            .layer(layer::RIDLayer::new())
            .layer(TraceLayer::new_for_http()
                .make_span_with(layer::make_span_with)
                .on_request(layer::on_request)
                .on_response(layer::on_response)
                .on_failure(layer::on_failure))
            .layer(HandleErrorLayer::new(error::handle_error))
            .layer(TimeoutLayer::new(Duration::new(90, 0))))
        .with_state(state.clone())
}
