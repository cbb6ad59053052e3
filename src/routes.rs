use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;

use dz::models::AppState;
use crate::handlers::regions;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(regions::root_get))
        .route("/regions", get(regions::regions_get).post(regions::regions_create_post))
        .route("/regions/all", get(regions::regions_all_get))
        .route("/regions/:region_id/focus", get(regions::region_focus_get))
        .route("/regions/:region_id/delete", post(regions::region_delete_post))
        .route("/api/suggestions", get(regions::suggestions_get))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // region lists change on every write; never serve them from cache
                .layer(SetResponseHeaderLayer::if_not_present(
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                )),
        )
        .with_state(state)
}
