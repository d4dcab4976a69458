//! Router assembly and OpenAPI document.

use crate::handlers::{self, AppState};
use crate::models::{CreatePhoneRequest, ErrorResponse, PhoneRecord, UpdatePhoneRequest};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Request bodies are tiny: a phone and a 255-character address.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(title = "Phone-Address Service", version = "1.0.0"),
    paths(
        handlers::create_phone,
        handlers::get_phone,
        handlers::update_phone,
        handlers::delete_phone
    ),
    components(schemas(PhoneRecord, CreatePhoneRequest, UpdatePhoneRequest, ErrorResponse)),
    tags((name = "phones", description = "Phone to address mappings"))
)]
pub struct ApiDoc;

/// CRUD routes for `/phones`.
///
/// Returned unbound so the binary can add rate limiting to these routes only.
pub fn phone_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/phones", post(handlers::create_phone))
        .route(
            "/phones/:phone",
            get(handlers::get_phone)
                .put(handlers::update_phone)
                .delete(handlers::delete_phone),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// Full application: health checks, docs and the given phone routes.
pub fn app(state: Arc<AppState>, phones: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/health/ready", get(handlers::ready))
        .merge(phones)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Application with the default phone routes and no rate limiting.
pub fn router(state: Arc<AppState>) -> Router {
    app(state, phone_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_phone_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/phones"));
        assert!(doc.paths.paths.contains_key("/phones/{phone}"));
    }
}
