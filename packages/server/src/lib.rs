pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod oauth;
pub mod reconcile;
pub mod routes;
pub mod services;
pub mod state;
pub mod summarizer;

use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Benchmark Sharing API",
        version = "1.0.0",
        description = "Upload, browse and compare MangoHud benchmark captures"
    ),
    paths(
        handlers::benchmark::list_benchmarks,
        handlers::benchmark::upload_form,
        handlers::benchmark::create_benchmark,
        handlers::benchmark::get_benchmark,
        handlers::benchmark::download_benchmark,
        handlers::benchmark::delete_benchmark,
        handlers::user::get_user_page,
        handlers::auth::login,
        handlers::auth::login_callback,
        handlers::auth::logout,
    ),
    tags(
        (name = "Benchmarks", description = "Upload, view, download and delete benchmarks"),
        (name = "Users", description = "User pages"),
        (name = "Auth", description = "Discord login and sessions"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let api = ApiDoc::openapi();

    routes::routes()
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
        .layer(TraceLayer::new_for_http())
}
