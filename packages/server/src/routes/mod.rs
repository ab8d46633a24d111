use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::benchmark::index))
        .route("/benchmarks", get(handlers::benchmark::list_benchmarks))
        .merge(benchmark_routes())
        .route("/user/{id}", get(handlers::user::get_user_page))
        .merge(auth_routes())
}

fn benchmark_routes() -> Router<AppState> {
    let upload = Router::new()
        .route(
            "/benchmark",
            get(handlers::benchmark::upload_form).post(handlers::benchmark::create_benchmark),
        )
        .layer(handlers::benchmark::upload_body_limit());

    let by_id = Router::new()
        .route(
            "/benchmark/{id}",
            get(handlers::benchmark::get_benchmark).delete(handlers::benchmark::delete_benchmark),
        )
        .route(
            "/benchmark/{id}/download",
            get(handlers::benchmark::download_benchmark),
        );

    upload.merge(by_id)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(handlers::auth::login))
        .route("/login/callback", get(handlers::auth::login_callback))
        .route("/logout", get(handlers::auth::logout))
}
