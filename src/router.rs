use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    api::{courses, health_checks, lessons, payments, subscriptions, users},
    app::App,
};

/// Resource routes, mounted under `/api`. PUT and PATCH share one partial
/// update handler.
fn api_router() -> Router<App> {
    Router::new()
        .route("/users", post(users::register))
        .route("/users/token", post(users::token))
        .route(
            "/users/{id}",
            get(users::show).patch(users::update).put(users::update),
        )
        .route("/courses", get(courses::index).post(courses::create))
        .route(
            "/courses/{id}",
            get(courses::show)
                .patch(courses::update)
                .put(courses::update)
                .delete(courses::destroy),
        )
        .route("/lessons", get(lessons::index).post(lessons::create))
        .route(
            "/lessons/{id}",
            get(lessons::show)
                .patch(lessons::update)
                .put(lessons::update)
                .delete(lessons::destroy),
        )
        .route("/payments", get(payments::index).post(payments::create))
        .route("/payments/{id}", get(payments::show))
        .route(
            "/subscriptions",
            get(subscriptions::index).post(subscriptions::create),
        )
        .route(
            "/subscriptions/{id}",
            get(subscriptions::show)
                .patch(subscriptions::update)
                .put(subscriptions::update)
                .delete(subscriptions::destroy),
        )
}

pub fn router(app: App) -> Router {
    Router::new()
        .route("/liveness", get(health_checks::liveness))
        .route("/readiness", get(health_checks::readiness))
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
