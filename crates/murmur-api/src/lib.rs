//! HTTP surface and services for murmur.

pub mod auth;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod private;
pub mod public;
pub mod services;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::auth::AppState;
use crate::middleware::require_auth;

/// Prefix under which every route is also served.
pub const BASE_PATH: &str = "/chat/api";

/// Every route, with authentication applied to all but registration. The
/// same routes answer at the root and under [`BASE_PATH`].
pub fn router(state: AppState) -> Router {
    let routes = versioned_routes(state);

    Router::new()
        .merge(routes.clone())
        .nest(BASE_PATH, routes)
}

fn versioned_routes(state: AppState) -> Router {
    let open_routes = Router::new()
        .route("/v1/auth/register", post(auth::register))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route(
            "/v1/public/messages",
            get(public::get_messages).post(public::send_message),
        )
        .route(
            "/v1/private/messages",
            get(private::get_messages).post(private::send_message),
        )
        .route("/v1/private/users", get(private::list_users))
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(open_routes).merge(protected_routes)
}
