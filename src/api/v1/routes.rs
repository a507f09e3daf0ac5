/*
 * Responsibility
 * - v1 URL structure
 * - the auth prefix is exempt; everything else goes through bearer auth
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    auth::refresh,
    me::{admin, me},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/refresh", post(refresh))
        .route("/me", get(me))
        .route("/admin", get(admin))
}
