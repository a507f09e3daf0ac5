/*
 * Responsibility
 * - POST /auth/refresh: redeem a refresh token for a new token pair
 * - The subject is re-resolved so deleted accounts cannot refresh
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{info, warn};

use crate::api::v1::dto::token::{RefreshRequest, TokenResponse};
use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "refresh request body rejected");
        AppError::from(rejection)
    })?;

    let subject = state.tokens.subject_of(&req.refresh_token).map_err(|err| {
        warn!(kind = err.code(), "refresh token rejected");
        AuthError::from(err)
    })?;

    let principal = state
        .users
        .load_user_by_name(&subject)
        .await
        .map_err(AuthError::from)?;

    let pair = state.tokens.issue_token_pair(&principal.username)?;
    info!(user = %principal.username, "token pair refreshed");

    Ok(Json(TokenResponse::from(pair)))
}
