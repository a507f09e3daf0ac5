/*
 * Responsibility
 * - GET /me: echo the authenticated identity
 * - GET /admin: same, but requires ROLE_ADMIN
 */
use axum::Json;

use crate::api::v1::dto::me::MeResponse;
use crate::api::v1::extractors::Authenticated;
use crate::error::AppError;

pub const ADMIN_AUTHORITY: &str = "ROLE_ADMIN";

pub async fn me(auth: Authenticated) -> Json<MeResponse> {
    Json(MeResponse::from(&auth.0))
}

pub async fn admin(auth: Authenticated) -> Result<Json<MeResponse>, AppError> {
    let identity = auth.require_authority(ADMIN_AUTHORITY)?;
    Ok(Json(MeResponse::from(identity)))
}
