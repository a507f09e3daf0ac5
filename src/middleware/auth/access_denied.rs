//! Response written when an authenticated identity lacks a required authority.
//!
//! The body is plain UTF-8 text even though the content type says JSON;
//! existing clients match on it byte for byte.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

pub const CONTENT_TYPE: &str = "application/json; charset=UTF-8";
pub const MESSAGE: &str = "해당 리소스에 접근할 권한이 존재하지 않습니다.";

pub fn respond() -> Response {
    (
        StatusCode::FORBIDDEN,
        [(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE))],
        MESSAGE,
    )
        .into_response()
}
