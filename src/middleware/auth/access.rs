//! Bearer authentication stage: verify the access token and put the
//! resulting `AuthenticatedIdentity` into request extensions.
//!
//! Exempt paths pass through untouched. A request without an `Authorization`
//! header passes through without an identity; handlers that need one reject it via
//! the `Authenticated` extractor. Any token error ends the request with 401.

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::AuthOutcome;
use crate::state::AppState;

/// Apply authentication to every route registered on `router` so far.
///
/// ```ignore
/// let router = Router::new().nest("/api/v1", api::v1::routes());
/// let router = middleware::auth::access::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let outcome = state
        .authenticator
        .authenticate(original_uri.path(), req.headers())
        .await?;

    if let AuthOutcome::Authenticated(identity) = outcome {
        // middleware -> extractor
        req.extensions_mut().insert(identity);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::v1::extractors::Authenticated;
    use crate::middleware::auth::access_denied;
    use crate::test_support::{self, SECRET};
    use axum::http::{StatusCode, header};
    use axum::routing::get;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::services::auth::{FixedClock, TokenCodec};

    async fn todos(auth: Authenticated) -> String {
        format!("todos of {}", auth.0.username())
    }

    async fn admin(auth: Authenticated) -> Result<&'static str, AppError> {
        auth.require_authority("ROLE_ADMIN")?;
        Ok("admin area")
    }

    async fn login() -> &'static str {
        "login page"
    }

    async fn open() -> &'static str {
        "open"
    }

    fn app() -> Router {
        let state = test_support::state();
        let router = Router::new()
            .route("/api/v1/todos", get(todos))
            .route("/api/v1/admin", get(admin))
            .route("/api/v1/auth/login", get(login))
            .route("/api/v1/open", get(open));
        apply(router, state.clone()).with_state(state)
    }

    fn get_req(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn read(res: Response) -> (StatusCode, String) {
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn error_code(body: &str) -> String {
        let v: serde_json::Value = serde_json::from_str(body).unwrap();
        v["error"]["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn anonymous_request_is_401_not_403() {
        let res = app().oneshot(get_req("/api/v1/todos", None)).await.unwrap();
        let (status, body) = read(res).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "UNAUTHORIZED");
        assert_ne!(body, access_denied::MESSAGE);
    }

    #[tokio::test]
    async fn anonymous_request_reaches_open_handler() {
        let res = app().oneshot(get_req("/api/v1/open", None)).await.unwrap();
        assert_eq!(read(res).await, (StatusCode::OK, "open".to_string()));
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_identity() {
        let token = test_support::codec().issue_access_token("alice").unwrap();

        let res = app()
            .oneshot(get_req("/api/v1/todos", Some(&token)))
            .await
            .unwrap();
        assert_eq!(read(res).await, (StatusCode::OK, "todos of alice".to_string()));
    }

    #[tokio::test]
    async fn missing_authority_gets_access_denied_response() {
        let token = test_support::codec().issue_access_token("alice").unwrap();

        let res = app()
            .oneshot(get_req("/api/v1/admin", Some(&token)))
            .await
            .unwrap();
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "application/json; charset=UTF-8"
        );
        let (status, body) = read(res).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "해당 리소스에 접근할 권한이 존재하지 않습니다.");
    }

    #[tokio::test]
    async fn admin_authority_passes_authorization() {
        let token = test_support::codec().issue_access_token("root").unwrap();

        let res = app()
            .oneshot(get_req("/api/v1/admin", Some(&token)))
            .await
            .unwrap();
        assert_eq!(read(res).await, (StatusCode::OK, "admin area".to_string()));
    }

    #[tokio::test]
    async fn expired_token_is_rejected_even_on_open_routes() {
        let expired = TokenCodec::new(SECRET)
            .unwrap()
            .with_clock(Arc::new(FixedClock(1_000)))
            .issue_access_token("alice")
            .unwrap();

        let res = app()
            .oneshot(get_req("/api/v1/open", Some(&expired)))
            .await
            .unwrap();
        let (status, body) = read(res).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "JWT_EXPIRED");
    }

    #[tokio::test]
    async fn forged_token_is_signature_error() {
        let forged = TokenCodec::new("fedcba9876543210fedcba9876543210")
            .unwrap()
            .issue_access_token("root")
            .unwrap();

        let res = app()
            .oneshot(get_req("/api/v1/todos", Some(&forged)))
            .await
            .unwrap();
        let (status, body) = read(res).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "JWT_SIGNATURE");
    }

    #[tokio::test]
    async fn unknown_subject_is_401() {
        let token = test_support::codec().issue_access_token("ghost").unwrap();

        let res = app()
            .oneshot(get_req("/api/v1/todos", Some(&token)))
            .await
            .unwrap();
        let (status, body) = read(res).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "USER_NOT_FOUND");
    }

    fn raw_auth_req(uri: &str, authorization: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, authorization)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn empty_bearer_credential_is_jwt_not_found() {
        let res = app()
            .oneshot(raw_auth_req("/api/v1/todos", "Bearer "))
            .await
            .unwrap();
        let (status, body) = read(res).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "JWT_NOT_FOUND");
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected_even_on_open_routes() {
        let res = app()
            .oneshot(raw_auth_req("/api/v1/open", "Basic dXNlcjpwYXNz"))
            .await
            .unwrap();
        let (status, body) = read(res).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "JWT_MALFORMED");
    }

    #[tokio::test]
    async fn exempt_path_ignores_bad_token() {
        let res = app()
            .oneshot(get_req("/api/v1/auth/login", Some("not.a.token")))
            .await
            .unwrap();
        assert_eq!(read(res).await, (StatusCode::OK, "login page".to_string()));
    }
}
