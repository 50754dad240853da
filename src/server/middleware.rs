use crate::auth::Session;
use crate::server::AppState;
use crate::server::error::ApiError;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

/// Bearer token from the Authorization header, with or without the `Bearer ` prefix.
pub fn bearer_token(request: &Request<Body>) -> Option<String> {
    let header = request.headers().get("authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Lets the request through only with a live session, except in demo mode
/// where everything is open. The session lands in the request extensions.
pub async fn require_session(State(state): State<AppState>, mut request: Request<Body>, next: Next) -> Response {
    if state.identity.is_demo() {
        return next.run(request).await;
    }

    let Some(token) = bearer_token(&request) else {
        debug!("No bearer token on {}", request.uri().path());
        return ApiError::NotAuthenticated.into_response();
    };

    match state.identity.get_session(&token).await {
        Ok(Some(session)) => {
            debug!("Authenticated user {}", session.user.id);
            request.extensions_mut().insert::<Session>(session);
            next.run(request).await
        }
        Ok(None) => ApiError::NotAuthenticated.into_response(),
        Err(e) => {
            warn!("Session lookup failed: {}", e);
            ApiError::NotAuthenticated.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder();
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn token_with_and_without_prefix() {
        assert_eq!(bearer_token(&request(Some("Bearer abc"))).as_deref(), Some("abc"));
        assert_eq!(bearer_token(&request(Some("abc"))).as_deref(), Some("abc"));
    }

    #[test]
    fn missing_or_blank_token() {
        assert!(bearer_token(&request(None)).is_none());
        assert!(bearer_token(&request(Some("Bearer "))).is_none());
    }
}
