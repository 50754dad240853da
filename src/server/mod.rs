//! HTTP surface: auth passthrough plus the search, suggestion and card routes.

pub mod error;
pub mod middleware;
pub mod routes;

use crate::auth::IdentityProvider;
use crate::service::SearchService;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
    pub identity: Arc<dyn IdentityProvider>,
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/search", get(routes::search))
        .route("/api/suggestions", get(routes::suggestions))
        .route("/api/cards/recommend", get(routes::recommend_card))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/auth/sign-in", post(routes::sign_in))
        .route("/api/auth/sign-out", post(routes::sign_out))
        .route("/api/auth/session", get(routes::session))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(bind_addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Analyzer, CardRules};
    use crate::auth::{AuthEvent, DemoIdentity, Session, SignIn, User};
    use crate::config::AppConfig;
    use crate::model::AuthError;
    use crate::provider::ProviderChain;
    use crate::scraper::ListingAggregator;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    /// Non-demo provider that knows exactly one token.
    struct OneTokenIdentity {
        events: broadcast::Sender<AuthEvent>,
    }

    #[async_trait::async_trait]
    impl IdentityProvider for OneTokenIdentity {
        async fn sign_in(&self, redirect_to: &str) -> Result<SignIn, AuthError> {
            Ok(SignIn::Redirect {
                url: format!("https://auth.test/authorize?redirect_to={}", redirect_to),
            })
        }

        async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
            Err(AuthError::Status(500))
        }

        async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
            Ok((access_token == "good").then(|| Session {
                access_token: Some(access_token.into()),
                user: User {
                    id: "u1".into(),
                    email: None,
                },
            }))
        }

        fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
            self.events.subscribe()
        }

        fn is_demo(&self) -> bool {
            false
        }
    }

    fn state(aggregator: ListingAggregator, identity: Arc<dyn IdentityProvider>) -> AppState {
        let config = AppConfig::default();
        let analyzer = Analyzer::new(CardRules::from_config(&config), ProviderChain::default());
        AppState {
            service: Arc::new(SearchService::new(aggregator, analyzer)),
            identity,
        }
    }

    fn demo_app() -> Router {
        let aggregator = ListingAggregator::from_config(&AppConfig::default()).unwrap();
        router(state(aggregator, Arc::new(DemoIdentity::new())))
    }

    fn guarded_app() -> Router {
        let aggregator = ListingAggregator::from_config(&AppConfig::default()).unwrap();
        let (events, _) = broadcast::channel(4);
        router(state(aggregator, Arc::new(OneTokenIdentity { events })))
    }

    async fn call(app: Router, method: &str, uri: &str, token: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn json(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = call(demo_app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn demo_search_needs_no_token() {
        let (status, body) = call(demo_app(), "GET", "/api/search?q=iphone%2015%20pro%20max", None).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["products"].as_array().unwrap().len(), 4);
        assert_eq!(body["analysisSource"], "local");
        assert_eq!(body["bestDeal"]["productIndex"], 0);
        assert!(body.get("rawResponse").is_none());
    }

    #[tokio::test]
    async fn blank_query_is_bad_request() {
        let (status, body) = call(demo_app(), "GET", "/api/search?q=%20%20", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json(&body)["error"].is_string());
    }

    #[tokio::test]
    async fn exhausted_fallbacks_ask_for_retry() {
        let app = router(state(ListingAggregator::new(Vec::new()), Arc::new(DemoIdentity::new())));
        let (status, body) = call(app, "GET", "/api/search?q=kettle", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json(&body)["retry"], true);
    }

    #[tokio::test]
    async fn guarded_routes_need_a_live_session() {
        let (status, _) = call(guarded_app(), "GET", "/api/suggestions?q=iphone", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(guarded_app(), "GET", "/api/suggestions?q=iphone", Some("stale")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = call(guarded_app(), "GET", "/api/suggestions?q=iphone", Some("good")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!json(&body)["suggestions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn demo_sign_in_and_out() {
        let (status, body) = call(demo_app(), "POST", "/api/auth/sign-in", None).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["kind"], "session");
        assert_eq!(body["user"]["id"], "demo-user");

        let (status, _) = call(demo_app(), "POST", "/api/auth/sign-out", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(demo_app(), "GET", "/api/auth/session", Some("demo-token")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), Value::Null);
    }

    #[tokio::test]
    async fn sign_out_without_token_is_unauthorized() {
        let (status, body) = call(guarded_app(), "POST", "/api/auth/sign-out", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(json(&body)["error"].is_string());
    }

    #[tokio::test]
    async fn sign_in_defaults_to_dashboard() {
        let (status, body) = call(guarded_app(), "POST", "/api/auth/sign-in", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["url"], "https://auth.test/authorize?redirect_to=/dashboard");
    }

    #[tokio::test]
    async fn provider_sign_out_failure_is_bad_gateway() {
        let (status, _) = call(guarded_app(), "POST", "/api/auth/sign-out", Some("good")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, body) = call(guarded_app(), "POST", "/api/auth/sign-in?redirectTo=%2Fhome", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["url"], "https://auth.test/authorize?redirect_to=/home");
    }

    #[tokio::test]
    async fn card_recommendation_falls_back_locally() {
        let (status, body) = call(demo_app(), "GET", "/api/cards/recommend?category=Dining&amount=1000", None).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["cardName"], "SBI SimplyCLICK");
        assert_eq!(body["calculatedSavings"], "₹50");

        let (status, _) = call(demo_app(), "GET", "/api/cards/recommend?amount=1000", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
