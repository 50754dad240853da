use crate::auth::{Session, SignIn};
use crate::model::{CardAdvice, SearchResult};
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::bearer_token;
use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

const DEFAULT_REDIRECT: &str = "/dashboard";

pub async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignInParams {
    pub redirect_to: Option<String>,
}

pub async fn sign_in(
    State(state): State<AppState>,
    Query(params): Query<SignInParams>,
) -> Result<Json<SignIn>, ApiError> {
    let redirect_to = params.redirect_to.as_deref().unwrap_or(DEFAULT_REDIRECT);
    Ok(Json(state.identity.sign_in(redirect_to).await?))
}

pub async fn sign_out(State(state): State<AppState>, request: Request<Body>) -> Result<StatusCode, ApiError> {
    let token = match bearer_token(&request) {
        Some(token) => token,
        None if state.identity.is_demo() => String::new(),
        None => return Err(ApiError::NotAuthenticated),
    };
    state.identity.sign_out(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn session(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Json<Option<Session>>, ApiError> {
    let Some(token) = bearer_token(&request) else {
        return Ok(Json(None));
    };
    Ok(Json(state.identity.get_session(&token).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct Suggestions {
    pub suggestions: Vec<String>,
}

pub async fn suggestions(State(state): State<AppState>, Query(params): Query<QueryParams>) -> Json<Suggestions> {
    Json(Suggestions {
        suggestions: state.service.suggestions(&params.q),
    })
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<SearchResult>, ApiError> {
    let result = state.service.search(&params.q).await?;
    info!(
        "'{}': {} products, analysis {:?}",
        result.query,
        result.products.len(),
        result.analysis_source
    );
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct CardParams {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: u64,
}

pub async fn recommend_card(
    State(state): State<AppState>,
    Query(params): Query<CardParams>,
) -> Result<Json<CardAdvice>, ApiError> {
    let category = params.category.trim();
    if category.is_empty() {
        return Err(ApiError::BadRequest("category is required".into()));
    }
    Ok(Json(state.service.card_advice(category, params.amount).await))
}
