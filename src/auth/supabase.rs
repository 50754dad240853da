// Supabase GoTrue endpoints used for Google OAuth sign-in
use crate::auth::{AuthEvent, EVENT_CAPACITY, IdentityProvider, Session, SignIn, User};
use crate::model::AuthError;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::collections::HashSet;
use tokio::sync::{Mutex, broadcast};
use tracing::{info, warn};

pub const OAUTH_PROVIDER: &str = "google";

pub struct SupabaseIdentity {
    base_url: Url,
    anon_key: String,
    client: Client,
    events: broadcast::Sender<AuthEvent>,
    /// Tokens that already resolved to a user; `SignedIn` fires once per token.
    active: Mutex<HashSet<String>>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl SupabaseIdentity {
    pub fn new(url: &str, anon_key: &str, client: Client) -> Result<Self, AuthError> {
        let base_url = Url::parse(url.trim_end_matches('/'))
            .map_err(|e| AuthError::InvalidUrl(format!("{}: {}", url, e)))?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            base_url,
            anon_key: anon_key.to_string(),
            client,
            events,
            active: Mutex::new(HashSet::new()),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(path)
            .map_err(|e| AuthError::InvalidUrl(e.to_string()))
    }

    pub fn authorize_url(&self, redirect_to: &str) -> Result<String, AuthError> {
        let mut url = self.endpoint("/auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", OAUTH_PROVIDER)
            .append_pair("redirect_to", redirect_to);
        Ok(url.to_string())
    }

    async fn mark_signed_in(&self, access_token: &str, user_id: &str) {
        if self.active.lock().await.insert(access_token.to_string()) {
            info!("Session started for user {}", user_id);
            let _ = self.events.send(AuthEvent::SignedIn {
                user_id: user_id.to_string(),
            });
        }
    }

    async fn forget(&self, access_token: &str) -> bool {
        self.active.lock().await.remove(access_token)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for SupabaseIdentity {
    /// OAuth happens in the browser, so sign-in is always a redirect.
    async fn sign_in(&self, redirect_to: &str) -> Result<SignIn, AuthError> {
        Ok(SignIn::Redirect {
            url: self.authorize_url(redirect_to)?,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.endpoint("/auth/v1/logout")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Supabase logout returned {}", response.status());
            return Err(AuthError::Status(response.status().as_u16()));
        }
        self.forget(access_token).await;
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        let response = self
            .client
            .get(self.endpoint("/auth/v1/user")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                if self.forget(access_token).await {
                    let _ = self.events.send(AuthEvent::SignedOut);
                }
                return Ok(None);
            }
            status if !status.is_success() => return Err(AuthError::Status(status.as_u16())),
            _ => {}
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;
        self.mark_signed_in(access_token, &user.id).await;
        Ok(Some(Session {
            access_token: Some(access_token.to_string()),
            user: User {
                id: user.id,
                email: user.email,
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
