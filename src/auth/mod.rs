//! Sign-in capability. The real provider is Supabase; without its URL and
//! anon key the app runs in demo mode with a fixed local user.

pub mod supabase;

pub use supabase::SupabaseIdentity;

use crate::config::AppConfig;
use crate::model::AuthError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;

pub const DEMO_USER_ID: &str = "demo-user";
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_TOKEN: &str = "demo-token";

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SignIn {
    Session(Session),
    Redirect { url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn { user_id: String },
    SignedOut,
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, redirect_to: &str) -> Result<SignIn, AuthError>;
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError>;
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
    fn is_demo(&self) -> bool;
}

/// Supabase when both the URL and the anon key are set, demo otherwise.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn IdentityProvider>, AuthError> {
    match (&config.supabase.url, &config.supabase.anon_key) {
        (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => {
            let client = Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_seconds))
                .build()
                .map_err(|e| AuthError::Http(e.to_string()))?;
            info!("Using Supabase identity provider at {}", url);
            Ok(Arc::new(SupabaseIdentity::new(url, key, client)?))
        }
        _ => {
            info!("Supabase not configured, running in demo mode");
            Ok(Arc::new(DemoIdentity::new()))
        }
    }
}

/// Stands in for the identity provider: sign-in always succeeds as the demo
/// user, but no token ever resolves to a session.
pub struct DemoIdentity {
    events: broadcast::Sender<AuthEvent>,
}

impl DemoIdentity {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { events }
    }

    pub fn session() -> Session {
        Session {
            access_token: Some(DEMO_TOKEN.to_string()),
            user: User {
                id: DEMO_USER_ID.to_string(),
                email: Some(DEMO_EMAIL.to_string()),
            },
        }
    }
}

impl Default for DemoIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for DemoIdentity {
    async fn sign_in(&self, _redirect_to: &str) -> Result<SignIn, AuthError> {
        let _ = self.events.send(AuthEvent::SignedIn {
            user_id: DEMO_USER_ID.to_string(),
        });
        Ok(SignIn::Session(Self::session()))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    async fn get_session(&self, _access_token: &str) -> Result<Option<Session>, AuthError> {
        Ok(None)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    fn is_demo(&self) -> bool {
        true
    }
}
