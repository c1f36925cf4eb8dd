//! OAuth2 Authorization Code + PKCE sign-in and identity lookup.
//!
//! Both operations soft-fail: any problem is logged and the caller is left
//! anonymous, which is a valid way to use the widget.

pub mod pkce;
pub mod session;

use log::{debug, error, info, warn};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::client::ApiClient;
use crate::domain::User;
use crate::host::{KeyValueStore, Location, RandomSource, StorageError};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};

pub use self::pkce::{challenge_from_verifier, random_string, Pkce};
pub use self::session::{AccessToken, Session};

/// Storage key of the verifier between the redirect and the code exchange.
pub const CODE_VERIFIER_KEY: &str = "pkce_code_verifier";

/// Storage key of the `state` sent with the redirect, checked on the way back.
pub const STATE_KEY: &str = "oauth_state";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Network error: {0}")]
    Transport(#[from] TransportError),

    #[error("Request refused (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Invalid user data")]
    InvalidUser,

    #[error("No PKCE code verifier in storage")]
    MissingVerifier,

    #[error("Returned state does not match the one sent")]
    StateMismatch,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Worth trying again later, as opposed to a permanent refusal.
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::Transport(_) => true,
            AuthError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug)]
pub enum AuthOutcome {
    /// The host was sent to the authorization server; the page will come back
    /// with a `code`.
    Redirected { authorize_url: Url },
    Authenticated,
    Anonymous { reason: AuthError },
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

fn log_failure(operation: &str, err: &AuthError) {
    if err.is_transient() {
        warn!("{} failed: {}", operation, err);
    } else {
        error!("{} failed: {}", operation, err);
    }
}

fn error_message(response: &HttpResponse, fallback: &str) -> String {
    response
        .json::<ErrorEnvelope>()
        .ok()
        .and_then(|envelope| envelope.error_description.or(envelope.error))
        .unwrap_or_else(|| fallback.to_string())
}

impl<T: HttpTransport> ApiClient<T> {
    /// Runs whichever half of the authorization code flow the current URL
    /// calls for. Never fails; problems end in `AuthOutcome::Anonymous`.
    pub async fn authenticate<L, S, R>(
        &mut self,
        location: &mut L,
        store: &mut S,
        rng: &mut R,
    ) -> AuthOutcome
    where
        L: Location + ?Sized,
        S: KeyValueStore + ?Sized,
        R: RandomSource + ?Sized,
    {
        let current = location.href();
        let param = |name: &str| {
            current
                .query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };
        let code = param("code");
        let state = param("state");

        let Some(code) = code else {
            return self.redirect_to_authorize(current, location, store, rng);
        };

        let mut redirect_uri = current;
        redirect_uri.set_query(None);
        location.replace_state(redirect_uri.clone());

        match self
            .exchange_code(&code, state.as_deref(), &redirect_uri, store)
            .await
        {
            Ok(()) => AuthOutcome::Authenticated,
            Err(reason) => {
                log_failure("Token exchange", &reason);
                AuthOutcome::Anonymous { reason }
            }
        }
    }

    pub fn authorize_url(&self, redirect_uri: &Url, state: &str, challenge: &str) -> Url {
        let mut url = self.endpoint("/oauth/authorize");
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", self.client_id())
            .append_pair("redirect_uri", redirect_uri.as_str())
            .append_pair("state", state)
            .append_pair("code_challenge", challenge)
            .append_pair("code_challenge_method", pkce::CHALLENGE_METHOD);
        url
    }

    fn redirect_to_authorize<L, S, R>(
        &self,
        current: Url,
        location: &mut L,
        store: &mut S,
        rng: &mut R,
    ) -> AuthOutcome
    where
        L: Location + ?Sized,
        S: KeyValueStore + ?Sized,
        R: RandomSource + ?Sized,
    {
        let state = random_string(rng);
        let pkce = Pkce::generate(rng);

        let saved = store
            .set_item(CODE_VERIFIER_KEY, &pkce.verifier)
            .and_then(|()| store.set_item(STATE_KEY, &state));
        if let Err(e) = saved {
            let reason = AuthError::Storage(e);
            log_failure("Saving the PKCE verifier", &reason);
            return AuthOutcome::Anonymous { reason };
        }

        let authorize_url = self.authorize_url(&current, &state, &pkce.challenge);
        info!("Redirecting to {} for sign-in", self.endpoint("/oauth/authorize"));
        location.assign(authorize_url.clone());
        AuthOutcome::Redirected { authorize_url }
    }

    async fn exchange_code<S>(
        &mut self,
        code: &str,
        state: Option<&str>,
        redirect_uri: &Url,
        store: &mut S,
    ) -> Result<(), AuthError>
    where
        S: KeyValueStore + ?Sized,
    {
        let verifier = store
            .get_item(CODE_VERIFIER_KEY)?
            .ok_or(AuthError::MissingVerifier)?;
        let expected_state = store.get_item(STATE_KEY)?;
        if expected_state.is_none() || expected_state.as_deref() != state {
            return Err(AuthError::StateMismatch);
        }

        let request = HttpRequest::post_json(
            self.endpoint("/oauth/token"),
            json!({
                "grant_type": "authorization_code",
                "client_id": self.client_id(),
                "code": code,
                "redirect_uri": redirect_uri.as_str(),
                "code_verifier": verifier,
            }),
        );
        let response = self.transport().send(request).await?;

        if !response.is_success() {
            return Err(AuthError::Rejected {
                status: response.status,
                message: error_message(&response, "Token exchange refused"),
            });
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| AuthError::Malformed(e.to_string()))?;
        let token = AccessToken::new(token.access_token);
        debug!("Received {:?}", token);
        self.session_mut().set_access_token(token);

        for key in [CODE_VERIFIER_KEY, STATE_KEY] {
            if let Err(e) = store.remove_item(key) {
                warn!("Failed to remove {} from storage: {}", key, e);
            }
        }
        info!("Signed in");
        Ok(())
    }

    /// The signed-in user, or `None` when anonymous or when the lookup fails.
    pub async fn me(&self) -> Option<User> {
        let Some(token) = self.session().access_token() else {
            debug!("No access token, skipping user lookup");
            return None;
        };

        match self.fetch_me(token).await {
            Ok(user) => Some(user),
            Err(e) => {
                log_failure("Fetching user details", &e);
                None
            }
        }
    }

    async fn fetch_me(&self, token: &AccessToken) -> Result<User, AuthError> {
        let request = HttpRequest::get(self.endpoint("/api/v1/me")).with_bearer(token.as_str());
        let response = self.transport().send(request).await?;

        if !response.is_success() {
            return Err(AuthError::Rejected {
                status: response.status,
                message: error_message(&response, "Error fetching user details"),
            });
        }

        let data: MeResponse = response
            .json()
            .map_err(|e| AuthError::Malformed(e.to_string()))?;
        match data.id {
            Some(id) if !id.is_empty() => Ok(User {
                id,
                email: data.email,
            }),
            _ => Err(AuthError::InvalidUser),
        }
    }
}
