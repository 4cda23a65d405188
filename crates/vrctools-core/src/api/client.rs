//! API client for communicating with the VRChat REST API.
//!
//! This module provides the `VrcClient` struct: it restores or establishes
//! the cookie session and implements `AvatarApi` on top of it.

use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::auth::{CredentialSupplier, Credentials, TokenStore};
use crate::avatars::AvatarApi;
use crate::config::Config;
use crate::models::{AuthUserResponse, Avatar, AvatarQuery, CurrentUser, TwoFactorMethod, TwoFactorVerified};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) GET requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Session cookie issued on a successful login
pub const AUTH_COOKIE: &str = "auth";

/// Cookie issued after a verified second factor; lets later logins skip it
pub const TWO_FACTOR_COOKIE: &str = "twoFactorAuth";

const SESSION_COOKIES: [&str; 2] = [AUTH_COOKIE, TWO_FACTOR_COOKIE];

const NO_QUERY: &[(&str, &str)] = &[];

/// Bytes JavaScript's `encodeURIComponent` escapes. VRChat expects Basic
/// credentials encoded this way before base64.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

fn basic_auth_value(username: &str, password: &str) -> String {
    let pair = format!("{}:{}", encode_uri_component(username), encode_uri_component(password));
    format!("Basic {}", BASE64.encode(pair))
}

/// `Max-Age` wins over `Expires`, as in browsers
fn cookie_expiry(max_age: Option<Duration>, expires: Option<SystemTime>) -> Option<DateTime<Utc>> {
    max_age
        .and_then(|age| chrono::Duration::from_std(age).ok())
        .map(|age| Utc::now() + age)
        .or_else(|| expires.map(DateTime::<Utc>::from))
}

fn is_unauthorized(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized(_)))
}

/// API client for VRChat.
///
/// Holds the token store and the credential supplier; the supplier is only
/// consulted when the stored session is missing or rejected.
pub struct VrcClient {
    client: Client,
    base_url: String,
    store: TokenStore,
    supplier: Box<dyn CredentialSupplier>,
}

impl VrcClient {
    /// Create a client. No request is made until `get_current_user`.
    pub fn new(config: &Config, store: TokenStore, supplier: Box<dyn CredentialSupplier>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(config.app.user_agent())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            store,
            supplier,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `Cookie` header value carrying the stored session cookies
    fn session_cookie_header(&self) -> Option<String> {
        let pairs: Vec<String> = SESSION_COOKIES
            .iter()
            .filter_map(|name| self.store.get(name).map(|value| format!("{}={}", name, value)))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session_cookie_header() {
            Some(cookies) => request.header(header::COOKIE, cookies),
            None => request,
        }
    }

    /// Save any session cookies the server set on `response`
    fn persist_cookies(&mut self, response: &Response) -> Result<()> {
        let updates: Vec<(String, String, Option<DateTime<Utc>>)> = response
            .cookies()
            .filter(|cookie| SESSION_COOKIES.contains(&cookie.name()))
            .map(|cookie| {
                (
                    cookie.name().to_string(),
                    cookie.value().to_string(),
                    cookie_expiry(cookie.max_age(), cookie.expires()),
                )
            })
            .collect();

        for (name, value, expires_at) in updates {
            if value.is_empty() {
                self.store.remove(&name)?;
            } else {
                self.store.set(&name, &value, expires_at)?;
            }
            debug!(cookie = %name, "Session cookie updated");
        }
        Ok(())
    }

    /// Drop the rejected session cookie; the two-factor cookie outlives it
    fn clear_session(&mut self) -> Result<()> {
        self.store.remove(AUTH_COOKIE)?;
        Ok(())
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    // ===== Authentication =====

    /// Return the signed-in user, reusing the stored session when the
    /// server still accepts it and logging in with fresh credentials
    /// otherwise.
    pub async fn get_current_user(&mut self) -> Result<CurrentUser> {
        if self.store.get(AUTH_COOKIE).is_some() {
            match self.fetch_auth_user(None).await {
                Ok(AuthUserResponse::User(user)) => {
                    debug!(user_id = %user.id, "Stored session accepted");
                    return Ok(user);
                }
                Ok(AuthUserResponse::TwoFactor(_)) => {
                    debug!("Stored session still awaits a second factor");
                }
                Err(e) if is_unauthorized(&e) => {
                    info!("Stored session rejected, logging in again");
                    self.clear_session()?;
                }
                Err(e) => return Err(e),
            }
        }

        self.login().await
    }

    async fn login(&mut self) -> Result<CurrentUser> {
        let credentials = self.supplier.credentials()?;
        info!(username = %credentials.username, "Logging in");

        match self.fetch_auth_user(Some(&credentials)).await? {
            AuthUserResponse::User(user) => Ok(user),
            AuthUserResponse::TwoFactor(challenge) => {
                if credentials.two_factor_code.is_empty() {
                    return Err(ApiError::TwoFactorRequired.into());
                }

                let method = challenge.preferred_method().ok_or_else(|| {
                    ApiError::InvalidResponse(format!(
                        "No supported two-factor method in {:?}",
                        challenge.methods
                    ))
                })?;
                self.verify_two_factor(method, &credentials.two_factor_code)
                    .await?;

                match self.fetch_auth_user(None).await? {
                    AuthUserResponse::User(user) => Ok(user),
                    AuthUserResponse::TwoFactor(_) => Err(ApiError::TwoFactorRequired.into()),
                }
            }
        }
    }

    async fn fetch_auth_user(&mut self, credentials: Option<&Credentials>) -> Result<AuthUserResponse> {
        let mut request = self.with_session(self.client.get(self.url("/auth/user")));
        if let Some(creds) = credentials {
            request = request.header(
                header::AUTHORIZATION,
                basic_auth_value(&creds.username, &creds.password),
            );
        }

        let response = request
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to send authentication request")?;

        self.persist_cookies(&response)?;
        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .context("Failed to parse current user response")
    }

    async fn verify_two_factor(&mut self, method: TwoFactorMethod, code: &str) -> Result<()> {
        let url = self.url(&format!("/auth/twofactorauth/{}/verify", method.path_segment()));
        debug!(method = method.path_segment(), "Verifying second factor");

        let response = self
            .with_session(self.client.post(&url))
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to send two-factor verification")?;

        self.persist_cookies(&response)?;
        let response = Self::check_response(response).await?;

        let verified: TwoFactorVerified = response
            .json()
            .await
            .context("Failed to parse two-factor verification response")?;

        if verified.verified {
            Ok(())
        } else {
            Err(ApiError::TwoFactorRequired.into())
        }
    }

    // ===== Requests =====

    async fn get<T: DeserializeOwned, Q: Serialize + ?Sized>(&self, url: &str, query: &Q) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .with_session(self.client.get(url))
                .query(query)
                .send()
                .await
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            if response.status().as_u16() != 429 {
                let response = Self::check_response(response).await?;
                return response
                    .json()
                    .await
                    .with_context(|| format!("Failed to parse JSON response from {}", url));
            }

            retries += 1;
            if retries > MAX_RATE_LIMIT_RETRIES {
                return Err(ApiError::RateLimited.into());
            }
            warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            backoff_ms *= 2;
        }
    }
}

#[async_trait]
impl AvatarApi for VrcClient {
    async fn get_own_avatar(&self, user_id: &str) -> Result<Avatar> {
        let url = self.url(&format!("/users/{}/avatar", user_id));
        self.get(&url, NO_QUERY).await
    }

    async fn search_avatars(&self, query: &AvatarQuery) -> Result<Vec<Avatar>> {
        let url = self.url("/avatars");
        self.get(&url, query).await
    }

    async fn delete_avatar(&self, avatar_id: &str) -> Result<()> {
        let url = self.url(&format!("/avatars/{}", avatar_id));
        let response = self
            .with_session(self.client.delete(&url))
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        Self::check_response(response).await?;
        Ok(())
    }
}
