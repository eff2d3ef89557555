//! HTTP client for the campus API.
//!
//! Every request goes through [`ApiClient::send`], which attaches the stored
//! bearer token and reacts to a 401 by dropping the credential and sending
//! the user to the login route.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use super::navigator::{Navigator, LOGIN_ROUTE};
use super::store::{CredentialStore, SessionUser, StoredCredential};
use super::ClientError;
use crate::db::Role;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("campus-client/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Deserialize)]
struct ErrorPayload {
    code: String,
    message: String,
}

/// API client with a persistent credential.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl ApiClient {
    /// Create a client for the server at `base_url`.
    pub fn new(
        base_url: &str,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            store,
            navigator,
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base URL.
    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a request through the interceptor.
    ///
    /// Returns the response only for 2xx statuses. A 401 clears the store,
    /// navigates to the login route and yields [`ClientError::Unauthorized`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let mut request = self.http.request(method.clone(), self.url(path)?);
        if let Some(credential) = self.store.load()? {
            request = request.bearer_auth(&credential.token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let (code, message) = read_error(response).await;
        if status == StatusCode::UNAUTHORIZED {
            tracing::info!(%method, path, "Session rejected, returning to login");
            if let Err(e) = self.store.clear() {
                tracing::warn!("Failed to clear stored credential: {}", e);
            }
            self.navigator.navigate(LOGIN_ROUTE);
            return Err(ClientError::Unauthorized(message));
        }

        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    /// GET `path` and decode the `data` envelope.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::GET, path, None).await?;
        decode(response).await
    }

    /// POST a JSON body and decode the `data` envelope.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    /// PUT a JSON body and decode the `data` envelope.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::PUT, path, Some(body)).await?;
        decode(response).await
    }

    /// DELETE `path`, discarding any response body.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Sign in and persist the returned credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        let credential: StoredCredential = self
            .post(
                "/api/auth/login",
                &json!({ "email": email, "password": password }),
            )
            .await?;
        self.store.save(&credential)?;
        tracing::debug!(user_id = credential.user.id, "Signed in");
        Ok(credential.user)
    }

    /// Create an account, sign in, and persist the returned credential.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<SessionUser, ClientError> {
        let mut body = json!({ "name": name, "email": email, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role.as_str());
        }

        let credential: StoredCredential = self.post("/api/auth/register", &body).await?;
        self.store.save(&credential)?;
        Ok(credential.user)
    }

    /// Forget the credential locally and go to the login route.
    ///
    /// The token itself stays valid on the server until it expires.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        self.navigator.navigate(LOGIN_ROUTE);
        Ok(())
    }

    /// Principal snapshot from the last sign-in. Only for rendering; the
    /// server decides every permission on its own.
    pub fn cached_user(&self) -> Result<Option<SessionUser>, ClientError> {
        Ok(self.store.load()?.map(|c| c.user))
    }

    /// Whether a token is stored.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.load(), Ok(Some(_)))
    }

    /// Fetch the principal as the server currently sees it.
    pub async fn me(&self) -> Result<SessionUser, ClientError> {
        self.get("/api/auth/me").await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let envelope: Envelope<T> = response.json().await?;
    Ok(envelope.data)
}

async fn read_error(response: Response) -> (String, String) {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorEnvelope>(&text) {
        Ok(envelope) => (envelope.error.code, envelope.error.message),
        Err(_) => {
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text
            };
            ("UNKNOWN".to_string(), message)
        }
    }
}
