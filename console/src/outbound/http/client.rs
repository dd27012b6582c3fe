//! Reqwest-backed remote client.
//!
//! This adapter owns transport details only: URL construction, bearer
//! credentials, request ids, timeout and HTTP error mapping, and JSON
//! decoding. A 401 answer to a request sent with the session credential ends
//! the session through the [`SessionGuard`] before the error is returned.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagination::Page;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::dto::{ErrorBodyDto, LoginRequestDto, LoginResponseDto, RegisterRequestDto};
use crate::domain::ports::{AuthGateway, CollectionGateway, GatewayError, LoginGrant, SessionGuard};
use crate::domain::{Credential, LoginCredentials, Profile, Query, Registration, Resource};

const REQUEST_ID_HEADER: &str = "x-request-id";
const USER_AGENT: &str = concat!("article-console/", env!("CARGO_PKG_VERSION"));

/// Which credential, if any, a request carries.
#[derive(Debug, Clone, Copy)]
enum Auth<'a> {
    /// Anonymous request.
    None,
    /// A credential supplied by the caller; rejection is the caller's concern.
    Explicit(&'a Credential),
    /// The active session's credential; rejection ends the session.
    Session,
}

/// Client for the auth, article and category endpoints under one base URL.
pub struct RemoteClient {
    client: Client,
    base: Url,
    guard: Arc<dyn SessionGuard>,
}

impl RemoteClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        timeout: Duration,
        guard: Arc<dyn SessionGuard>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base,
            guard,
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn execute(&self, request: RequestBuilder, auth: Auth<'_>) -> Result<Vec<u8>, GatewayError> {
        let request_id = Uuid::new_v4();
        let authorised = match auth {
            Auth::None => request,
            Auth::Explicit(credential) => request.bearer_auth(credential.expose()),
            Auth::Session => match self.guard.credential() {
                Some(credential) => request.bearer_auth(credential.expose()),
                None => request,
            },
        };
        let request = authorised
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .header(reqwest::header::ACCEPT, "application/json")
            .build()
            .map_err(|error| GatewayError::invalid_request(error.to_string()))?;
        let method = request.method().clone();
        let path = request.url().path().to_owned();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%request_id, %method, path = %path, status = status.as_u16(), "api call");

        if status.is_success() {
            return Ok(body.to_vec());
        }
        if status == StatusCode::UNAUTHORIZED && matches!(auth, Auth::Session) {
            warn!(%request_id, %method, path = %path, "session credential rejected");
            self.guard.expire();
        }
        Err(map_status_error(status, body.as_ref()))
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        auth: Auth<'_>,
    ) -> Result<T, GatewayError> {
        let body = self.execute(request, auth).await?;
        decode(&body)
    }
}

#[async_trait]
impl AuthGateway for RemoteClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, GatewayError> {
        let url = endpoint(&self.base, &["auth", "login"])?;
        let request = self
            .client
            .post(url)
            .json(&LoginRequestDto::from(credentials));
        let response: LoginResponseDto = self.execute_json(request, Auth::None).await?;
        Ok(response.into_grant())
    }

    async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
        let url = endpoint(&self.base, &["auth", "register"])?;
        let request = self
            .client
            .post(url)
            .json(&RegisterRequestDto::from(registration));
        self.execute(request, Auth::None).await.map(drop)
    }

    async fn profile(&self, credential: &Credential) -> Result<Profile, GatewayError> {
        let url = endpoint(&self.base, &["auth", "profile"])?;
        self.execute_json(self.client.get(url), Auth::Explicit(credential))
            .await
    }
}

#[async_trait]
impl<R> CollectionGateway<R> for RemoteClient
where
    R: Resource + DeserializeOwned,
    R::Draft: Serialize,
{
    async fn list(&self, query: &Query) -> Result<Page<R>, GatewayError> {
        let url = list_url(&self.base, R::COLLECTION, query)?;
        self.execute_json(self.client.get(url), Auth::Session).await
    }

    async fn get(&self, id: &R::Id) -> Result<R, GatewayError> {
        let url = entity_url::<R>(&self.base, id)?;
        self.execute_json(self.client.get(url), Auth::Session).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, GatewayError> {
        let url = endpoint(&self.base, &[R::COLLECTION])?;
        self.execute_json(self.client.post(url).json(draft), Auth::Session)
            .await
    }

    async fn update(&self, id: &R::Id, draft: &R::Draft) -> Result<R, GatewayError> {
        let url = entity_url::<R>(&self.base, id)?;
        self.execute_json(self.client.put(url).json(draft), Auth::Session)
            .await
    }

    async fn delete(&self, id: &R::Id) -> Result<(), GatewayError> {
        let url = entity_url::<R>(&self.base, id)?;
        self.execute(self.client.request(Method::DELETE, url), Auth::Session)
            .await
            .map(drop)
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, GatewayError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| GatewayError::invalid_request(format!("base url {base} cannot hold a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn entity_url<R: Resource>(base: &Url, id: &R::Id) -> Result<Url, GatewayError> {
    endpoint(base, &[R::COLLECTION, &id.to_string()])
}

fn list_url(base: &Url, collection: &str, query: &Query) -> Result<Url, GatewayError> {
    let mut url = endpoint(base, &[collection])?;
    query.append_to(&mut url);
    Ok(url)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body)
        .map_err(|error| GatewayError::decode(format!("invalid JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::timeout(error.to_string())
    } else {
        GatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let code = status.as_u16();
    let message = server_message(body).unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() {
            format!("status {code}")
        } else {
            format!("status {code}: {preview}")
        }
    });

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let details = serde_json::from_slice::<Value>(body).ok();
            GatewayError::invalid(code, message, details)
        }
        StatusCode::UNAUTHORIZED => GatewayError::unauthorized(message),
        StatusCode::FORBIDDEN => GatewayError::forbidden(message),
        StatusCode::NOT_FOUND => GatewayError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::timeout(message),
        _ => GatewayError::status(code, message),
    }
}

fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()?
        .message?
        .into_text()
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
