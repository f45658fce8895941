// Registry API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection,
// and uniform status-code mapping. Endpoint methods live in `pets.rs`,
// `tutors.rs`, and `auth.rs` as inherent impls so this module stays
// focused on transport mechanics.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::PhotoFile;

// ── Error response shape from the backend ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the pet registry REST backend.
///
/// Cheap to share behind an `Arc`: the bearer token is swapped in place
/// after [`login`](Self::login), so every holder sees the new session.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: ArcSwapOption<SecretString>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL and transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            token: ArcSwapOption::empty(),
        })
    }

    /// The backend base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Install a bearer token for subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        self.token.store(Some(Arc::new(token)));
    }

    /// Forget the current bearer token.
    pub fn clear_token(&self) {
        self.token.store(None);
    }

    pub fn has_token(&self) -> bool {
        self.token.load().is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"v1/pets"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.load_full() {
            Some(token) => req.bearer_auth(token.expose_secret()),
            None => req,
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.authorize(self.http.get(url)).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .authorize(self.http.get(url).query(params))
            .send()
            .await?;
        handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url)).send().await?;
        handle_empty(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.authorize(self.http.put(url).json(body)).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.authorize(self.http.delete(url)).send().await?;
        handle_empty(resp).await
    }

    /// Upload a file as the `foto` multipart field.
    pub(crate) async fn post_photo<T: DeserializeOwned>(
        &self,
        path: &str,
        photo: &PhotoFile,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!(file = %photo.file_name, size = photo.bytes.len(), "POST {url} (multipart)");

        let part = reqwest::multipart::Part::bytes(photo.bytes.to_vec())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.content_type)?;
        let form = reqwest::multipart::Form::new().part("foto", part);

        let resp = self
            .authorize(self.http.post(url).multipart(form))
            .send()
            .await?;
        handle_response(resp).await
    }
}

// ── URL normalization ────────────────────────────────────────────────

/// Parse the base URL and make sure its path ends with `/` so relative
/// joins append rather than replace the last segment.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

// ── Response handling ────────────────────────────────────────────────

pub(crate) async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

pub(crate) async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    use reqwest::StatusCode;

    let path = resp.url().path().to_owned();
    let raw = resp.text().await.unwrap_or_default();

    // Empty when the backend sent no text; callers pick their own fallback.
    let message = match serde_json::from_str::<ErrorResponse>(&raw) {
        Ok(body) => body.message.or(body.error).unwrap_or_default(),
        Err(_) => raw.trim().to_owned(),
    };

    match status {
        StatusCode::UNAUTHORIZED => Error::SessionExpired,
        StatusCode::NOT_FOUND => Error::NotFound { path },
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            Error::Validation {
                message,
                status: status.as_u16(),
            }
        }
        _ => Error::Api {
            status: status.as_u16(),
            message,
        },
    }
}
