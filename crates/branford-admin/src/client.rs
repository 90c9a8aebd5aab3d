//! HTTP client for the Branford content API.

use branford_api_types::{DeleteResponse, ErrorBody, LoginRequest, UploadResponse};
use reqwest::header::{COOKIE, HeaderValue, SET_COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Name of the cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "adminSession";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx answer; `message` is the `error` field of the body when present.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("failed to parse response: {0}")]
    Decode(String),
    #[error("{0}")]
    InvalidInput(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base: Url,
    session: Option<String>,
}

impl ApiClient {
    /// `site` may carry a base path; request paths resolve beneath it.
    pub fn new(site: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(site)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            base,
            session: None,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("branford-admin/", env!("CARGO_PKG_VERSION"))
    }

    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session = Some(token.into());
        self
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base.join(path).map_err(ClientError::Url)
    }

    /// Exchange the admin password for a session token and keep it for later calls.
    pub async fn login(&mut self, password: &str) -> Result<&str, ClientError> {
        let url = self.url("admin/login")?;
        let resp = self
            .client
            .post(url)
            .json(&LoginRequest {
                password: password.to_string(),
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Self::server_error(resp).await);
        }

        let token = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(session_token)
            .ok_or_else(|| ClientError::Decode("login response set no session cookie".into()))?;

        Ok(self.session.insert(token).as_str())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let req = self.request(Method::GET, path, None)?;
        Self::handle(req.send().await?).await
    }

    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let req = self.request(method, path, None)?.json(body);
        Self::handle(req.send().await?).await
    }

    /// `DELETE {path}?id={id}`.
    pub async fn delete(&self, path: &str, id: &str) -> Result<DeleteResponse, ClientError> {
        let req = self.request(Method::DELETE, path, Some(&[("id", id)]))?;
        Self::handle(req.send().await?).await
    }

    /// Send bytes to the upload endpoint as the multipart `file` field.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ClientError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let req = self.request(Method::POST, "api/upload", None)?.multipart(form);
        Self::handle(req.send().await?).await
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<RequestBuilder, ClientError> {
        let mut url = self.url(path)?;
        if let Some(q) = query {
            url.set_query(None);
            let mut qp = url.query_pairs_mut();
            for (k, v) in q {
                qp.append_pair(k, v);
            }
        }

        let mut req = self.client.request(method, url);
        if let Some(token) = &self.session {
            let cookie = HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}"))
                .map_err(|e| ClientError::InvalidInput(e.to_string()))?;
            req = req.header(COOKIE, cookie);
        }
        Ok(req)
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        if !resp.status().is_success() {
            return Err(Self::server_error(resp).await);
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn server_error(resp: Response) -> ClientError {
        let status = resp.status();
        let bytes = resp.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                let text = String::from_utf8_lossy(&bytes).trim().to_string();
                if text.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    text
                }
            });
        ClientError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

/// Pull the session token out of one `Set-Cookie` header value.
fn session_token(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
}
