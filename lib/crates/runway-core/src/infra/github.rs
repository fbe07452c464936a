//! GitHub REST adapter for the remote platform ports.
//!
//! One `reqwest::Client` is built per connector and shared by every session.
//! The credential travels only in the `Authorization` header.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{FileWrite, PlatformConnector, RepoPlatform};
use crate::domain::{Credential, PlatformError, RepoHandle, SessionId, Visibility};

const USER_AGENT: &str = concat!("runway/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticates credentials against a GitHub-compatible REST API.
#[derive(Debug, Clone)]
pub struct GithubConnector {
    client: Client,
    api_url: String,
}

impl GithubConnector {
    /// Create a connector for `api_url`, e.g. `https://api.github.com`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl PlatformConnector for GithubConnector {
    async fn authenticate(
        &self,
        credential: &Credential,
    ) -> Result<Box<dyn RepoPlatform>, PlatformError> {
        let api = Api {
            client: self.client.clone(),
            base: self.api_url.clone(),
            credential: credential.clone(),
        };
        let user: Account = decode(send(api.request(Method::GET, "/user")).await?).await?;
        tracing::debug!(login = %user.login, "credential accepted");
        Ok(Box::new(GithubRepos {
            api,
            login: user.login,
        }))
    }
}

// ── Authenticated handle ──────────────────────────────────────────────────────

/// Repository operations for one authenticated account.
struct GithubRepos {
    api: Api,
    login: String,
}

#[async_trait]
impl RepoPlatform for GithubRepos {
    fn actor(&self) -> &str {
        &self.login
    }

    async fn create_repository(
        &self,
        name: &SessionId,
        visibility: Visibility,
    ) -> Result<RepoHandle, PlatformError> {
        let body = json!({
            "name": name.as_str(),
            "private": visibility.is_private(),
            "auto_init": true,
        });
        let request = self.api.request(Method::POST, "/user/repos").json(&body);
        let repo: Repository = decode(send(request).await?).await?;
        Ok(RepoHandle::new(repo.owner.login, repo.name))
    }

    async fn write_file(
        &self,
        repo: &RepoHandle,
        file: FileWrite<'_>,
    ) -> Result<(), PlatformError> {
        let body = json!({
            "message": file.message,
            "content": STANDARD.encode(file.content),
            "branch": file.branch,
        });
        let request = self
            .api
            .request(Method::PUT, &contents_path(repo, file.path))
            .json(&body);
        send(request).await?;
        Ok(())
    }

    async fn read_file(&self, repo: &RepoHandle, path: &str) -> Result<Vec<u8>, PlatformError> {
        let request = self.api.request(Method::GET, &contents_path(repo, path));
        let file: Contents = decode(send(request).await?).await?;
        file.into_bytes()
    }
}

// ── Transport ─────────────────────────────────────────────────────────────────

/// Request builder bound to one credential. Not `Debug`: it holds the token.
struct Api {
    client: Client,
    base: String,
    credential: Credential,
}

impl Api {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base))
            .bearer_auth(self.credential.expose())
            .header(header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

/// Send `request` and map non-success statuses onto `PlatformError`.
async fn send(request: RequestBuilder) -> Result<Response, PlatformError> {
    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(PlatformError::NotFound);
    }
    let message = error_message(response).await;
    // The contents API answers 422 "sha wasn't supplied" when the path exists.
    if status == StatusCode::UNPROCESSABLE_ENTITY && message.contains("\"sha\"") {
        return Err(PlatformError::AlreadyExists);
    }
    Err(PlatformError::Other(message))
}

fn contents_path(repo: &RepoHandle, path: &str) -> String {
    format!(
        "/repos/{}/{}/contents/{}",
        repo.owner,
        repo.name,
        path.trim_start_matches('/')
    )
}

fn transport(err: reqwest::Error) -> PlatformError {
    PlatformError::Other(format!("request failed: {}", err.without_url()))
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, PlatformError> {
    response
        .json()
        .await
        .map_err(|e| PlatformError::Other(format!("unexpected response body: {e}")))
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) if !body.message.is_empty() => {
            format!("{} (HTTP {})", body.message, status.as_u16())
        }
        _ => format!("HTTP {}", status.as_u16()),
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Account {
    login: String,
}

#[derive(Deserialize)]
struct Repository {
    name: String,
    owner: Account,
}

#[derive(Deserialize)]
struct Contents {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

impl Contents {
    fn into_bytes(self) -> Result<Vec<u8>, PlatformError> {
        if self.encoding != "base64" {
            return Ok(self.content.into_bytes());
        }
        // The API wraps base64 content at 60 columns.
        let packed: String = self
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        STANDARD
            .decode(packed)
            .map_err(|e| PlatformError::Other(format!("invalid file encoding: {e}")))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}
