use crate::config::ClientConfig;
use crate::words::{NewWord, Word, WordId};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ApiError
{
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("the server rejected the access token")]
    Unauthorized,
    #[error("not logged in")]
    MissingToken,
}

impl ApiError
{
    /// Error text the server attached to a failed response, if any.
    pub fn server_message(&self) -> Option<&str>
    {
        match self {
            ApiError::HttpStatus { body, .. } if !body.trim().is_empty() => Some(body.trim()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials
{
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse
{
    access_token: String,
}

/// Word list operations the views depend on.
pub trait WordBackend
{
    fn list_words(&self) -> Result<Vec<Word>, ApiError>;
    fn create_word(&self, word: &NewWord) -> Result<Word, ApiError>;
    fn delete_word(&self, id: WordId) -> Result<(), ApiError>;
}

/// Account operations; neither requires a token.
pub trait AuthBackend
{
    fn login(&self, credentials: &Credentials) -> Result<String, ApiError>;
    fn signup(&self, credentials: &Credentials) -> Result<(), ApiError>;
}

pub struct ApiClient
{
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient
{
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError>
    {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self
    {
        self.token = Some(token.into());
        self
    }

    fn endpoint(&self, path: &str) -> String
    {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError>
    {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        Ok(request.bearer_auth(token))
    }
}

fn check_status(response: Response) -> Result<Response, ApiError>
{
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized);
    }
    let body = response.text().unwrap_or_default();
    warn!(%status, "backend returned an error");
    Err(ApiError::HttpStatus { status, body })
}

impl WordBackend for ApiClient
{
    fn list_words(&self) -> Result<Vec<Word>, ApiError>
    {
        let request = self.authorized(self.http.get(self.endpoint("/words")))?;
        let words: Vec<Word> = check_status(request.send()?)?.json()?;
        debug!(count = words.len(), "fetched words");
        Ok(words)
    }

    fn create_word(&self, word: &NewWord) -> Result<Word, ApiError>
    {
        let request = self.authorized(self.http.post(self.endpoint("/words")))?;
        let created: Word = check_status(request.json(word).send()?)?.json()?;
        debug!(id = created.id, "created word");
        Ok(created)
    }

    fn delete_word(&self, id: WordId) -> Result<(), ApiError>
    {
        let path = format!("/words/{id}");
        let request = self.authorized(self.http.delete(self.endpoint(&path)))?;
        check_status(request.send()?)?;
        debug!(id, "deleted word");
        Ok(())
    }
}

impl AuthBackend for ApiClient
{
    fn login(&self, credentials: &Credentials) -> Result<String, ApiError>
    {
        let response = self
            .http
            .post(self.endpoint("/auth/login"))
            .json(credentials)
            .send()?;
        let body: LoginResponse = check_status(response)?.json()?;
        Ok(body.access_token)
    }

    fn signup(&self, credentials: &Credentials) -> Result<(), ApiError>
    {
        let response = self
            .http
            .post(self.endpoint("/auth/signup"))
            .json(credentials)
            .send()?;
        check_status(response)?;
        Ok(())
    }
}
