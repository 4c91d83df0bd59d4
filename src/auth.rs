use crate::api::{ApiError, AuthBackend, Credentials};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession
{
    pub username: String,
    pub access_token: String,
}

/// Keeps the bearer token between runs in a small JSON file.
pub struct SessionStore
{
    path: PathBuf,
}

impl SessionStore
{
    pub fn new(path: impl Into<PathBuf>) -> Self
    {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path
    {
        &self.path
    }

    /// An unreadable or corrupt file counts as logged out.
    pub fn load(&self) -> Option<StoredSession>
    {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "couldn't read session file");
                return None;
            }
        };
        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(session) if !session.access_token.is_empty() => Some(session),
            Ok(_) => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt session file");
                None
            }
        }
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), AppError>
    {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                AppError::SessionStore(format!("create {}: {err}", parent.display()))
            })?;
        }
        let body = serde_json::to_string_pretty(session)
            .map_err(|err| AppError::SessionStore(err.to_string()))?;
        fs::write(&self.path, body)
            .map_err(|err| AppError::SessionStore(format!("write {}: {err}", self.path.display())))
    }

    /// Returns whether a session was present.
    pub fn clear(&self) -> Result<bool, AppError>
    {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(AppError::SessionStore(format!(
                "remove {}: {err}",
                self.path.display()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome
{
    LoggedIn(String),
    /// Shown inline to the user; nothing is retried.
    Rejected(String),
}

pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";
const SERVER_UNREACHABLE: &str = "Server might be down or unreachable.";

/// Both fields are required; nothing else is checked client-side.
pub fn validate(username: &str, password: &str) -> Result<Credentials, String>
{
    let username = username.trim();
    if username.is_empty() {
        return Err("Username is required.".to_string());
    }
    if password.is_empty() {
        return Err("Password is required.".to_string());
    }
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn login(
    backend: &dyn AuthBackend,
    store: &SessionStore,
    credentials: &Credentials,
) -> Result<LoginOutcome, AppError>
{
    match backend.login(credentials) {
        Ok(token) => {
            store.save(&StoredSession {
                username: credentials.username.clone(),
                access_token: token,
            })?;
            info!(
                username = %credentials.username,
                session_file = %store.path().display(),
                "logged in"
            );
            Ok(LoginOutcome::LoggedIn(credentials.username.clone()))
        }
        Err(err) => {
            error!(error = %err, "login failed");
            let message = match err {
                ApiError::Request(_) => format!("Login failed. {SERVER_UNREACHABLE}"),
                _ => INVALID_CREDENTIALS.to_string(),
            };
            Ok(LoginOutcome::Rejected(message))
        }
    }
}

/// The error is the message to show inline.
pub fn signup(backend: &dyn AuthBackend, credentials: &Credentials) -> Result<(), String>
{
    match backend.signup(credentials) {
        Ok(()) => {
            info!(username = %credentials.username, "account created");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "signup failed");
            let message = match (&err, err.server_message()) {
                (_, Some(body)) => format!("Signup failed. {body}"),
                (ApiError::Request(_), None) => format!("Signup failed. {SERVER_UNREACHABLE}"),
                _ => "Signup failed.".to_string(),
            };
            Err(message)
        }
    }
}

pub fn logout(store: &SessionStore) -> Result<bool, AppError>
{
    let removed = store.clear()?;
    if removed {
        info!("logged out");
    }
    Ok(removed)
}

/// Forgets a token the backend no longer accepts.
pub fn expire(store: &SessionStore) -> Result<(), AppError>
{
    if store.clear()? {
        warn!(session_file = %store.path().display(), "access token rejected, session cleared");
    }
    Ok(())
}
