//! Identity provider client (GoTrue-compatible) and the browser-persisted session.

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::backend::http::{authorized, ensure_ok};
use crate::backend::local::{read_key, remove_key, write_key};
use crate::config::{AppConfig, RemoteConfig};
use crate::error::{AppError, Result};

const SESSION_KEY: &str = "session";
pub const LOCAL_USER_ID: &str = "local";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl UserProfile {
    /// Nickname from the profile metadata, else the mailbox part of the email.
    pub fn display_name(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn greeting(&self) -> String {
        format!("{}님", self.display_name())
    }

    /// Avatar placeholder letter.
    pub fn initial(&self) -> String {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

impl Session {
    /// Session used when no identity provider is configured.
    pub fn local() -> Self {
        Session {
            access_token: String::new(),
            refresh_token: String::new(),
            user: UserProfile {
                id: LOCAL_USER_ID.to_string(),
                email: "local@gagyebu".to_string(),
                display_name: Some("나".to_string()),
            },
        }
    }

    pub fn with_user(&self, user: UserProfile) -> Self {
        Session { user, ..self.clone() }
    }
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<serde_json::Value>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        let display_name = row
            .user_metadata
            .as_ref()
            .and_then(|meta| meta.get("display_name"))
            .and_then(|v| v.as_str())
            .map(str::to_string);
        UserProfile {
            id: row.id,
            email: row.email.unwrap_or_default(),
            display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    user: UserRow,
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: token.user.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    /// The account exists but the email address must be confirmed first.
    ConfirmationPending,
}

pub fn parse_session(body: &str) -> Result<Session> {
    Ok(serde_json::from_str::<TokenResponse>(body)?.into())
}

/// Auto-confirming providers answer sign-up with a full session; others
/// answer with the bare user.
pub fn parse_sign_up(body: &str) -> Result<SignUpOutcome> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("access_token").is_some() {
        Ok(SignUpOutcome::SignedIn(serde_json::from_value::<TokenResponse>(value)?.into()))
    } else {
        Ok(SignUpOutcome::ConfirmationPending)
    }
}

pub fn parse_user(body: &str) -> Result<UserProfile> {
    Ok(serde_json::from_str::<UserRow>(body)?.into())
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "이메일과 비밀번호를 입력해주세요.".to_string(),
        ));
    }
    Ok(())
}

pub async fn sign_in_with_password(config: &RemoteConfig, email: &str, password: &str) -> Result<Session> {
    validate_credentials(email, password)?;
    log::debug!("[auth] sign in {}", email);
    let builder = Request::post(&config.auth_url("token?grant_type=password"));
    let resp = authorized(builder, config, None)
        .json(&json!({ "email": email.trim(), "password": password }))?
        .send()
        .await?;
    let body = ensure_ok(resp).await?.text().await?;
    parse_session(&body)
}

pub async fn sign_up(
    config: &RemoteConfig,
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<SignUpOutcome> {
    validate_credentials(email, password)?;
    log::debug!("[auth] sign up {}", email);
    let builder = Request::post(&config.auth_url("signup"));
    let resp = authorized(builder, config, None)
        .json(&json!({
            "email": email.trim(),
            "password": password,
            "data": { "display_name": display_name.trim() }
        }))?
        .send()
        .await?;
    let body = ensure_ok(resp).await?.text().await?;
    parse_sign_up(&body)
}

pub async fn sign_out(config: &RemoteConfig, session: &Session) -> Result<()> {
    log::debug!("[auth] sign out {}", session.user.id);
    let builder = Request::post(&config.auth_url("logout"));
    let resp = authorized(builder, config, Some(&session.access_token)).send().await?;
    ensure_ok(resp).await?;
    Ok(())
}

pub async fn get_user(config: &RemoteConfig, session: &Session) -> Result<UserProfile> {
    let builder = Request::get(&config.auth_url("user"));
    let resp = authorized(builder, config, Some(&session.access_token)).send().await?;
    let body = ensure_ok(resp).await?.text().await?;
    parse_user(&body)
}

pub async fn update_display_name(config: &RemoteConfig, session: &Session, name: &str) -> Result<UserProfile> {
    log::debug!("[auth] update display name for {}", session.user.id);
    let builder = Request::put(&config.auth_url("user"));
    let resp = authorized(builder, config, Some(&session.access_token))
        .json(&json!({ "data": { "display_name": name.trim() } }))?
        .send()
        .await?;
    let body = ensure_ok(resp).await?.text().await?;
    parse_user(&body)
}

pub async fn refresh(config: &RemoteConfig, refresh_token: &str) -> Result<Session> {
    if refresh_token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    let builder = Request::post(&config.auth_url("token?grant_type=refresh_token"));
    let resp = authorized(builder, config, None)
        .json(&json!({ "refresh_token": refresh_token }))?
        .send()
        .await?;
    let body = ensure_ok(resp).await?.text().await?;
    parse_session(&body)
}

pub fn persist_session(session: &Session) {
    match serde_json::to_string(session) {
        Ok(raw) => {
            if let Err(err) = write_key(SESSION_KEY, &raw) {
                log::warn!("[auth] could not persist session: {}", err);
            }
        }
        Err(err) => log::warn!("[auth] could not encode session: {}", err),
    }
}

pub fn clear_session() {
    if let Err(err) = remove_key(SESSION_KEY) {
        log::warn!("[auth] could not clear session: {}", err);
    }
}

fn stored_session() -> Option<Session> {
    let raw = read_key(SESSION_KEY).ok().flatten()?;
    serde_json::from_str(&raw).ok()
}

/// Restores the last session and refreshes its tokens. Without a configured
/// identity provider the fixed local user is always signed in.
pub async fn get_current_session(config: &AppConfig) -> Option<Session> {
    let remote = match &config.remote {
        Some(remote) => remote,
        None => {
            let session = stored_session()
                .filter(|s| s.user.id == LOCAL_USER_ID)
                .unwrap_or_else(Session::local);
            return Some(session);
        }
    };
    let stored = stored_session()?;
    match refresh(remote, &stored.refresh_token).await {
        Ok(session) => {
            log::info!("[auth] session restored for {}", session.user.email);
            persist_session(&session);
            Some(session)
        }
        Err(err) if err.is_auth_failure() || matches!(err, AppError::Remote { .. }) => {
            log::warn!("[auth] stored session rejected: {}", err);
            clear_session();
            None
        }
        // Refresh unreachable; keep the stored tokens while they still work.
        Err(err) => {
            log::warn!("[auth] refresh failed: {}", err);
            match get_user(remote, &stored).await {
                Ok(user) => Some(stored.with_user(user)),
                Err(_) => {
                    clear_session();
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_BODY: &str = r#"{
        "access_token": "at",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "rt",
        "user": {
            "id": "u-1",
            "email": "minji@example.com",
            "user_metadata": { "display_name": "민지" }
        }
    }"#;

    #[test]
    fn test_parse_session() {
        let session = parse_session(TOKEN_BODY).unwrap();
        assert_eq!(session.access_token, "at");
        assert_eq!(session.refresh_token, "rt");
        assert_eq!(session.user.id, "u-1");
        assert_eq!(session.user.greeting(), "민지님");
    }

    #[test]
    fn test_parse_sign_up_variants() {
        assert!(matches!(parse_sign_up(TOKEN_BODY).unwrap(), SignUpOutcome::SignedIn(_)));
        let pending = r#"{"id":"u-2","email":"a@b.c","confirmation_sent_at":"2024-03-01T00:00:00Z"}"#;
        assert_eq!(parse_sign_up(pending).unwrap(), SignUpOutcome::ConfirmationPending);
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = parse_user(r#"{"id":"u-3","email":"jisoo@example.com","user_metadata":{}}"#).unwrap();
        assert_eq!(user.display_name(), "jisoo");
        assert_eq!(user.initial(), "J");

        let blank = UserProfile {
            display_name: Some("   ".to_string()),
            ..user
        };
        assert_eq!(blank.display_name(), "jisoo");
    }

    #[test]
    fn test_initial_without_email() {
        let user = UserProfile {
            id: "x".into(),
            email: String::new(),
            display_name: None,
        };
        assert_eq!(user.initial(), "?");
    }

    #[test]
    fn test_validate_credentials() {
        assert!(matches!(validate_credentials(" ", "pw"), Err(AppError::Validation(_))));
        assert!(validate_credentials("a@b.c", "pw").is_ok());
    }

    #[test]
    fn test_local_session() {
        let session = Session::local();
        assert_eq!(session.user.id, LOCAL_USER_ID);
        assert_eq!(session.user.greeting(), "나님");
    }
}
