//! Signed-in session and UI language, kept in the settings database.

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use docudesk_lib::auth::AccessToken;
use docudesk_lib::auth::TokenProvider;
use docudesk_lib::error::AuthError;
use serde::Deserialize;
use serde::Serialize;

use crate::settings::LANGUAGE_KEY;
use crate::settings::SESSION_KEY;
use crate::settings::SettingsError;
use crate::settings::SettingsProvider;

/// Language used when none has been chosen.
pub const DEFAULT_LANGUAGE: &str = "en";

/// The bearer token handed out by the sign-in provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }
}

impl From<&Session> for AccessToken {
    fn from(session: &Session) -> Self {
        match session.expires_at {
            Some(at) => AccessToken::with_expiry(&session.access_token, at),
            None => AccessToken::new(&session.access_token),
        }
    }
}

pub async fn load(settings: &SettingsProvider) -> Result<Option<Session>, SettingsError> {
    settings.get(SESSION_KEY).await
}

pub async fn save(settings: &SettingsProvider, session: &Session) -> Result<(), SettingsError> {
    settings.set(SESSION_KEY, session).await
}

pub async fn clear(settings: &SettingsProvider) -> Result<(), SettingsError> {
    settings.delete(SESSION_KEY).await
}

pub async fn language(settings: &SettingsProvider) -> Result<String, SettingsError> {
    settings
        .get_or(LANGUAGE_KEY, DEFAULT_LANGUAGE.to_string())
        .await
}

pub async fn set_language(settings: &SettingsProvider, code: &str) -> Result<(), SettingsError> {
    settings.set(LANGUAGE_KEY, &code.to_string()).await
}

/// Normalizes a language tag such as `fr` or `pt-BR`.
pub fn parse_language(code: &str) -> Result<String, String> {
    let code = code.trim();
    let (lang, region) = match code.split_once(['-', '_']) {
        Some((lang, region)) => (lang, Some(region)),
        None => (code, None),
    };
    let valid_lang = (2..=3).contains(&lang.len()) && lang.chars().all(|c| c.is_ascii_alphabetic());
    let valid_region = region.is_none_or(|r| r.len() == 2 && r.chars().all(|c| c.is_ascii_alphabetic()));
    if !valid_lang || !valid_region {
        return Err(format!("'{code}' is not a language code"));
    }
    Ok(match region {
        Some(r) => format!("{}-{}", lang.to_ascii_lowercase(), r.to_ascii_uppercase()),
        None => lang.to_ascii_lowercase(),
    })
}

/// Reads the bearer token from the stored session on every request.
#[derive(Clone)]
pub struct StoredTokenProvider {
    settings: SettingsProvider,
}

impl StoredTokenProvider {
    pub fn new(settings: SettingsProvider) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl TokenProvider for StoredTokenProvider {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let session = load(&self.settings)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?
            .ok_or(AuthError::MissingToken)?;

        if session.is_expired() {
            return Err(AuthError::TokenExpired {
                message: "sign in again with `docudesk login`".to_string(),
            });
        }
        Ok(AccessToken::from(&session))
    }
}
