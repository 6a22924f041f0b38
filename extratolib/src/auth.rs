//! OAuth2 client-credentials: упорядоченный список попыток до первой удачной.

use crate::{
    config::{Config, Credentials},
    error::{ExtratoError, Result},
    http::{preview, Transport},
    model::AuthToken,
};
use log::{error, info, warn};
use serde::Deserialize;

const TOKEN_PREVIEW_CHARS: usize = 300;

/// Одна стратегия получения токена.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthAttempt {
    pub label: &'static str,
    pub scope: Option<String>,
}

impl AuthAttempt {
    fn form(&self) -> Vec<(&str, &str)> {
        let mut form = vec![("grant_type", "client_credentials")];
        if let Some(scope) = &self.scope {
            form.push(("scope", scope.as_str()));
        }
        form
    }
}

/// Сначала без scope, затем с ним.
pub fn default_attempts(scope: &str) -> Vec<AuthAttempt> {
    vec![
        AuthAttempt {
            label: "sem scope",
            scope: None,
        },
        AuthAttempt {
            label: "com scope",
            scope: Some(scope.to_string()),
        },
    ]
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

pub struct Authenticator<'a, T: Transport> {
    config: &'a Config,
    transport: T,
    attempts: Vec<AuthAttempt>,
}

impl<'a, T: Transport> Authenticator<'a, T> {
    pub fn new(config: &'a Config, transport: T) -> Self {
        let attempts = default_attempts(&config.scope);
        Self {
            config,
            transport,
            attempts,
        }
    }

    pub fn with_attempts(mut self, attempts: Vec<AuthAttempt>) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn authenticate(&self, credentials: &Credentials) -> Result<AuthToken> {
        let mut last_failure = String::from("no authentication attempts configured");

        for attempt in &self.attempts {
            info!("[AUTH] token attempt ({})", attempt.label);
            match self.try_attempt(attempt, credentials) {
                Ok(token) => {
                    info!("[AUTH] authenticated ({})", attempt.label);
                    return Ok(token);
                }
                Err(reason) => {
                    warn!("[AUTH] attempt ({}) failed: {reason}", attempt.label);
                    last_failure = reason;
                }
            }
        }

        error!("[AUTH] all attempts failed; check credentials and environment");
        Err(ExtratoError::Auth(last_failure))
    }

    fn try_attempt(
        &self,
        attempt: &AuthAttempt,
        credentials: &Credentials,
    ) -> std::result::Result<AuthToken, String> {
        let resp = self
            .transport
            .post_form(
                &self.config.auth_url,
                (
                    credentials.client_id.as_str(),
                    credentials.client_secret.as_str(),
                ),
                &attempt.form(),
                self.config.auth_timeout,
            )
            .map_err(|e| format!("transport error: {e}"))?;

        info!(
            "[AUTH] status={} resp_preview={}",
            resp.status,
            preview(&resp.body, TOKEN_PREVIEW_CHARS)
        );

        if resp.status != 200 {
            return Err(format!("HTTP {}: {}", resp.status, resp.body));
        }

        let parsed: TokenResponse = serde_json::from_str(&resp.body)
            .map_err(|e| format!("HTTP 200 with unreadable body ({e}): {}", resp.body))?;

        match parsed.access_token.filter(|t| !t.is_empty()) {
            Some(token) => Ok(AuthToken::new(token)),
            None => Err(format!("HTTP 200 without access_token: {}", resp.body)),
        }
    }
}
