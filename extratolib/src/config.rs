//! Настройки прогона и разрешение учётных данных клиента.

use crate::error::{ExtratoError, Result};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_AUTH_URL: &str = "https://oauth.hm.bb.com.br/oauth/token";
pub const DEFAULT_API_URL: &str = "https://api.hm.bb.com.br/extratos/v1/conta-corrente";
pub const DEFAULT_APP_KEY: &str = "2dc673fdaa5e4db68f1019d2d9027c01";
pub const DEFAULT_INPUT_FILE: &str = "contas_input.xlsx";
pub const DEFAULT_OUTPUT_FILE: &str = "extrato_consolidado.xlsx";
pub const DEFAULT_SCOPE: &str = "extratos.leitura";

/// `0` — период по умолчанию на стороне API; передаётся как есть.
pub const UNBOUNDED_PERIOD: &str = "0";

pub const MIN_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 200;
pub const DEFAULT_PAGE_SIZE: u32 = MAX_PAGE_SIZE;

pub const CLIENT_ID_VAR: &str = "BB_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "BB_CLIENT_SECRET";

// Только для песочницы. Реальные значения задаются через переменные окружения.
const SANDBOX_CLIENT_ID: &str = "sandbox-client-id";
const SANDBOX_CLIENT_SECRET: &str = "sandbox-client-secret";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub app_key: String,
    pub auth_url: String,
    /// База до `/agencia/{agencia}/conta/{conta}`.
    pub api_url: String,
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub page_size: u32,
    pub period_start: String,
    pub period_end: String,
    pub scope: String,
    pub mock: bool,
    pub auth_timeout: Duration,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_key: DEFAULT_APP_KEY.into(),
            auth_url: DEFAULT_AUTH_URL.into(),
            api_url: DEFAULT_API_URL.into(),
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            page_size: DEFAULT_PAGE_SIZE,
            period_start: UNBOUNDED_PERIOD.into(),
            period_end: UNBOUNDED_PERIOD.into(),
            scope: DEFAULT_SCOPE.into(),
            mock: false,
            auth_timeout: Duration::from_secs(15),
            fetch_timeout: Duration::from_secs(20),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ExtratoError::Config(format!(
                "page size {} outside {MIN_PAGE_SIZE}..={MAX_PAGE_SIZE}",
                self.page_size
            )));
        }
        for (name, value) in [
            ("app key", &self.app_key),
            ("auth url", &self.auth_url),
            ("api url", &self.api_url),
        ] {
            if value.trim().is_empty() {
                return Err(ExtratoError::Config(format!("{name} is empty")));
            }
        }
        Ok(())
    }

    /// `<api_url>/agencia/{branch}/conta/{account}`; идентификаторы кодируются как сегменты пути.
    pub fn statement_url(&self, branch: &str, account: &str) -> Result<Url> {
        let invalid = |why: String| ExtratoError::Config(format!("invalid api url {}: {why}", self.api_url));
        let mut url = Url::parse(&self.api_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".into()))?
            .pop_if_empty()
            .extend(["agencia", branch, "conta", account]);
        Ok(url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    SandboxDefault,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub source: CredentialSource,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id_len", &self.client_id.len())
            .field("client_secret_len", &self.client_secret.len())
            .field("source", &self.source)
            .finish()
    }
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            source: CredentialSource::Environment,
        }
    }

    pub fn from_env() -> Self {
        Self::resolve_with(|name| std::env::var(name).ok())
    }

    /// Обе переменные, обрезанные по краям; если хотя бы одной нет — пара песочницы.
    pub fn resolve_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        match (read(CLIENT_ID_VAR), read(CLIENT_SECRET_VAR)) {
            (Some(client_id), Some(client_secret)) => Self {
                client_id,
                client_secret,
                source: CredentialSource::Environment,
            },
            _ => Self {
                client_id: SANDBOX_CLIENT_ID.into(),
                client_secret: SANDBOX_CLIENT_SECRET.into(),
                source: CredentialSource::SandboxDefault,
            },
        }
    }
}

/// Сведения о переменной окружения без раскрытия значения.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvVarReport {
    NotSet,
    Set {
        length: usize,
        starts_with_space: bool,
        ends_with_space: bool,
    },
}

impl EnvVarReport {
    pub fn of(value: Option<&str>) -> Self {
        match value {
            None => EnvVarReport::NotSet,
            Some(v) => EnvVarReport::Set {
                length: v.chars().count(),
                starts_with_space: v.chars().next().is_some_and(char::is_whitespace),
                ends_with_space: v.chars().last().is_some_and(char::is_whitespace),
            },
        }
    }
}

impl std::fmt::Display for EnvVarReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvVarReport::NotSet => f.write_str("NOT SET"),
            EnvVarReport::Set {
                length,
                starts_with_space,
                ends_with_space,
            } => write!(
                f,
                "set, length={length}, startswith_space={starts_with_space}, endswith_space={ends_with_space}"
            ),
        }
    }
}

pub fn inspect_env_var(name: &str) -> EnvVarReport {
    EnvVarReport::of(std::env::var(name).ok().as_deref())
}
