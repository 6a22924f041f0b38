//! Единый тип ошибок публичного API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtratoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    SheetRead(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    SheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP {status} on page {page}: {body}")]
    Http { page: u32, status: u16, body: String },

    #[error("Transport error on page {page}: {message}")]
    Transport { page: u32, message: String },

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Report error: {0}")]
    Report(String),
}

impl ExtratoError {
    /// Ошибки, которые изолируются на уровне одного счёта и не прерывают пакет.
    pub fn is_per_account(&self) -> bool {
        matches!(
            self,
            ExtratoError::Http { .. } | ExtratoError::Transport { .. } | ExtratoError::Shape(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExtratoError>;
