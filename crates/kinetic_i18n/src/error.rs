//! Error types for kinetic_i18n

use thiserror::Error;

/// Errors raised while resolving locales or loading catalogs
#[derive(Error, Debug)]
pub enum I18nError {
    /// Locale tag not supported by the dashboard
    #[error("unknown locale '{0}' (expected one of: en, fr, de, ar)")]
    UnknownLocale(String),

    /// Catalog document could not be parsed
    #[error("catalog parsing failed: {0}")]
    Catalog(#[from] toml::de::Error),
}

/// Result type for kinetic_i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;
