//! EVA i18n - Locale Service
//!
//! Translation lookup and locale-change notification for the component
//! runtime. Missing keys echo back verbatim so a missing table never blocks
//! rendering.

mod table;
mod source;
mod service;

pub use table::{TranslationTable, interpolate};
pub use source::{LocaleSource, StaticSource};
pub use service::{LocaleService, Subscription};

/// Locale errors
#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("Locale not found: {0}")]
    NotFound(String),

    #[error("No locale source configured")]
    NoSource,

    #[error("Invalid translation table for {code}: {source}")]
    Parse {
        code: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Locale source failed: {0}")]
    Source(String),
}
