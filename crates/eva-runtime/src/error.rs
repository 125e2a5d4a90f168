//! Runtime errors

use eva_dom::DomError;

/// Errors from defining elements and mutating the document
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Invalid custom element name: {0}")]
    InvalidName(String),

    #[error("Element already defined: {0}")]
    AlreadyDefined(String),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Failure inside a component's render pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Missing required attribute `{0}`")]
    MissingAttribute(String),

    #[error("Render failed: {0}")]
    Failed(String),
}
