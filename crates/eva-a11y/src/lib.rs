//! EVA Accessibility
//!
//! Accessibility primitives shared by the composite widgets.
//!
//! Features:
//! - ARIA roles and state serialization
//! - Roving tabindex cursor arithmetic
//! - Focus trap cycling
//! - Debounced live-region announcements

pub mod aria;
pub mod focus;
pub mod live;

pub use aria::{AriaRole, LiveRegionMode, aria_bool};
pub use focus::{TabIndex, Navigation, step, cycle};
pub use live::LiveRegion;

/// Accessibility error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum A11yError {
    #[error("Invalid ARIA role: {0}")]
    InvalidRole(String),
}
