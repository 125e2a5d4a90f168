//! EVA Runtime
//!
//! Lifecycle glue every EVA element is built on.
//!
//! An element is a host node in the [`Document`](eva_dom::Document) plus a
//! [`Component`] instance. The runtime turns attribute mutations, input events,
//! timers and locale switches into synchronous component callbacks, and
//! rebuilds each host's render root from the [`Markup`] its component returns.
//!
//! # Example
//! ```rust,ignore
//! use eva_runtime::{Config, Runtime};
//!
//! let mut rt = Runtime::new(Config::default());
//! eva_components::define_all(&mut rt)?;
//!
//! let item = rt.create_element("eva-accordion-item");
//! rt.append_child(rt.body(), item)?;
//! rt.set_attribute(item, "open", "")?;
//! ```

mod component;
mod config;
mod context;
mod error;
mod listeners;
mod markup;
mod registry;
mod runtime;
mod scheduler;

pub use component::{Component, RenderContext};
pub use config::Config;
pub use context::Context;
pub use error::{RenderError, RuntimeError};
pub use listeners::{DocumentListener, ListenerId};
pub use markup::{Markup, MarkupElement, el, slot, text};
pub use registry::{Definition, ElementRegistry, Factory};
pub use runtime::Runtime;
pub use scheduler::TimerGuard;

// Re-export sub-crates for component authors
pub use eva_dom as dom;
pub use eva_i18n as i18n;

/// Runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
