//! Core types for thumbra.
//!
//! This crate holds the invariant-bearing pieces of the thumbnail protocol:
//! object-key classification, the derivative key scheme, the eligibility
//! filter, the inbound event model, and configuration.
//!
//! # Key format
//!
//! A derivative key is `{width}x{height}@{original_key}` with decimal,
//! non-padded dimensions. Any key matching `^[0-9]+x[0-9]+@` is treated as a
//! derivative and never re-derived; everything else is an original. This is
//! the only mechanism relating originals to their thumbnails, so all
//! components must go through the `key` module instead of formatting keys
//! by hand.

pub mod config;
pub mod event;
pub mod filter;
pub mod key;

// Re-export commonly used types
pub use config::{Config, EligibilityMode, StorageBackend};
pub use event::StorageEvent;
pub use filter::{Rejection, SourceFilter};
pub use key::{derivative_key, DerivativeSpec, KeyClass, ObjectKey};
