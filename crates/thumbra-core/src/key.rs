//! Object-key classification and the derivative key scheme.
//!
//! Keys are classified once at ingestion into originals and derivatives;
//! downstream code matches on [`KeyClass`] instead of re-running the pattern
//! at every call site.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Matches keys produced by [`derivative_key`]: one-or-more digits, `x`,
/// one-or-more digits, `@`. `(?s)` so originals containing newlines survive
/// the capture.
static DERIVATIVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?s)^([0-9]+)x([0-9]+)@(.*)$").expect("derivative pattern"));

/// One configured thumbnail size, in output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivativeSpec {
    pub width: u32,
    pub height: u32,
}

impl DerivativeSpec {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Square thumbnail of `size` x `size` pixels.
    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }
}

impl fmt::Display for DerivativeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Compute the storage key of the `spec` thumbnail of `original`.
///
/// Deterministic and injective over distinct `(width, height)` pairs for a
/// fixed original, which is what lets the deleter reconstruct exactly the
/// keys the generator wrote without any stored mapping.
pub fn derivative_key(original: &str, spec: DerivativeSpec) -> String {
    format!("{}x{}@{}", spec.width, spec.height, original)
}

/// What a key names: a source image, or a thumbnail derived from one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyClass {
    Original,
    Derivative {
        width: u32,
        height: u32,
        /// The key of the original this thumbnail was derived from.
        original: String,
    },
}

/// An object key carrying its classification, computed once at ingestion.
///
/// The classification is purely syntactic: a legitimately-named upload like
/// `640x480@vacation.jpg` classifies as a derivative and is skipped. That
/// ambiguity is the accepted cost of keeping the protocol stateless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey {
    raw: String,
    class: KeyClass,
}

impl ObjectKey {
    /// Classify a key. Total; any string is either an original or a
    /// derivative.
    pub fn parse(key: impl Into<String>) -> Self {
        let raw = key.into();
        let class = match DERIVATIVE_PATTERN.captures(&raw) {
            Some(caps) => KeyClass::Derivative {
                // The pattern is authoritative for classification; dims too
                // large for u32 clamp rather than reclassifying the key.
                width: caps[1].parse().unwrap_or(u32::MAX),
                height: caps[2].parse().unwrap_or(u32::MAX),
                original: caps[3].to_string(),
            },
            None => KeyClass::Original,
        };
        Self { raw, class }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn class(&self) -> &KeyClass {
        &self.class
    }

    pub fn is_derivative(&self) -> bool {
        matches!(self.class, KeyClass::Derivative { .. })
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
