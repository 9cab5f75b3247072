//! Eligibility filter: decides whether a notification triggers thumbnail
//! work at all.
//!
//! Two rules, evaluated in order, first failure wins:
//!
//! 1. the object must look like a supported raster image (by media type, or
//!    by key suffix in deployments whose notifications carry no content
//!    type);
//! 2. the key must not already carry the derivative prefix. This is the
//!    anti-recursion guard: a freshly written thumbnail fires its own
//!    creation event, and without this rule it would be re-derived forever.
//!
//! Ineligible input is a classification outcome, not an error.

use crate::config::{Config, EligibilityMode};
use crate::key::ObjectKey;

/// Why a key was rejected. `None` from [`SourceFilter::check`] means
/// eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Media type or suffix does not indicate a supported raster format.
    NotAnImage,
    /// The key already carries the derivative prefix.
    AlreadyDerived,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NotAnImage => "not an image",
            Rejection::AlreadyDerived => "already a thumbnail",
        }
    }
}

/// Pure classification of incoming keys; one instance per process, built
/// from configuration at startup.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    mode: EligibilityMode,
    allowed_content_types: Vec<String>,
    allowed_extensions: Vec<String>,
}

impl SourceFilter {
    pub fn new(
        mode: EligibilityMode,
        allowed_content_types: Vec<String>,
        allowed_extensions: Vec<String>,
    ) -> Self {
        Self {
            mode,
            allowed_content_types,
            allowed_extensions,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.eligibility_mode,
            config.allowed_content_types.clone(),
            config.allowed_extensions.clone(),
        )
    }

    /// Whether this deployment classifies by media type (and therefore may
    /// need a gateway attribute lookup when the event omits it).
    pub fn needs_content_type(&self) -> bool {
        self.mode == EligibilityMode::ContentType
    }

    /// Run both rules against a classified key. Pure; the only side effect
    /// anywhere near this path is the caller's log line.
    pub fn check(&self, key: &ObjectKey, content_type: Option<&str>) -> Option<Rejection> {
        let is_image = match self.mode {
            EligibilityMode::ContentType => content_type
                .map(|ct| self.allowed_content_types.iter().any(|a| a == ct))
                .unwrap_or(false),
            EligibilityMode::Extension => key
                .as_str()
                .rsplit_once('.')
                // case-sensitive, matching the suffix-based deployments
                .map(|(_, ext)| self.allowed_extensions.iter().any(|a| a == ext))
                .unwrap_or(false),
        };
        if !is_image {
            return Some(Rejection::NotAnImage);
        }

        if key.is_derivative() {
            return Some(Rejection::AlreadyDerived);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_type_filter() -> SourceFilter {
        SourceFilter::new(
            EligibilityMode::ContentType,
            vec!["image/jpeg".to_string(), "image/png".to_string()],
            vec![],
        )
    }

    fn extension_filter() -> SourceFilter {
        SourceFilter::new(
            EligibilityMode::Extension,
            vec![],
            vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
        )
    }

    #[test]
    fn test_eligible_jpeg_and_png() {
        let filter = content_type_filter();
        let key = ObjectKey::parse("photo.jpg");
        assert_eq!(filter.check(&key, Some("image/jpeg")), None);
        assert_eq!(filter.check(&key, Some("image/png")), None);
    }

    #[test]
    fn test_non_image_content_type_rejected() {
        let filter = content_type_filter();
        let key = ObjectKey::parse("notes.pdf");
        assert_eq!(
            filter.check(&key, Some("application/pdf")),
            Some(Rejection::NotAnImage)
        );
    }

    #[test]
    fn test_missing_content_type_rejected_in_content_type_mode() {
        let filter = content_type_filter();
        let key = ObjectKey::parse("photo.jpg");
        assert_eq!(filter.check(&key, None), Some(Rejection::NotAnImage));
    }

    #[test]
    fn test_derivative_key_rejected_even_with_image_content_type() {
        // The pattern check is authoritative: recursion prevention beats
        // whatever the content type claims.
        let filter = content_type_filter();
        let key = ObjectKey::parse("100x100@photo.jpg");
        assert_eq!(
            filter.check(&key, Some("image/jpeg")),
            Some(Rejection::AlreadyDerived)
        );
    }

    #[test]
    fn test_rule_order_type_check_first() {
        // A derivative-looking pdf reports the type failure, matching the
        // rule ordering.
        let filter = content_type_filter();
        let key = ObjectKey::parse("100x100@notes.pdf");
        assert_eq!(
            filter.check(&key, Some("application/pdf")),
            Some(Rejection::NotAnImage)
        );
    }

    #[test]
    fn test_extension_mode() {
        let filter = extension_filter();
        assert_eq!(filter.check(&ObjectKey::parse("photo.jpg"), None), None);
        assert_eq!(filter.check(&ObjectKey::parse("photo.jpeg"), None), None);
        assert_eq!(filter.check(&ObjectKey::parse("photo.png"), None), None);
        assert_eq!(
            filter.check(&ObjectKey::parse("notes.pdf"), None),
            Some(Rejection::NotAnImage)
        );
        assert_eq!(
            filter.check(&ObjectKey::parse("no-extension"), None),
            Some(Rejection::NotAnImage)
        );
    }

    #[test]
    fn test_extension_mode_is_case_sensitive() {
        let filter = extension_filter();
        assert_eq!(
            filter.check(&ObjectKey::parse("photo.JPG"), None),
            Some(Rejection::NotAnImage)
        );
    }

    #[test]
    fn test_extension_mode_still_excludes_derivatives() {
        let filter = extension_filter();
        assert_eq!(
            filter.check(&ObjectKey::parse("500x500@photo.png"), None),
            Some(Rejection::AlreadyDerived)
        );
    }

    #[test]
    fn test_check_is_deterministic() {
        let filter = content_type_filter();
        let key = ObjectKey::parse("photo.jpg");
        let first = filter.check(&key, Some("image/jpeg"));
        for _ in 0..10 {
            assert_eq!(filter.check(&key, Some("image/jpeg")), first);
        }
    }
}
