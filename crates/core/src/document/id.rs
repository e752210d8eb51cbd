/// Identifier utilities for pages and published sites.
///
/// - Page ids: opaque strings, generated by the store as UUID v4.
/// - Public ids: URL-safe tokens under which a published site is served
///   at `/sites/{publicId}`.
use std::fmt;

use uuid::Uuid;

use super::validate::ValidationError;

const PUBLIC_ID_MAX_LEN: usize = 64;
const STYLE_BLOCK_PREFIX: &str = "page-style-";

/// Generate a fresh page id.
pub fn new_page_id() -> String {
    Uuid::new_v4().to_string()
}

/// Key of the style block injected into the rendering context for a page.
pub fn style_block_key(page_id: &str) -> String {
    format!("{STYLE_BLOCK_PREFIX}{page_id}")
}

/// URL-safe, globally unique identifier of a published site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicId(String);

impl PublicId {
    /// Generate a new id: the 32 lowercase hex digits of a v4 UUID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Parse an id received from a URL. Only `[A-Za-z0-9_-]` is accepted.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::EmptyPublicId);
        }
        if raw.len() > PUBLIC_ID_MAX_LEN
            || !raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidPublicId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_url_safe_and_unique() {
        let a = PublicId::generate();
        let b = PublicId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert_eq!(PublicId::parse(a.as_str()).unwrap(), a);
    }

    #[test]
    fn parse_rejects_path_characters() {
        assert!(matches!(
            PublicId::parse("../etc"),
            Err(ValidationError::InvalidPublicId(_))
        ));
        assert!(matches!(
            PublicId::parse(""),
            Err(ValidationError::EmptyPublicId)
        ));
        assert!(PublicId::parse("site_01-a").is_ok());
    }

    #[test]
    fn style_block_key_is_keyed_by_page() {
        assert_eq!(style_block_key("p1"), "page-style-p1");
    }
}
