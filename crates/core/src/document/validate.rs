/// Validation of values that reach the store or a public URL.
use thiserror::Error;

const PAGE_NAME_MAX_CHARS: usize = 120;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("page name cannot be empty")]
    EmptyPageName,
    #[error("page name exceeds 120 characters")]
    PageNameTooLong,
    #[error("public id cannot be empty")]
    EmptyPublicId,
    #[error("public id is not URL-safe: {0}")]
    InvalidPublicId(String),
}

/// Page names are the lookup key for upserts, so blank names are refused.
pub fn validate_page_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyPageName);
    }
    if name.chars().count() > PAGE_NAME_MAX_CHARS {
        return Err(ValidationError::PageNameTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names() {
        assert_eq!(validate_page_name("Home"), Ok(()));
        assert_eq!(
            validate_page_name("   "),
            Err(ValidationError::EmptyPageName)
        );
        assert_eq!(
            validate_page_name(&"x".repeat(121)),
            Err(ValidationError::PageNameTooLong)
        );
    }
}
