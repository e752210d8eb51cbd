use thiserror::Error;

use crate::codec::CodecError;
use crate::document::ValidationError;
use crate::store::StoreError;
use crate::surface::SurfaceError;

/// Errors surfaced by editing-session operations.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid page: {0}")]
    Validation(#[from] ValidationError),

    #[error("could not encode page: {0}")]
    Codec(#[from] CodecError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("editor error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("no page is selected in the editor")]
    NoSelectedPage,

    #[error("published site of {size} bytes exceeds the {limit} byte ceiling")]
    SiteTooLarge { size: usize, limit: usize },
}

impl EditorError {
    /// Whether retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EditorError::Store(StoreError::Unavailable(_) | StoreError::Database(_))
        )
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
