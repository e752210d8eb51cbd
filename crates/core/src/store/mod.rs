//! Persistence of page records and published sites.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::document::{PageRecord, PublishedSite};
use crate::mutation::PageWrite;
use crate::size::{serialized_len, DOCUMENT_CEILING};

pub use memory::MemoryStore;
pub use postgres::PgPageStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page not found: {0}")]
    PageNotFound(String),

    #[error("document of {size} bytes exceeds the {limit} byte ceiling")]
    DocumentTooLarge { size: usize, limit: usize },

    #[error("published site already exists: {0}")]
    SiteExists(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Keyed collection of page records per owner, plus the append-only
/// collection of published sites.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// All of an owner's pages, oldest first.
    async fn list_pages(&self, owner_id: &str) -> Result<Vec<PageRecord>, StoreError>;

    async fn create_page(&self, owner_id: &str, write: PageWrite) -> Result<PageRecord, StoreError>;

    /// Merge `write` into an existing page.
    async fn update_page(
        &self,
        owner_id: &str,
        page_id: &str,
        write: PageWrite,
    ) -> Result<PageRecord, StoreError>;

    /// Insert a published site. Sites are never updated.
    async fn insert_site(&self, site: &PublishedSite) -> Result<(), StoreError>;

    async fn get_site(&self, public_id: &str) -> Result<Option<PublishedSite>, StoreError>;

    /// Cheap liveness check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Reject documents the target store could not hold.
pub fn ensure_within_ceiling<T: Serialize>(document: &T) -> Result<(), StoreError> {
    let size = serialized_len(document);
    if size > DOCUMENT_CEILING {
        return Err(StoreError::DocumentTooLarge {
            size,
            limit: DOCUMENT_CEILING,
        });
    }
    Ok(())
}
