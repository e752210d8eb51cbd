//! In-process page store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::document::{new_page_id, PageRecord, PublishedSite};
use crate::mutation::PageWrite;

use super::{ensure_within_ceiling, PageStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: RwLock<HashMap<String, Vec<PageRecord>>>,
    sites: RwLock<HashMap<String, PublishedSite>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn site_count(&self) -> usize {
        self.sites.read().await.len()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes are disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn list_pages(&self, owner_id: &str) -> Result<Vec<PageRecord>, StoreError> {
        Ok(self
            .pages
            .read()
            .await
            .get(owner_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_page(&self, owner_id: &str, write: PageWrite) -> Result<PageRecord, StoreError> {
        self.check_writable()?;
        let record = write.into_record(new_page_id(), owner_id, Utc::now());
        ensure_within_ceiling(&record)?;

        self.pages
            .write()
            .await
            .entry(owner_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update_page(
        &self,
        owner_id: &str,
        page_id: &str,
        write: PageWrite,
    ) -> Result<PageRecord, StoreError> {
        self.check_writable()?;
        let mut pages = self.pages.write().await;
        let slot = pages
            .get_mut(owner_id)
            .and_then(|owned| owned.iter_mut().find(|p| p.id == page_id))
            .ok_or_else(|| StoreError::PageNotFound(page_id.to_string()))?;

        let merged = write.apply_to(slot.clone(), Utc::now());
        ensure_within_ceiling(&merged)?;
        *slot = merged.clone();
        Ok(merged)
    }

    async fn insert_site(&self, site: &PublishedSite) -> Result<(), StoreError> {
        self.check_writable()?;
        ensure_within_ceiling(site)?;

        let mut sites = self.sites.write().await;
        if sites.contains_key(&site.public_id) {
            return Err(StoreError::SiteExists(site.public_id.clone()));
        }
        sites.insert(site.public_id.clone(), site.clone());
        Ok(())
    }

    async fn get_site(&self, public_id: &str) -> Result<Option<PublishedSite>, StoreError> {
        Ok(self.sites.read().await.get(public_id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
