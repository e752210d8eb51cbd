//! PostgreSQL page store (`pages` and `published_sites` tables).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::document::{new_page_id, PageRecord, PublishedPage, PublishedSite};
use crate::mutation::PageWrite;

use super::{ensure_within_ceiling, PageStore, StoreError};

/// Column list for `pages` queries.
const PAGE_COLUMNS: &str =
    "id, owner_id, name, markup, style, full_snapshot, page_snapshot, created_at, updated_at";

/// Column list for `published_sites` queries.
const SITE_COLUMNS: &str =
    "public_id, owner_id, owner_contact, site_label, pages, published_at, updated_at, is_published";

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PgPageStore {
    pool: PgPool,
}

impl PgPageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct SiteRow {
    public_id: String,
    owner_id: String,
    owner_contact: String,
    site_label: String,
    pages: Json<Vec<PublishedPage>>,
    published_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    is_published: bool,
}

impl From<SiteRow> for PublishedSite {
    fn from(row: SiteRow) -> Self {
        Self {
            public_id: row.public_id,
            owner_id: row.owner_id,
            owner_contact: row.owner_contact,
            site_label: row.site_label,
            pages: row.pages.0,
            published_at: row.published_at,
            updated_at: row.updated_at,
            is_published: row.is_published,
        }
    }
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn list_pages(&self, owner_id: &str) -> Result<Vec<PageRecord>, StoreError> {
        let query = format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE owner_id = $1 ORDER BY created_at, id"
        );
        let pages = sqlx::query_as::<_, PageRecord>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(pages)
    }

    async fn create_page(&self, owner_id: &str, write: PageWrite) -> Result<PageRecord, StoreError> {
        let record = write.into_record(new_page_id(), owner_id, Utc::now());
        ensure_within_ceiling(&record)?;

        let query = format!(
            "INSERT INTO pages ({PAGE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PAGE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, PageRecord>(&query)
            .bind(&record.id)
            .bind(&record.owner_id)
            .bind(&record.name)
            .bind(&record.markup)
            .bind(&record.style)
            .bind(&record.full_snapshot)
            .bind(&record.page_snapshot)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_page(
        &self,
        owner_id: &str,
        page_id: &str,
        write: PageWrite,
    ) -> Result<PageRecord, StoreError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE owner_id = $1 AND id = $2 FOR UPDATE"
        );
        let current = sqlx::query_as::<_, PageRecord>(&select)
            .bind(owner_id)
            .bind(page_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::PageNotFound(page_id.to_string()))?;

        let merged = write.apply_to(current, Utc::now());
        ensure_within_ceiling(&merged)?;

        let update = format!(
            "UPDATE pages SET \
                 name = $3, markup = $4, style = $5, \
                 full_snapshot = $6, page_snapshot = $7, updated_at = $8 \
             WHERE owner_id = $1 AND id = $2 \
             RETURNING {PAGE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, PageRecord>(&update)
            .bind(owner_id)
            .bind(page_id)
            .bind(&merged.name)
            .bind(&merged.markup)
            .bind(&merged.style)
            .bind(&merged.full_snapshot)
            .bind(&merged.page_snapshot)
            .bind(merged.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn insert_site(&self, site: &PublishedSite) -> Result<(), StoreError> {
        ensure_within_ceiling(site)?;

        let query = format!(
            "INSERT INTO published_sites ({SITE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );
        let result = sqlx::query(&query)
            .bind(&site.public_id)
            .bind(&site.owner_id)
            .bind(&site.owner_contact)
            .bind(&site.site_label)
            .bind(Json(&site.pages))
            .bind(site.published_at)
            .bind(site.updated_at)
            .bind(site.is_published)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(StoreError::SiteExists(site.public_id.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_site(&self, public_id: &str) -> Result<Option<PublishedSite>, StoreError> {
        let query = format!("SELECT {SITE_COLUMNS} FROM published_sites WHERE public_id = $1");
        let row = sqlx::query_as::<_, SiteRow>(&query)
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(PublishedSite::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
