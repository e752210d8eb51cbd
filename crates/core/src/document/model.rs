use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logical page of an owner's site, as persisted in the page store.
///
/// `markup` and `style` are the source of truth. The two snapshot fields are
/// optional caches of the editor's structured state; a write that changes
/// the plain fields without a fresh snapshot clears them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// Older documents store this under `component`.
    #[serde(alias = "component", default)]
    pub markup: String,
    /// Older documents store this under `css`.
    #[serde(alias = "css", default)]
    pub style: String,
    /// Whole-project capture taken at the last debounced save.
    #[serde(
        rename = "projectData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub full_snapshot: Option<String>,
    /// This page alone in the editor's structured form, written by "save all".
    #[serde(
        rename = "pageProjectData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub page_snapshot: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single page inside a published site. Never carries snapshot fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPage {
    pub name: String,
    pub html: String,
    pub css: String,
    pub id: String,
}

/// Immutable, publicly readable capture of every page of a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedSite {
    #[serde(rename = "publicId")]
    pub public_id: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
    #[serde(rename = "userEmail")]
    pub owner_contact: String,
    #[serde(rename = "siteName")]
    pub site_label: String,
    pub pages: Vec<PublishedPage>,
    #[serde(rename = "createdAt")]
    pub published_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
}

/// The authenticated owner an editing session acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
    pub contact: String,
    pub site_label: String,
}

impl Owner {
    pub fn new(
        id: impl Into<String>,
        contact: impl Into<String>,
        site_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            contact: contact.into(),
            site_label: site_label.into(),
        }
    }
}
