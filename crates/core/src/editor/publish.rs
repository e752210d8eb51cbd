//! Publication of every page into an immutable public record.

use chrono::Utc;

use crate::document::{PageRecord, PublicId, PublishedPage, PublishedSite};
use crate::error::{EditorError, EditorResult};
use crate::notify::Notice;
use crate::size::{fits_publish_budget, serialized_len, DOCUMENT_CEILING, PUBLISH_PAGE_BUDGET};

use super::PageEditor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub public_id: String,
    pub url: String,
    pub page_count: usize,
    /// Pages over the publish budget, published in their minimal form.
    pub oversized_pages: Vec<String>,
}

impl PageEditor {
    /// Save everything, then write one new published site and return its
    /// public URL. Nothing is written to the public collection unless every
    /// step before the final insert succeeded.
    pub async fn publish(&self) -> EditorResult<PublishOutcome> {
        match self.try_publish().await {
            Ok(outcome) => {
                tracing::info!(
                    owner = %self.inner.owner.id,
                    public_id = %outcome.public_id,
                    pages = outcome.page_count,
                    "Site published"
                );
                self.notify(Notice::Published {
                    url: outcome.url.clone(),
                });
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(owner = %self.inner.owner.id, error = %err, "Publish failed");
                self.notify(Notice::PublishFailed);
                Err(err)
            }
        }
    }

    async fn try_publish(&self) -> EditorResult<PublishOutcome> {
        self.save_all().await?;

        let pages = {
            let state = self.inner.state.lock().await;
            self.collect_live_pages(&state.pages)?
        };
        let (pages, oversized_pages) = enforce_publish_budget(pages);

        let now = Utc::now();
        let owner = &self.inner.owner;
        let site = PublishedSite {
            public_id: PublicId::generate().into_inner(),
            owner_id: owner.id.clone(),
            owner_contact: owner.contact.clone(),
            site_label: owner.site_label.clone(),
            pages,
            published_at: now,
            updated_at: now,
            is_published: true,
        };

        let size = serialized_len(&site);
        if size > DOCUMENT_CEILING {
            return Err(EditorError::SiteTooLarge {
                size,
                limit: DOCUMENT_CEILING,
            });
        }

        self.inner.store.insert_site(&site).await?;

        Ok(PublishOutcome {
            url: self.inner.config.site_url(&site.public_id),
            page_count: site.pages.len(),
            public_id: site.public_id,
            oversized_pages,
        })
    }

    /// Build the public form of each cached page, reading markup and style
    /// from the editor where the page is live there.
    fn collect_live_pages(&self, records: &[PageRecord]) -> EditorResult<Vec<PublishedPage>> {
        let surface = &self.inner.surface;
        let previous = surface.selected_page();
        let live_pages = surface.pages();

        let mut collected = Vec::with_capacity(records.len());
        let mut failure = None;

        for record in records {
            let live = live_pages
                .iter()
                .find(|p| p.id == record.id)
                .or_else(|| live_pages.iter().find(|p| p.name == record.name));

            let (html, css) = match live {
                Some(page) => {
                    if let Err(err) = surface.select_page(&page.id) {
                        failure = Some(err);
                        break;
                    }
                    (surface.markup(), surface.style())
                }
                None => (record.markup.clone(), record.style.clone()),
            };

            collected.push(PublishedPage {
                name: record.name.clone(),
                html,
                css,
                id: record.id.clone(),
            });
        }

        self.restore_selection(previous);
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(collected),
        }
    }
}

/// Check each page against the publish budget. [`PublishedPage`] has no
/// field beyond `{name, html, css, id}`, so an oversized page is already in
/// its minimal shape; it is published as is and reported.
fn enforce_publish_budget(pages: Vec<PublishedPage>) -> (Vec<PublishedPage>, Vec<String>) {
    let oversized = pages
        .iter()
        .filter(|page| !fits_publish_budget(page))
        .map(|page| {
            tracing::warn!(
                page = %page.name,
                bytes = serialized_len(page),
                budget = PUBLISH_PAGE_BUDGET,
                "Published page exceeds the publish budget; keeping minimal fields only"
            );
            page.name.clone()
        })
        .collect();
    (pages, oversized)
}
