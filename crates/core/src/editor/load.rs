//! Startup reconciliation of stored pages into the editing surface.

use crate::codec;
use crate::document::PageRecord;
use crate::error::EditorResult;
use crate::mutation::PageWrite;
use crate::notify::Notice;
use crate::surface::{SurfaceError, SurfacePage};

use super::PageEditor;

impl PageEditor {
    /// Pull the owner's pages into the editor.
    ///
    /// An owner without pages gets one default page, persisted before
    /// anything is applied. A page that fails to apply is logged and
    /// skipped; the rest still load. The first page ends up selected.
    pub async fn load(&self) -> EditorResult<Vec<PageRecord>> {
        let mut state = self.inner.state.lock().await;

        let records = match self.fetch_or_seed().await {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(owner = %self.inner.owner.id, error = %err, "Failed to load pages");
                self.notify(Notice::LoadFailed);
                return Err(err);
            }
        };

        let surface = &self.inner.surface;
        for stale in surface
            .pages()
            .into_iter()
            .filter(|page| !records.iter().any(|r| r.id == page.id))
        {
            if let Err(err) = surface.remove_page(&stale.id) {
                tracing::warn!(page = %stale.name, error = %err, "Could not remove editor page without a record");
            }
        }

        let mut applied = 0usize;
        for record in &records {
            match self.apply_record(record) {
                Ok(()) => applied += 1,
                Err(err) => {
                    tracing::warn!(
                        page = %record.name,
                        page_id = %record.id,
                        error = %err,
                        "Failed to load page; continuing with the rest"
                    );
                }
            }
        }

        state.current_page_id = None;
        if let Some(first) = records.first() {
            match surface.select_page(&first.id) {
                Ok(()) => state.current_page_id = Some(first.id.clone()),
                Err(err) => tracing::warn!(page = %first.name, error = %err, "Could not select first page"),
            }
        }

        state.pages = records.clone();
        state.dirty_pages.clear();
        state.unsaved_changes = false;

        tracing::info!(
            owner = %self.inner.owner.id,
            pages = records.len(),
            applied,
            "Pages loaded into editor"
        );
        Ok(records)
    }

    async fn fetch_or_seed(&self) -> EditorResult<Vec<PageRecord>> {
        let owner_id = &self.inner.owner.id;
        let mut records = self.inner.store.list_pages(owner_id).await?;

        if records.is_empty() {
            let config = &self.inner.config;
            let write = PageWrite::new(
                config.default_page_name.as_str(),
                config.default_page_markup.as_str(),
                "",
            );
            let record = self.inner.store.create_page(owner_id, write).await?;
            tracing::info!(owner = %owner_id, page_id = %record.id, "Created default page for empty site");
            records.push(record);
        }

        Ok(records)
    }

    /// Decode one record and push it into the surface, including a direct
    /// style injection into the rendering context.
    fn apply_record(&self, record: &PageRecord) -> Result<(), SurfaceError> {
        let surface = &self.inner.surface;
        let decoded = codec::decode(record);

        if !surface.pages().iter().any(|p| p.id == record.id) {
            surface.add_page(SurfacePage::new(&record.id, &record.name))?;
        }
        surface.select_page(&record.id)?;
        surface.set_markup(&decoded.markup)?;
        surface.set_style(&decoded.style)?;

        let ctx = surface.render_context();
        self.inner.styles.ensure(ctx.as_ref(), &record.id, &decoded.style);

        tracing::debug!(
            page = %record.name,
            source = decoded.source.as_str(),
            blank = decoded.markup.trim().is_empty(),
            "Page applied to editor"
        );
        Ok(())
    }
}
