use chrono::Utc;

use crate::codec::{self, split_document, EditorPage, PageSnapshot};
use crate::document::{validate_page_name, PageRecord};
use crate::error::{EditorError, EditorResult};
use crate::mutation::WriteOperation;
use crate::notify::Notice;
use crate::size::{self, SnapshotField};
use crate::surface::SurfacePage;

use super::state::EditorSaveState;
use super::PageEditor;

/// What caused a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    /// Quiet period after a burst of edits.
    Debounced,
    /// Fallback timer.
    Periodic,
    /// Direct call by the embedding application.
    Explicit,
}

impl SaveTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveTrigger::Debounced => "debounced",
            SaveTrigger::Periodic => "periodic",
            SaveTrigger::Explicit => "explicit",
        }
    }

    /// Debounced saves carry the whole-project capture.
    fn captures_project(self) -> bool {
        matches!(self, SaveTrigger::Debounced)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub record: PageRecord,
    pub operation: WriteOperation,
    /// Snapshots shed by the size policy.
    pub dropped: Vec<SnapshotField>,
}

impl PageEditor {
    /// Upsert one page by name: update the cached record with that name, or
    /// create a new one.
    ///
    /// On success the page stops counting as dirty, and the unsaved-changes
    /// flag clears once no other page is dirty. On failure the flag stays set
    /// and the error is returned; nothing is retried.
    pub async fn save(&self, page: EditorPage) -> EditorResult<SaveOutcome> {
        let name = page.name.clone();
        let mut state = self.inner.state.lock().await;

        match self.upsert(&mut state, page).await {
            Ok(outcome) => {
                // Editor pages created before their record carry their own id.
                if let Some(live) = self
                    .inner
                    .surface
                    .pages()
                    .into_iter()
                    .find(|p| p.name == outcome.record.name && p.id != outcome.record.id)
                {
                    state.forget_dirty(&live.id);
                }
                state.mark_page_saved(&outcome.record.id, Utc::now());
                Ok(outcome)
            }
            Err(err) => {
                state.unsaved_changes = true;
                tracing::warn!(
                    page = %name,
                    error = %err,
                    transient = err.is_transient(),
                    "Page save failed"
                );
                self.notify(Notice::SaveFailed { page: name });
                Err(err)
            }
        }
    }

    /// Save the page currently selected in the editor.
    pub async fn save_selected(&self, trigger: SaveTrigger) -> EditorResult<SaveOutcome> {
        let page = self.capture_selected(trigger.captures_project())?;
        tracing::debug!(page = %page.name, trigger = trigger.as_str(), "Saving selected page");
        let outcome = self.save(page).await?;
        if trigger == SaveTrigger::Explicit {
            self.notify(Notice::PageSaved {
                page: outcome.record.name.clone(),
            });
        }
        Ok(outcome)
    }

    /// Save one editor page by id, whether or not it is selected. The
    /// selection is left as it was.
    pub async fn save_page(&self, page_id: &str, trigger: SaveTrigger) -> EditorResult<SaveOutcome> {
        let page = self.capture_page(page_id, trigger.captures_project())?;
        tracing::debug!(page = %page.name, page_id, trigger = trigger.as_str(), "Saving page");
        self.save(page).await
    }

    /// Save every page the editor knows, each with its own page snapshot.
    /// The selection is restored afterwards.
    pub async fn save_all(&self) -> EditorResult<Vec<SaveOutcome>> {
        let mut state = self.inner.state.lock().await;
        let previous = self.inner.surface.selected_page();

        let result = self.save_all_locked(&mut state).await;
        self.restore_selection(previous);

        match result {
            Ok(outcomes) => {
                state.mark_saved(Utc::now());
                tracing::info!(count = outcomes.len(), "Saved all pages");
                self.notify(Notice::AllPagesSaved {
                    count: outcomes.len(),
                });
                Ok(outcomes)
            }
            Err(err) => {
                state.unsaved_changes = true;
                tracing::warn!(error = %err, "Saving all pages failed");
                self.notify(Notice::SaveFailed {
                    page: "all pages".to_string(),
                });
                Err(err)
            }
        }
    }

    /// Persist a page from a complete HTML document. Inline `<style>` blocks
    /// become the page style. The editor copy of the page is replaced too, or
    /// added when missing, so later saves carry the imported content.
    pub async fn import_page(&self, name: &str, document: &str) -> EditorResult<SaveOutcome> {
        let (markup, style) = split_document(document);
        let outcome = self.save(EditorPage::new(name, &markup, &style)).await?;

        let surface = &self.inner.surface;
        let previous = surface.selected_page();
        let existing = surface
            .pages()
            .into_iter()
            .find(|p| p.id == outcome.record.id || p.name == name);
        let page_id = match existing {
            Some(page) => page.id,
            None => {
                surface.add_page(SurfacePage::new(&outcome.record.id, name))?;
                outcome.record.id.clone()
            }
        };

        let applied = surface
            .select_page(&page_id)
            .and_then(|()| surface.set_markup(&markup))
            .and_then(|()| surface.set_style(&style));
        if applied.is_ok() {
            let ctx = surface.render_context();
            self.inner.styles.ensure(ctx.as_ref(), &page_id, &style);
        }
        self.restore_selection(previous);
        applied?;

        self.notify(Notice::PageSaved {
            page: outcome.record.name.clone(),
        });
        Ok(outcome)
    }

    async fn save_all_locked(&self, state: &mut EditorSaveState) -> EditorResult<Vec<SaveOutcome>> {
        let surface = &self.inner.surface;
        let project = surface.project_data();
        let mut outcomes = Vec::new();

        for page in surface.pages() {
            surface.select_page(&page.id)?;
            let markup = surface.markup();
            let style = surface.style();
            let snapshot = PageSnapshot::from_project(&project, &page.id, &page.name, &markup, &style);

            let editor_page = EditorPage {
                page_snapshot: Some(snapshot),
                ..EditorPage::new(page.name, markup, style)
            };
            outcomes.push(self.upsert(state, editor_page).await?);
        }
        Ok(outcomes)
    }

    fn capture_page(&self, page_id: &str, with_project: bool) -> EditorResult<EditorPage> {
        let surface = &self.inner.surface;
        let previous = surface.selected_page();
        if previous.as_ref().is_some_and(|p| p.id == page_id) {
            return self.capture_selected(with_project);
        }

        surface.select_page(page_id)?;
        let captured = self.capture_selected(with_project);
        self.restore_selection(previous);
        captured
    }

    fn capture_selected(&self, with_project: bool) -> EditorResult<EditorPage> {
        let surface = &self.inner.surface;
        let page = surface.selected_page().ok_or(EditorError::NoSelectedPage)?;
        Ok(EditorPage {
            full_snapshot: with_project.then(|| surface.project_data()),
            ..EditorPage::new(page.name, surface.markup(), surface.style())
        })
    }

    /// The single write primitive. Callers hold the state lock.
    async fn upsert(&self, state: &mut EditorSaveState, page: EditorPage) -> EditorResult<SaveOutcome> {
        validate_page_name(&page.name)?;
        let fields = codec::encode(&page)?;

        let existing = state.find_by_name(&fields.name).map(|r| {
            let unchanged = r.markup == fields.markup && r.style == fields.style;
            (r.id.clone(), unchanged)
        });
        // Snapshots not supplied with new content would describe old content.
        let content_changed = existing.as_ref().map_or(true, |(_, unchanged)| !unchanged);
        let (write, dropped) = size::apply_write_policy(fields.into_write(content_changed));

        let owner_id = &self.inner.owner.id;
        let (record, operation) = match existing {
            Some((page_id, _)) => (
                self.inner.store.update_page(owner_id, &page_id, write).await?,
                WriteOperation::Update,
            ),
            None => (
                self.inner.store.create_page(owner_id, write).await?,
                WriteOperation::Create,
            ),
        };

        tracing::debug!(
            page = %record.name,
            page_id = %record.id,
            operation = ?operation,
            dropped = dropped.len(),
            "Page written"
        );
        state.upsert_cached(record.clone());

        Ok(SaveOutcome {
            record,
            operation,
            dropped,
        })
    }
}
