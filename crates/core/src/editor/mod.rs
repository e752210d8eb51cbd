//! An editing session: one owner, one editing surface, one page store.
//!
//! All writes go through [`PageEditor::save`] (or `save_all`, which runs the
//! same upsert per page) while holding the session state lock, so the
//! debounced and periodic triggers never interleave half-applied writes.

mod load;
mod publish;
mod save;
mod state;
mod triggers;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::EditorConfig;
use crate::document::{Owner, PageRecord};
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::store::PageStore;
use crate::surface::{EditingSurface, StyleReapplier, SurfacePage};

pub use publish::PublishOutcome;
pub use save::{SaveOutcome, SaveTrigger};
pub use state::{EditorSaveState, NavigationVerdict};
pub use triggers::TriggerHandle;

/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct PageEditor {
    inner: Arc<EditorInner>,
}

struct EditorInner {
    owner: Owner,
    store: Arc<dyn PageStore>,
    surface: Arc<dyn EditingSurface>,
    notifier: Arc<dyn Notifier>,
    config: EditorConfig,
    styles: StyleReapplier,
    state: Mutex<EditorSaveState>,
}

impl PageEditor {
    pub fn new(
        owner: Owner,
        store: Arc<dyn PageStore>,
        surface: Arc<dyn EditingSurface>,
        config: EditorConfig,
    ) -> Self {
        Self::with_notifier(owner, store, surface, config, Arc::new(TracingNotifier))
    }

    pub fn with_notifier(
        owner: Owner,
        store: Arc<dyn PageStore>,
        surface: Arc<dyn EditingSurface>,
        config: EditorConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Arc::new(EditorInner {
                owner,
                store,
                surface,
                notifier,
                config,
                styles: StyleReapplier,
                state: Mutex::new(EditorSaveState::default()),
            }),
        }
    }

    pub fn owner(&self) -> &Owner {
        &self.inner.owner
    }

    pub fn config(&self) -> &EditorConfig {
        &self.inner.config
    }

    /// Copy of the current session state.
    pub async fn state(&self) -> EditorSaveState {
        self.inner.state.lock().await.clone()
    }

    /// Cached page records, in store order.
    pub async fn pages(&self) -> Vec<PageRecord> {
        self.inner.state.lock().await.pages.clone()
    }

    pub async fn has_unsaved_changes(&self) -> bool {
        self.inner.state.lock().await.unsaved_changes
    }

    /// Guard consulted before the user navigates away from the editor.
    pub async fn before_navigate(&self) -> NavigationVerdict {
        self.inner.state.lock().await.navigation_verdict()
    }

    /// Record an edit of `page_id` that did not arrive as an editor event.
    pub async fn mark_edited(&self, page_id: &str) {
        self.inner.state.lock().await.mark_dirty(Some(page_id));
    }

    /// Record an edit against the page the session believes is selected.
    pub(crate) async fn mark_dirty(&self) {
        let mut state = self.inner.state.lock().await;
        let page_id = state.current_page_id.clone();
        state.mark_dirty(page_id.as_deref());
    }

    /// Push the selected page's style into the rendering context.
    pub fn reapply_selected_style(&self) -> bool {
        let surface = &self.inner.surface;
        let Some(page) = surface.selected_page() else {
            return false;
        };
        let ctx = surface.render_context();
        self.inner.styles.ensure(ctx.as_ref(), &page.id, &surface.style())
    }

    fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(notice);
    }

    /// Re-select the page that was selected before a multi-page walk.
    fn restore_selection(&self, previous: Option<SurfacePage>) {
        let Some(page) = previous else {
            return;
        };
        if let Err(err) = self.inner.surface.select_page(&page.id) {
            tracing::warn!(page = %page.name, error = %err, "Could not restore page selection");
        }
    }
}
