//! In-memory editing surface without a canvas.
//!
//! Drives the engine from tests and from server-side tooling. Programmatic
//! calls (`set_markup`, `set_style`) are silent like a real editor's
//! loaders; the `edit_*` helpers behave like user edits and emit events.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{json, Value};
use tokio::sync::broadcast;

use crate::events::{EditorEvent, EventBus};

use super::{EditingSurface, RenderContext, SurfaceError, SurfacePage};

#[derive(Debug, Clone)]
struct HeadlessPage {
    id: String,
    name: String,
    markup: String,
    style: String,
}

#[derive(Debug, Default)]
struct HeadlessState {
    pages: Vec<HeadlessPage>,
    selected: Option<String>,
}

impl HeadlessState {
    fn selected_mut(&mut self) -> Result<&mut HeadlessPage, SurfaceError> {
        let id = self.selected.as_deref().ok_or(SurfaceError::NoSelection)?;
        self.pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(SurfaceError::NoSelection)
    }

    fn selected(&self) -> Option<&HeadlessPage> {
        let id = self.selected.as_deref()?;
        self.pages.iter().find(|p| p.id == id)
    }
}

pub struct HeadlessSurface {
    state: Mutex<HeadlessState>,
    bus: EventBus,
    context: Arc<HeadlessRenderContext>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HeadlessState::default()),
            bus: EventBus::default(),
            context: Arc::new(HeadlessRenderContext::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the selected page's markup as a user edit would.
    pub fn edit_markup(&self, markup: &str) -> Result<(), SurfaceError> {
        self.set_markup(markup)?;
        self.bus.publish(EditorEvent::ComponentUpdated);
        Ok(())
    }

    /// Replace the selected page's style as a user edit would.
    pub fn edit_style(&self, style: &str) -> Result<(), SurfaceError> {
        self.set_style(style)?;
        self.bus.publish(EditorEvent::StyleUpdated);
        Ok(())
    }

    /// Reinitialize the rendering context, dropping every injected style.
    pub fn reload_canvas(&self) {
        self.context.reset();
        self.bus.publish(EditorEvent::CanvasReloaded);
    }

    pub fn headless_context(&self) -> &HeadlessRenderContext {
        &self.context
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl EditingSurface for HeadlessSurface {
    fn markup(&self) -> String {
        self.lock()
            .selected()
            .map(|p| p.markup.clone())
            .unwrap_or_default()
    }

    fn style(&self) -> String {
        self.lock()
            .selected()
            .map(|p| p.style.clone())
            .unwrap_or_default()
    }

    fn set_markup(&self, markup: &str) -> Result<(), SurfaceError> {
        self.lock().selected_mut()?.markup = markup.to_string();
        Ok(())
    }

    fn set_style(&self, style: &str) -> Result<(), SurfaceError> {
        self.lock().selected_mut()?.style = style.to_string();
        Ok(())
    }

    fn pages(&self) -> Vec<SurfacePage> {
        self.lock()
            .pages
            .iter()
            .map(|p| SurfacePage::new(&p.id, &p.name))
            .collect()
    }

    fn selected_page(&self) -> Option<SurfacePage> {
        self.lock()
            .selected()
            .map(|p| SurfacePage::new(&p.id, &p.name))
    }

    fn select_page(&self, page_id: &str) -> Result<(), SurfaceError> {
        {
            let mut state = self.lock();
            if !state.pages.iter().any(|p| p.id == page_id) {
                return Err(SurfaceError::PageNotFound(page_id.to_string()));
            }
            state.selected = Some(page_id.to_string());
        }
        self.bus.publish(EditorEvent::PageSelected {
            page_id: page_id.to_string(),
        });
        Ok(())
    }

    fn add_page(&self, page: SurfacePage) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        if state.pages.iter().any(|p| p.id == page.id) {
            return Err(SurfaceError::DuplicatePage(page.id));
        }
        state.pages.push(HeadlessPage {
            id: page.id,
            name: page.name,
            markup: String::new(),
            style: String::new(),
        });
        Ok(())
    }

    fn remove_page(&self, page_id: &str) -> Result<(), SurfaceError> {
        let mut state = self.lock();
        let before = state.pages.len();
        state.pages.retain(|p| p.id != page_id);
        if state.pages.len() == before {
            return Err(SurfaceError::PageNotFound(page_id.to_string()));
        }
        if state.selected.as_deref() == Some(page_id) {
            state.selected = None;
        }
        Ok(())
    }

    fn project_data(&self) -> Value {
        let state = self.lock();
        let pages: Vec<Value> = state
            .pages
            .iter()
            .map(|p| {
                json!({
                    "id": p.id,
                    "name": p.name,
                    "component": p.markup,
                    "styles": p.style,
                })
            })
            .collect();
        json!({ "pages": pages })
    }

    fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.bus.subscribe()
    }

    fn render_context(&self) -> Arc<dyn RenderContext> {
        self.context.clone()
    }
}

/// Rendering context holding style blocks by key.
#[derive(Debug, Default)]
pub struct HeadlessRenderContext {
    blocks: Mutex<BTreeMap<String, String>>,
}

impl HeadlessRenderContext {
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.blocks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop every injected block, as a context reinitialization does.
    pub fn reset(&self) {
        self.lock().clear();
    }

    pub fn block_count(&self) -> usize {
        self.lock().len()
    }
}

impl RenderContext for HeadlessRenderContext {
    fn upsert_style_block(&self, key: &str, css: &str) {
        self.lock().insert(key.to_string(), css.to_string());
    }

    fn style_block(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn edits_emit_events_and_programmatic_calls_do_not() {
        let surface = HeadlessSurface::new();
        surface.add_page(SurfacePage::new("p1", "Home")).unwrap();
        let mut rx = surface.subscribe();

        surface.select_page("p1").unwrap();
        surface.set_markup("<p>silent</p>").unwrap();
        surface.edit_markup("<p>loud</p>").unwrap();
        surface.edit_style("p{}").unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            EditorEvent::PageSelected { page_id: "p1".into() }
        );
        assert_eq!(rx.recv().await.unwrap(), EditorEvent::ComponentUpdated);
        assert_eq!(rx.recv().await.unwrap(), EditorEvent::StyleUpdated);
        assert_eq!(surface.markup(), "<p>loud</p>");
    }

    #[test]
    fn content_calls_need_a_selection() {
        let surface = HeadlessSurface::new();
        surface.add_page(SurfacePage::new("p1", "Home")).unwrap();
        assert_eq!(surface.set_markup("x"), Err(SurfaceError::NoSelection));
        assert_eq!(surface.markup(), "");
        assert_eq!(
            surface.select_page("nope"),
            Err(SurfaceError::PageNotFound("nope".into()))
        );
    }

    #[test]
    fn project_data_lists_every_page() {
        let surface = HeadlessSurface::new();
        surface.add_page(SurfacePage::new("p1", "Home")).unwrap();
        surface.add_page(SurfacePage::new("p2", "About")).unwrap();
        surface.select_page("p2").unwrap();
        surface.set_markup("<h1>About</h1>").unwrap();

        let project = surface.project_data();
        assert_eq!(project["pages"][1]["component"], "<h1>About</h1>");
        assert_eq!(project["pages"][0]["name"], "Home");
    }

    #[test]
    fn removing_selected_page_clears_selection() {
        let surface = HeadlessSurface::new();
        surface.add_page(SurfacePage::new("p1", "Home")).unwrap();
        surface.select_page("p1").unwrap();
        surface.remove_page("p1").unwrap();
        assert_eq!(surface.selected_page(), None);
        assert!(surface.pages().is_empty());
    }
}
