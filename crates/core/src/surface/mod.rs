//! Interface of the visual editing surface the engine drives.
//!
//! The surface itself (canvas, drag and drop, selection UI) lives outside
//! this crate. Markup and style calls act on the currently selected page.

pub mod headless;
pub mod style;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::events::EditorEvent;

pub use headless::{HeadlessRenderContext, HeadlessSurface};
pub use style::StyleReapplier;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("page not found in editor: {0}")]
    PageNotFound(String),
    #[error("page already exists in editor: {0}")]
    DuplicatePage(String),
    #[error("no page is selected")]
    NoSelection,
    #[error("editor rejected content: {0}")]
    Rejected(String),
}

/// A logical page as the surface lists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfacePage {
    pub id: String,
    pub name: String,
}

impl SurfacePage {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

pub trait EditingSurface: Send + Sync {
    /// Markup of the selected page.
    fn markup(&self) -> String;
    /// Style of the selected page.
    fn style(&self) -> String;
    fn set_markup(&self, markup: &str) -> Result<(), SurfaceError>;
    fn set_style(&self, style: &str) -> Result<(), SurfaceError>;

    fn pages(&self) -> Vec<SurfacePage>;
    fn selected_page(&self) -> Option<SurfacePage>;
    fn select_page(&self, page_id: &str) -> Result<(), SurfaceError>;
    fn add_page(&self, page: SurfacePage) -> Result<(), SurfaceError>;
    fn remove_page(&self, page_id: &str) -> Result<(), SurfaceError>;

    /// Capture of the whole multi-page editor state.
    fn project_data(&self) -> Value;

    /// Stream of mutation and selection events.
    fn subscribe(&self) -> broadcast::Receiver<EditorEvent>;

    /// Handle to the live rendering context, for direct style injection.
    fn render_context(&self) -> Arc<dyn RenderContext>;
}

/// The live rendering context. It may reset at any time and lose every
/// injected style block.
pub trait RenderContext: Send + Sync {
    /// Insert the style block `key`, replacing any block with the same key.
    fn upsert_style_block(&self, key: &str, css: &str);
    fn style_block(&self, key: &str) -> Option<String>;
}
