//! Persistence and publication engine for a visual page editor.
//!
//! A [`PageEditor`] session loads an owner's pages into an
//! [`EditingSurface`], saves edits back through a debounced and a periodic
//! trigger that share one upsert path, and publishes every page into an
//! immutable public record.

pub mod codec;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod events;
pub mod mutation;
pub mod notify;
pub mod render;
pub mod size;
pub mod store;
pub mod surface;

pub use config::EditorConfig;
pub use document::{Owner, PageRecord, PublishedPage, PublishedSite};
pub use editor::{NavigationVerdict, PageEditor, PublishOutcome, SaveOutcome, SaveTrigger, TriggerHandle};
pub use error::{EditorError, EditorResult};
pub use store::{MemoryStore, PageStore, PgPageStore, StoreError};
pub use surface::{EditingSurface, HeadlessSurface, RenderContext};
