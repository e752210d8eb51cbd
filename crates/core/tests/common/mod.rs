#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use site_lake_core::notify::{Notice, Notifier};
use site_lake_core::{EditorConfig, HeadlessSurface, MemoryStore, Owner, PageEditor};

/// Notifier that keeps every notice for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.notices().iter().map(Notice::id).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct Session {
    pub editor: PageEditor,
    pub store: Arc<MemoryStore>,
    pub surface: Arc<HeadlessSurface>,
    pub notices: Arc<RecordingNotifier>,
}

pub const OWNER_ID: &str = "owner-1";

pub fn test_config() -> EditorConfig {
    EditorConfig::default().with_public_base_url("https://sites.example.test/")
}

/// Build a session over an existing store.
pub fn session_with_store(store: Arc<MemoryStore>) -> Session {
    let surface = Arc::new(HeadlessSurface::new());
    let notices = Arc::new(RecordingNotifier::default());
    let editor = PageEditor::with_notifier(
        Owner::new(OWNER_ID, "owner@example.test", "Corner Bakery"),
        store.clone(),
        surface.clone(),
        test_config(),
        notices.clone(),
    );
    Session {
        editor,
        store,
        surface,
        notices,
    }
}

/// Build a session over an empty store.
pub fn session() -> Session {
    session_with_store(Arc::new(MemoryStore::new()))
}
