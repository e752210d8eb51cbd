use chrono::{DateTime, Utc};

use crate::document::PageRecord;

/// Mutable state of one editing session, shared by every save trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSaveState {
    pub current_page_id: Option<String>,
    pub unsaved_changes: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    /// Pages edited since their last successful write, in edit order.
    pub dirty_pages: Vec<String>,
    /// Local copy of the owner's records, in store order.
    pub pages: Vec<PageRecord>,
}

impl EditorSaveState {
    pub fn find_by_name(&self, name: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.name == name)
    }

    /// Replace the cached record with the same id, or append it.
    pub fn upsert_cached(&mut self, record: PageRecord) {
        match self.pages.iter_mut().find(|p| p.id == record.id) {
            Some(slot) => *slot = record,
            None => self.pages.push(record),
        }
    }

    /// Record an edit. `page_id` is the page that was selected when the
    /// edit happened, when known.
    pub fn mark_dirty(&mut self, page_id: Option<&str>) {
        self.unsaved_changes = true;
        if let Some(id) = page_id {
            if !self.dirty_pages.iter().any(|p| p == id) {
                self.dirty_pages.push(id.to_string());
            }
        }
    }

    /// Every page was written.
    pub fn mark_saved(&mut self, at: DateTime<Utc>) {
        self.dirty_pages.clear();
        self.unsaved_changes = false;
        self.last_saved_at = Some(at);
    }

    /// One page was written. Changes stay pending while any other page is
    /// still dirty.
    pub fn mark_page_saved(&mut self, page_id: &str, at: DateTime<Utc>) {
        self.dirty_pages.retain(|p| p != page_id);
        self.unsaved_changes = !self.dirty_pages.is_empty();
        self.last_saved_at = Some(at);
    }

    /// Stop tracking a page that no longer exists in the editor.
    pub fn forget_dirty(&mut self, page_id: &str) {
        self.dirty_pages.retain(|p| p != page_id);
    }

    pub fn navigation_verdict(&self) -> NavigationVerdict {
        if self.unsaved_changes {
            NavigationVerdict::ConfirmLeave
        } else {
            NavigationVerdict::Proceed
        }
    }
}

/// Answer of the before-navigate guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationVerdict {
    Proceed,
    /// Unsaved changes exist; the user should confirm leaving.
    ConfirmLeave,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::PageWrite;

    fn record(id: &str, name: &str) -> PageRecord {
        PageWrite::new(name, "", "").into_record(id.into(), "u1", Utc::now())
    }

    #[test]
    fn upsert_cached_replaces_by_id() {
        let mut state = EditorSaveState::default();
        state.upsert_cached(record("p1", "Home"));
        state.upsert_cached(record("p2", "About"));

        let mut renamed = record("p1", "Start");
        renamed.markup = "<p>x</p>".into();
        state.upsert_cached(renamed);

        assert_eq!(state.pages.len(), 2);
        assert_eq!(state.pages[0].name, "Start");
        assert!(state.find_by_name("Home").is_none());
        assert_eq!(state.find_by_name("About").map(|p| p.id.as_str()), Some("p2"));
    }

    #[test]
    fn verdict_follows_unsaved_flag() {
        let mut state = EditorSaveState::default();
        assert_eq!(state.navigation_verdict(), NavigationVerdict::Proceed);
        state.unsaved_changes = true;
        assert_eq!(state.navigation_verdict(), NavigationVerdict::ConfirmLeave);
        state.mark_saved(Utc::now());
        assert_eq!(state.navigation_verdict(), NavigationVerdict::Proceed);
        assert!(state.last_saved_at.is_some());
    }

    #[test]
    fn saving_one_page_keeps_other_edits_pending() {
        let mut state = EditorSaveState::default();
        state.mark_dirty(Some("home"));
        state.mark_dirty(Some("about"));
        state.mark_dirty(Some("home"));
        assert_eq!(state.dirty_pages, vec!["home".to_string(), "about".to_string()]);

        state.mark_page_saved("about", Utc::now());
        assert_eq!(state.navigation_verdict(), NavigationVerdict::ConfirmLeave);

        state.mark_page_saved("home", Utc::now());
        assert_eq!(state.navigation_verdict(), NavigationVerdict::Proceed);
    }

    #[test]
    fn edits_without_a_page_still_mark_unsaved() {
        let mut state = EditorSaveState::default();
        state.mark_dirty(None);
        assert!(state.dirty_pages.is_empty());
        assert_eq!(state.navigation_verdict(), NavigationVerdict::ConfirmLeave);
    }
}
