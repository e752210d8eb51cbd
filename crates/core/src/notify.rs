//! User-visible notices. Delivery (toasts, banners) belongs to the caller.

/// Message ids handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PageSaved { page: String },
    SaveFailed { page: String },
    AllPagesSaved { count: usize },
    LoadFailed,
    Published { url: String },
    PublishFailed,
}

impl Notice {
    pub fn id(&self) -> &'static str {
        match self {
            Notice::PageSaved { .. } => "page-saved",
            Notice::SaveFailed { .. } => "save-failed",
            Notice::AllPagesSaved { .. } => "all-pages-saved",
            Notice::LoadFailed => "load-failed",
            Notice::Published { .. } => "published",
            Notice::PublishFailed => "publish-failed",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::SaveFailed { .. } | Notice::LoadFailed | Notice::PublishFailed
        )
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        if notice.is_error() {
            tracing::warn!(notice = notice.id(), ?notice, "Editor notice");
        } else {
            tracing::info!(notice = notice.id(), ?notice, "Editor notice");
        }
    }
}
