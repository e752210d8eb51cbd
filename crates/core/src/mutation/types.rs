/// The single merge-patch shape every page store accepts.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::PageRecord;

/// How an optional snapshot column is treated by a write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "op", content = "value")]
pub enum FieldUpdate {
    /// Leave the stored value untouched.
    #[default]
    Keep,
    Set(String),
    /// Remove the stored value.
    Clear,
}

impl FieldUpdate {
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(v) => FieldUpdate::Set(v),
            None => FieldUpdate::Keep,
        }
    }

    /// The value this update would write, if it writes one.
    pub fn as_set(&self) -> Option<&str> {
        match self {
            FieldUpdate::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn apply(self, current: Option<String>) -> Option<String> {
        match self {
            FieldUpdate::Keep => current,
            FieldUpdate::Set(v) => Some(v),
            FieldUpdate::Clear => None,
        }
    }
}

/// Fields written by an upsert. `name`, `markup` and `style` are always
/// written; the snapshots follow their [`FieldUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWrite {
    pub name: String,
    pub markup: String,
    pub style: String,
    #[serde(default)]
    pub full_snapshot: FieldUpdate,
    #[serde(default)]
    pub page_snapshot: FieldUpdate,
}

impl PageWrite {
    pub fn new(name: impl Into<String>, markup: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markup: markup.into(),
            style: style.into(),
            full_snapshot: FieldUpdate::Keep,
            page_snapshot: FieldUpdate::Keep,
        }
    }

    /// Merge this write into an existing record. `updated_at` never moves
    /// backwards, even if the clock does.
    pub fn apply_to(self, mut record: PageRecord, now: DateTime<Utc>) -> PageRecord {
        record.name = self.name;
        record.markup = self.markup;
        record.style = self.style;
        record.full_snapshot = self.full_snapshot.apply(record.full_snapshot.take());
        record.page_snapshot = self.page_snapshot.apply(record.page_snapshot.take());
        record.updated_at = monotonic_after(record.updated_at, now);
        record
    }

    /// Build a fresh record from this write.
    pub fn into_record(self, id: String, owner_id: &str, now: DateTime<Utc>) -> PageRecord {
        PageRecord {
            id,
            owner_id: owner_id.to_string(),
            name: self.name,
            markup: self.markup,
            style: self.style,
            full_snapshot: self.full_snapshot.apply(None),
            page_snapshot: self.page_snapshot.apply(None),
            created_at: now,
            updated_at: now,
        }
    }
}

fn monotonic_after(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}

/// Whether an upsert created a record or merged into an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteOperation {
    Create,
    Update,
}
