//! Approximate document sizing and the degrade-before-the-ceiling policy.
//!
//! Estimates are the sum of the UTF-8 byte lengths of the parts being
//! written. They ignore field names and JSON escaping, so the two budgets
//! sit well below [`DOCUMENT_CEILING`].

use serde::Serialize;

use crate::mutation::{FieldUpdate, PageWrite};

/// Above this estimate the whole-project snapshot is left out of a page write.
pub const SNAPSHOT_BUDGET: usize = 700_000;

/// Above this serialized size a published page is reduced to its minimal shape.
pub const PUBLISH_PAGE_BUDGET: usize = 500_000;

/// Hard per-document limit of the target store.
pub const DOCUMENT_CEILING: usize = 1_048_576;

/// Optional fields a page write may shed, heaviest and least essential first.
pub const DROP_ORDER: [SnapshotField; 2] = [SnapshotField::Full, SnapshotField::Page];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotField {
    Full,
    Page,
}

impl SnapshotField {
    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotField::Full => "projectData",
            SnapshotField::Page => "pageProjectData",
        }
    }

    /// The estimate above which this field is dropped.
    fn threshold(self) -> usize {
        match self {
            SnapshotField::Full => SNAPSHOT_BUDGET,
            SnapshotField::Page => DOCUMENT_CEILING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Fits every budget, including the publish budget.
    Comfortable,
    /// Over the publish budget but still allowed to carry snapshots.
    Elevated,
    /// Over the snapshot budget.
    OverBudget,
}

/// Estimate the serialized size of a page write.
pub fn estimate(
    name: &str,
    markup: &str,
    style: &str,
    full_snapshot: Option<&str>,
    page_snapshot: Option<&str>,
) -> usize {
    name.len()
        + markup.len()
        + style.len()
        + full_snapshot.map_or(0, str::len)
        + page_snapshot.map_or(0, str::len)
}

pub fn classify(bytes: usize) -> SizeClass {
    if bytes > SNAPSHOT_BUDGET {
        SizeClass::OverBudget
    } else if bytes > PUBLISH_PAGE_BUDGET {
        SizeClass::Elevated
    } else {
        SizeClass::Comfortable
    }
}

fn estimate_write(write: &PageWrite) -> usize {
    estimate(
        &write.name,
        &write.markup,
        &write.style,
        write.full_snapshot.as_set(),
        write.page_snapshot.as_set(),
    )
}

/// Apply the drop policy to a write, returning the fields that were shed.
///
/// A dropped snapshot is cleared rather than kept so a stale capture cannot
/// outlive the markup it was taken from.
pub fn apply_write_policy(mut write: PageWrite) -> (PageWrite, Vec<SnapshotField>) {
    let mut dropped = Vec::new();

    for field in DROP_ORDER {
        let bytes = estimate_write(&write);
        if bytes <= field.threshold() {
            continue;
        }
        let slot = match field {
            SnapshotField::Full => &mut write.full_snapshot,
            SnapshotField::Page => &mut write.page_snapshot,
        };
        if slot.as_set().is_none() {
            continue;
        }
        *slot = FieldUpdate::Clear;
        tracing::warn!(
            page = %write.name,
            field = field.as_str(),
            estimated_bytes = bytes,
            threshold = field.threshold(),
            "Dropping snapshot from page write to stay under the document ceiling"
        );
        dropped.push(field);
    }

    (write, dropped)
}

/// Serialized JSON length of a value, or `usize::MAX` if it cannot be serialized.
pub fn serialized_len<T: Serialize>(value: &T) -> usize {
    serde_json::to_vec(value).map_or(usize::MAX, |bytes| bytes.len())
}

/// Whether a single published page fits the publish budget.
pub fn fits_publish_budget<T: Serialize>(page: &T) -> bool {
    serialized_len(page) <= PUBLISH_PAGE_BUDGET
}
