//! The codec chain: encoding editor pages into page records and decoding
//! records back into a markup/style pair.
//!
//! Three representations of a page coexist in the store. Decoding walks
//! [`DECODE_ORDER`] and the first representation that yields non-empty
//! markup wins. A representation that fails to parse is skipped; decoding
//! itself never fails.

pub mod component;
pub mod css;
pub mod import;
pub mod snapshot;

use serde_json::Value;
use thiserror::Error;

use crate::document::PageRecord;
use crate::mutation::{FieldUpdate, PageWrite};

pub use import::split_document;
pub use snapshot::{Extracted, PageSnapshot, ProjectSnapshot};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A representation of a page that can be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    PageSnapshot,
    FullSnapshot,
    Plain,
}

/// Decode priority, richest representation first.
pub const DECODE_ORDER: [Encoding; 3] = [
    Encoding::PageSnapshot,
    Encoding::FullSnapshot,
    Encoding::Plain,
];

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::PageSnapshot => "pageProjectData",
            Encoding::FullSnapshot => "projectData",
            Encoding::Plain => "plain",
        }
    }

    /// Parse this representation out of a record. `Ok(None)` means the
    /// record does not carry it.
    fn attempt(self, record: &PageRecord) -> Result<Option<Extracted>, CodecError> {
        match self {
            Encoding::PageSnapshot => {
                let Some(raw) = record.page_snapshot.as_deref() else {
                    return Ok(None);
                };
                let snapshot: PageSnapshot = serde_json::from_str(raw)?;
                Ok(Some(snapshot.extract()))
            }
            Encoding::FullSnapshot => {
                let Some(raw) = record.full_snapshot.as_deref() else {
                    return Ok(None);
                };
                let project: ProjectSnapshot = serde_json::from_str(raw)?;
                Ok(project.extract(&record.id, &record.name))
            }
            Encoding::Plain => Ok(Some(Extracted {
                markup: record.markup.clone(),
                style: Some(record.style.clone()),
            })),
        }
    }
}

/// Content ready to apply to the editing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub markup: String,
    pub style: String,
    pub source: Encoding,
}

/// Decode a record. Snapshots that carry no style fall back to the
/// record's plain style.
pub fn decode(record: &PageRecord) -> DecodedPage {
    for encoding in DECODE_ORDER {
        match encoding.attempt(record) {
            Ok(Some(extracted)) if !extracted.markup.is_empty() => {
                return DecodedPage {
                    markup: extracted.markup,
                    style: extracted.style.unwrap_or_else(|| record.style.clone()),
                    source: encoding,
                };
            }
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(
                    page = %record.name,
                    encoding = encoding.as_str(),
                    error = %err,
                    "Skipping undecodable page representation"
                );
            }
        }
    }

    DecodedPage {
        markup: record.markup.clone(),
        style: record.style.clone(),
        source: Encoding::Plain,
    }
}

/// A page as captured from the editor, ready to be encoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorPage {
    pub name: String,
    pub markup: String,
    pub style: String,
    /// Whole-project capture, when the caller took one.
    pub full_snapshot: Option<Value>,
    pub page_snapshot: Option<PageSnapshot>,
}

impl EditorPage {
    pub fn new(name: impl Into<String>, markup: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markup: markup.into(),
            style: style.into(),
            ..Self::default()
        }
    }
}

/// Record fields produced by [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    pub name: String,
    pub markup: String,
    pub style: String,
    pub full_snapshot: Option<String>,
    pub page_snapshot: Option<String>,
}

impl PageFields {
    /// Turn the fields into a store write. With `clear_missing`, snapshots
    /// the caller did not supply are cleared instead of kept.
    pub fn into_write(self, clear_missing: bool) -> PageWrite {
        let snapshot = |value: Option<String>| match value {
            None if clear_missing => FieldUpdate::Clear,
            other => FieldUpdate::from_option(other),
        };
        PageWrite {
            name: self.name,
            markup: self.markup,
            style: self.style,
            full_snapshot: snapshot(self.full_snapshot),
            page_snapshot: snapshot(self.page_snapshot),
        }
    }
}

/// Encode an editor page. The plain fields are always produced; snapshots
/// only when supplied.
pub fn encode(page: &EditorPage) -> Result<PageFields, CodecError> {
    let full_snapshot = page
        .full_snapshot
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let page_snapshot = page
        .page_snapshot
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    Ok(PageFields {
        name: page.name.clone(),
        markup: page.markup.clone(),
        style: page.style.clone(),
        full_snapshot,
        page_snapshot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn record_from(fields: PageFields) -> PageRecord {
        fields
            .into_write(false)
            .into_record("p1".into(), "u1", Utc::now())
    }

    #[test]
    fn round_trip_plain_fields() {
        for (markup, style) in [
            ("<div>Hi</div>", "div{color:red}"),
            ("", ""),
            ("  <p>spaced</p>\n", "@media print{p{display:none}}"),
        ] {
            let fields = encode(&EditorPage::new("Home", markup, style)).unwrap();
            let decoded = decode(&record_from(fields));
            assert_eq!(decoded.markup, markup);
            assert_eq!(decoded.style, style);
        }
    }

    #[test]
    fn round_trip_with_snapshots() {
        let project = json!({ "pages": [{ "id": "p1", "name": "Home", "component": "<div>Hi</div>" }] });
        let page = EditorPage {
            full_snapshot: Some(project.clone()),
            page_snapshot: Some(PageSnapshot::from_project(
                &project,
                "p1",
                "Home",
                "<div>Hi</div>",
                "div{}",
            )),
            ..EditorPage::new("Home", "<div>Hi</div>", "div{}")
        };
        let decoded = decode(&record_from(encode(&page).unwrap()));
        assert_eq!(decoded.markup, "<div>Hi</div>");
        assert_eq!(decoded.style, "div{}");
        assert_eq!(decoded.source, Encoding::PageSnapshot);
    }

    #[test]
    fn page_snapshot_wins_over_inconsistent_representations() {
        let mut record = record_from(encode(&EditorPage::new("Home", "<p>plain</p>", "p{}")).unwrap());
        record.full_snapshot = Some(
            json!({ "pages": [{ "name": "Home", "component": "<p>full</p>", "styles": "full{}" }] })
                .to_string(),
        );
        record.page_snapshot =
            Some(json!({ "component": "<p>page</p>", "styles": "page{}" }).to_string());

        let decoded = decode(&record);
        assert_eq!(decoded.markup, "<p>page</p>");
        assert_eq!(decoded.style, "page{}");
        assert_eq!(decoded.source, Encoding::PageSnapshot);
    }

    #[test]
    fn full_snapshot_used_when_page_snapshot_is_blank() {
        let mut record = record_from(encode(&EditorPage::new("Home", "<p>plain</p>", "p{}")).unwrap());
        record.page_snapshot = Some(json!({ "component": "" }).to_string());
        record.full_snapshot =
            Some(json!({ "pages": [{ "name": "Home", "component": "<p>full</p>" }] }).to_string());

        let decoded = decode(&record);
        assert_eq!(decoded.markup, "<p>full</p>");
        assert_eq!(decoded.style, "p{}");
        assert_eq!(decoded.source, Encoding::FullSnapshot);
    }

    #[test]
    fn whitespace_markup_counts_as_content() {
        let mut record = record_from(encode(&EditorPage::new("Home", "<p>plain</p>", "p{}")).unwrap());
        record.page_snapshot = Some(json!({ "component": "  \n" }).to_string());

        let decoded = decode(&record);
        assert_eq!(decoded.markup, "  \n");
        assert_eq!(decoded.source, Encoding::PageSnapshot);
    }

    #[test]
    fn corrupt_snapshots_fall_back_to_plain_fields() {
        let mut record = record_from(encode(&EditorPage::new("Home", "<p>plain</p>", "p{}")).unwrap());
        record.page_snapshot = Some("{not json".into());
        record.full_snapshot = Some("[[[".into());

        let decoded = decode(&record);
        assert_eq!(decoded.markup, "<p>plain</p>");
        assert_eq!(decoded.style, "p{}");
        assert_eq!(decoded.source, Encoding::Plain);
    }

    #[test]
    fn encode_omits_snapshots_not_supplied() {
        let fields = encode(&EditorPage::new("Home", "<p>a</p>", "")).unwrap();
        assert_eq!(fields.full_snapshot, None);
        assert_eq!(fields.page_snapshot, None);

        let write = fields.clone().into_write(false);
        assert_eq!(write.full_snapshot, FieldUpdate::Keep);
        let write = fields.into_write(true);
        assert_eq!(write.page_snapshot, FieldUpdate::Clear);
    }
}
