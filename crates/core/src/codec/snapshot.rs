//! Structured snapshot formats written alongside the plain page fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::component::render_components;
use super::css::render_style;

/// Markup and style pulled out of a snapshot. `style` is `None` when the
/// snapshot carries no style at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub markup: String,
    pub style: Option<String>,
}

fn markup_from(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(markup) => Some(markup.clone()),
        tree @ (Value::Array(_) | Value::Object(_)) => Some(render_components(tree)),
        _ => None,
    }
}

fn non_empty(markup: Option<String>) -> Option<String> {
    markup.filter(|m| !m.is_empty())
}

/// One page in the editor's native structured form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Rendered markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Value>,
    /// Component tree, with the editor's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

impl PageSnapshot {
    /// Build the snapshot of one page from a whole-project capture.
    ///
    /// The live markup and style are stored verbatim; the project's component
    /// tree for the page, when present, is kept for its metadata.
    pub fn from_project(
        project: &Value,
        page_id: &str,
        name: &str,
        markup: &str,
        style: &str,
    ) -> Self {
        let tree = serde_json::from_value::<ProjectSnapshot>(project.clone())
            .ok()
            .and_then(|p| {
                p.pages
                    .into_iter()
                    .find(|entry| entry.matches(page_id, name))
                    .and_then(ProjectPage::into_tree)
            });

        Self {
            id: Some(page_id.to_string()),
            name: Some(name.to_string()),
            component: Some(Value::String(markup.to_string())),
            components: tree,
            styles: Some(Value::String(style.to_string())),
            style: None,
        }
    }

    pub fn extract(&self) -> Extracted {
        let markup = non_empty(markup_from(self.component.as_ref()))
            .or_else(|| markup_from(self.components.as_ref()))
            .unwrap_or_default();
        let style = self
            .styles
            .as_ref()
            .and_then(render_style)
            .or_else(|| self.style.as_ref().and_then(render_style));
        Extracted { markup, style }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub component: Option<Value>,
}

/// One entry of `pages` in a whole-project capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub html: Option<Value>,
    #[serde(default)]
    pub component: Option<Value>,
    #[serde(default)]
    pub components: Option<Value>,
    #[serde(default)]
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub styles: Option<Value>,
    #[serde(default)]
    pub style: Option<Value>,
}

impl ProjectPage {
    fn matches(&self, page_id: &str, name: &str) -> bool {
        self.name.as_deref() == Some(name) || self.id.as_deref() == Some(page_id)
    }

    fn frame_component(&self) -> Option<&Value> {
        self.frames.first().and_then(|f| f.component.as_ref())
    }

    fn into_tree(self) -> Option<Value> {
        self.components
            .or_else(|| self.frames.into_iter().next().and_then(|f| f.component))
    }

    fn extract(&self) -> Extracted {
        let markup = [
            self.html.as_ref(),
            self.component.as_ref(),
            self.components.as_ref(),
            self.frame_component(),
        ]
        .into_iter()
        .find_map(|candidate| non_empty(markup_from(candidate)))
        .unwrap_or_default();

        let style = self
            .styles
            .as_ref()
            .and_then(render_style)
            .or_else(|| self.style.as_ref().and_then(render_style));
        Extracted { markup, style }
    }
}

/// Capture of the whole multi-page editor state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub pages: Vec<ProjectPage>,
    #[serde(default)]
    pub styles: Option<Value>,
    #[serde(default)]
    pub style: Option<Value>,
}

impl ProjectSnapshot {
    /// Extract one page: the entry matching `name` (or `page_id`), else the
    /// first entry. Project-level styles fill in when the entry has none.
    pub fn extract(&self, page_id: &str, name: &str) -> Option<Extracted> {
        let entry = self
            .pages
            .iter()
            .find(|entry| entry.matches(page_id, name))
            .or_else(|| self.pages.first())?;

        let mut extracted = entry.extract();
        if extracted.style.is_none() {
            extracted.style = self
                .styles
                .as_ref()
                .and_then(render_style)
                .or_else(|| self.style.as_ref().and_then(render_style));
        }
        Some(extracted)
    }
}
