//! Rendering of the editor's structured component tree to markup.
//!
//! Nodes look like `{ "type", "tagName", "attributes", "classes",
//! "components", "content" }`. Strings inside a component list are taken
//! as raw markup.

use serde_json::{Map, Value};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Render a component node, or a list of nodes, to markup.
pub fn render_components(value: &Value) -> String {
    let mut out = String::new();
    render_node(value, &mut out);
    out
}

fn render_node(node: &Value, out: &mut String) {
    match node {
        Value::String(raw) => out.push_str(raw),
        Value::Array(items) => items.iter().for_each(|item| render_node(item, out)),
        Value::Object(map) => render_element(map, out),
        _ => {}
    }
}

fn render_element(map: &Map<String, Value>, out: &mut String) {
    let kind = map.get("type").and_then(Value::as_str);
    match kind {
        Some("textnode") => {
            if let Some(content) = map.get("content").and_then(Value::as_str) {
                out.push_str(&escape_text(content));
            }
            return;
        }
        Some("wrapper") => {
            if let Some(children) = map.get("components") {
                render_node(children, out);
            }
            return;
        }
        _ => {}
    }

    let tag = map
        .get("tagName")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or("div");

    out.push('<');
    out.push_str(tag);

    let classes = class_list(map.get("classes"));
    let attributes = map.get("attributes").and_then(Value::as_object);
    let mut wrote_class = false;

    if let Some(attributes) = attributes {
        for (key, value) in attributes {
            if key == "class" {
                let mut merged = value.as_str().unwrap_or_default().to_string();
                for class in &classes {
                    if !merged.is_empty() {
                        merged.push(' ');
                    }
                    merged.push_str(class);
                }
                push_attribute(out, key, &Value::String(merged));
                wrote_class = true;
            } else {
                push_attribute(out, key, value);
            }
        }
    }
    if !wrote_class && !classes.is_empty() {
        push_attribute(out, "class", &Value::String(classes.join(" ")));
    }

    out.push('>');
    if VOID_ELEMENTS.contains(&tag) {
        return;
    }

    if let Some(content) = map.get("content").and_then(Value::as_str) {
        out.push_str(content);
    }
    if let Some(children) = map.get("components") {
        render_node(children, out);
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn class_list(classes: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = classes else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(name.clone()),
            Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}

fn push_attribute(out: &mut String, key: &str, value: &Value) {
    let text = match value {
        Value::Bool(true) => {
            out.push(' ');
            out.push_str(key);
            return;
        }
        Value::Bool(false) | Value::Null => return,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape_attr(&text));
    out.push('"');
}

pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
