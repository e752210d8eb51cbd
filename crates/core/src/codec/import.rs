//! Import of complete HTML documents into a markup/style pair.

use std::sync::OnceLock;

use regex::Regex;

fn style_blocks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style>").expect("valid regex"))
}

fn body_content() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<body[^>]*>(.*?)</body>").expect("valid regex"))
}

fn document_scaffolding() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            r"(?i)<!DOCTYPE[^>]*>",
            r"(?i)</?html[^>]*>",
            r"(?is)<head(\s[^>]*)?>.*?</head>",
            r"(?i)</?body[^>]*>",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid regex"))
        .collect()
    })
}

/// Split a full HTML document into body markup and the contents of its
/// `<style>` blocks.
pub fn split_document(document: &str) -> (String, String) {
    let css: Vec<&str> = style_blocks()
        .captures_iter(document)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim()))
        .filter(|css| !css.is_empty())
        .collect();

    let without_styles = style_blocks().replace_all(document, "");

    let body = body_content()
        .captures(&without_styles)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let markup = match body {
        Some(body) => body,
        None => document_scaffolding()
            .iter()
            .fold(without_styles.into_owned(), |html, re| {
                re.replace_all(&html, "").into_owned()
            }),
    };

    (markup.trim().to_string(), css.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_body_and_styles() {
        let doc = r#"<!DOCTYPE html>
<html><head><title>x</title><style>h1{color:red}</style></head>
<body class="b"><h1>Hi</h1><style type="text/css">
p{margin:0}
</style></body></html>"#;

        let (markup, style) = split_document(doc);
        assert_eq!(markup, "<h1>Hi</h1>");
        assert_eq!(style, "h1{color:red}\np{margin:0}");
    }

    #[test]
    fn fragments_without_body_are_unwrapped() {
        let (markup, style) = split_document("<html><head><meta charset=utf-8></head><div>a</div></html>");
        assert_eq!(markup, "<div>a</div>");
        assert_eq!(style, "");
    }
}
