//! Rendering of structured style rules to a CSS string.

use serde_json::{Map, Value};

/// Render a style value: strings pass through, rule lists are rendered.
pub fn render_style(value: &Value) -> Option<String> {
    match value {
        Value::String(css) => Some(css.clone()),
        Value::Array(rules) => Some(rules.iter().filter_map(render_rule).collect()),
        Value::Object(_) => render_rule(value),
        _ => None,
    }
}

fn render_rule(rule: &Value) -> Option<String> {
    let rule = rule.as_object()?;
    let selector = selector_text(rule)?;
    let body = declarations(rule.get("style")?.as_object()?);
    if body.is_empty() {
        return None;
    }

    let css = format!("{selector}{{{body}}}");
    match rule.get("mediaText").and_then(Value::as_str) {
        Some(media) if !media.trim().is_empty() => {
            let at_rule = rule
                .get("atRuleType")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .unwrap_or("media");
            Some(format!("@{at_rule} {media}{{{css}}}"))
        }
        _ => Some(css),
    }
}

fn selector_text(rule: &Map<String, Value>) -> Option<String> {
    let compound: String = rule
        .get("selectors")
        .and_then(Value::as_array)
        .map(|selectors| selectors.iter().filter_map(selector_part).collect())
        .unwrap_or_default();

    let added = rule
        .get("selectorsAdd")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    match (compound.is_empty(), added.is_empty()) {
        (true, true) => None,
        (false, true) => Some(compound),
        (true, false) => Some(added.to_string()),
        (false, false) => Some(format!("{compound}, {added}")),
    }
}

fn selector_part(selector: &Value) -> Option<String> {
    match selector {
        Value::String(s) if s.starts_with(['#', '.', ':', '[']) => Some(s.clone()),
        Value::String(s) if !s.is_empty() => Some(format!(".{s}")),
        Value::Object(obj) => {
            let name = obj.get("name").and_then(Value::as_str)?;
            // Selector type 2 is an id selector.
            let prefix = if obj.get("type").and_then(Value::as_u64) == Some(2) {
                '#'
            } else {
                '.'
            };
            Some(format!("{prefix}{name}"))
        }
        _ => None,
    }
}

fn declarations(style: &Map<String, Value>) -> String {
    style
        .iter()
        .filter_map(|(property, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some(format!("{property}:{value};"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_rule_list() {
        let rules = json!([
            { "selectors": ["hero", { "name": "main", "type": 2 }], "style": { "color": "red" } },
            { "selectorsAdd": "body", "style": { "margin": "0" } },
            { "selectors": ["hero"], "style": { "padding": "4px" }, "mediaText": "(max-width: 480px)" },
            { "selectors": ["empty"], "style": {} },
        ]);

        assert_eq!(
            render_style(&rules).unwrap(),
            ".hero#main{color:red;}body{margin:0;}@media (max-width: 480px){.hero{padding:4px;}}"
        );
    }

    #[test]
    fn strings_pass_through() {
        assert_eq!(
            render_style(&json!("p{color:blue}")).as_deref(),
            Some("p{color:blue}")
        );
        assert_eq!(render_style(&json!(3)), None);
    }
}
