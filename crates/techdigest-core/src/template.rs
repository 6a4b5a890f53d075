//! `{name}` placeholder substitution for query and prompt templates.

use std::collections::BTreeMap;

use serde_yaml::Value;

/// Substitute `{name}` placeholders in `template` from `bindings`.
///
/// Unknown names and anything that is not a plain identifier are left in the
/// output literally, braces included. `{{` and `}}` produce single braces.
/// An unmatched `{` is copied through unchanged.
#[must_use]
pub fn resolve(template: &str, bindings: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("{{") {
            out.push('{');
            rest = after;
            continue;
        }
        if let Some(after) = tail.strip_prefix("}}") {
            out.push('}');
            rest = after;
            continue;
        }
        if let Some(after) = tail.strip_prefix('}') {
            out.push('}');
            rest = after;
            continue;
        }

        // `tail` starts with a single `{`.
        let inner = &tail[1..];
        match inner.find(['{', '}']) {
            Some(end) if inner.as_bytes()[end] == b'}' => {
                let name = &inner[..end];
                let literal = &tail[..end + 2];
                match bindings.get(name) {
                    Some(value) if is_identifier(name) => out.push_str(value),
                    _ => out.push_str(literal),
                }
                rest = &tail[end + 2..];
            }
            _ => {
                out.push('{');
                rest = inner;
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Flatten the YAML `context` mapping into string bindings.
///
/// Sequences are joined with `", "`; scalars use their plain text form.
#[must_use]
pub fn bindings_from_context(context: &BTreeMap<String, Value>) -> BTreeMap<String, String> {
    context
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::Sequence(items) => items
                    .iter()
                    .map(scalar_text)
                    .collect::<Vec<_>>()
                    .join(", "),
                other => scalar_text(other),
            };
            (key.clone(), text)
        })
        .collect()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
