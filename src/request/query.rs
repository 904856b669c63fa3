// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde_json::Value;
#[cfg(test)]
use url::form_urlencoded;

/// Renders a parameter value the way it appears on the wire. `None` means the
/// parameter is left out entirely.
fn render(value: &Value) -> Option<String> {
    match *value {
        Value::Null => None,
        Value::String(ref s) if s.is_empty() => None,
        Value::String(ref s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(ref n) => Some(n.to_string()),
        Value::Array(ref items) => Some(
            items
                .iter()
                .map(|item| render(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Keeps the parameters that go on the wire, in order, with their rendered
/// values. Null and empty-string values are dropped.
pub(crate) fn pairs<K: AsRef<str>>(params: &[(K, Value)]) -> Vec<(&str, String)> {
    params
        .iter()
        .filter_map(|(key, value)| render(value).map(|rendered| (key.as_ref(), rendered)))
        .collect()
}

/// Encodes query parameters as a form-encoded string. Returns an empty string
/// when nothing is left.
#[cfg(test)]
pub(crate) fn encode<K: AsRef<str>>(params: &[(K, Value)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs(params))
        .finish()
}
