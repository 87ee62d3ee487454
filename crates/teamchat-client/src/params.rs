//! Request parameter codec.
//!
//! Every API operation passes its arguments through a flat query-string
//! interface. [`encode`] turns a JSON argument mapping into a [`Params`] set
//! with deterministic coercion rules:
//!
//! | Argument value | Rendering |
//! |----------------|-----------|
//! | `null` | omitted entirely |
//! | string (incl. symbolic tags such as [`ParseMode`]) | bare contents |
//! | object / array | canonical JSON text (keyboard markup passthrough) |
//! | number / bool | default string conversion |
//!
//! No escaping happens here; percent-encoding is the transport's job.
//! The codec is pure and idempotent: re-encoding an encoded set changes
//! nothing.
//!
//! [`ParseMode`]: teamchat_core::ParseMode

use serde::Serialize;
use serde_json::{Map, Value};

/// An ordered set of string request parameters, produced fresh per call.
///
/// Never contains a null-valued entry; absent arguments are dropped at
/// encoding time, not rendered as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Appends a parameter (builder form).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the parameters as key/value pairs.
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a (String, String);
    type IntoIter = std::slice::Iter<'a, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Encodes one argument value, or `None` for an absent (`null`) argument.
pub fn encode_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        // Bare contents, not the JSON-quoted form.
        Value::String(s) => Some(s.clone()),
        // Composite fields travel as canonical JSON text.
        Value::Object(_) | Value::Array(_) => Some(value.to_string()),
        other => Some(other.to_string()),
    }
}

/// Encodes an argument mapping into a [`Params`] set.
pub fn encode(args: &Map<String, Value>) -> Params {
    let mut params = Params::new();
    for (key, value) in args {
        if let Some(rendered) = encode_value(value) {
            params.push(key.clone(), rendered);
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use teamchat_core::ParseMode;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn null_arguments_are_dropped() {
        let args = object(json!({
            "chatId": "c1",
            "replyMsgId": null,
            "text": "hi"
        }));
        let params = encode(&args);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("chatId"), Some("c1"));
        assert_eq!(params.get("text"), Some("hi"));
        assert!(!params.contains("replyMsgId"));
    }

    #[test]
    fn strings_are_rendered_bare() {
        assert_eq!(encode_value(&json!("hello")), Some("hello".to_string()));
        // Not the JSON-quoted form.
        assert_ne!(encode_value(&json!("hello")), Some("\"hello\"".to_string()));
    }

    #[test]
    fn symbolic_tags_render_as_bare_names() {
        let tag = serde_json::to_value(ParseMode::MarkdownV2).unwrap();
        assert_eq!(encode_value(&tag), Some("MarkdownV2".to_string()));
    }

    #[test]
    fn nested_mappings_render_as_canonical_json() {
        let markup = json!([[{ "text": "Yes", "callbackData": "yes" }]]);
        let rendered = encode_value(&markup).unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&rendered).unwrap(),
            markup,
            "rendered text must round-trip to the same JSON"
        );

        let args = object(json!({ "inlineKeyboardMarkup": markup }));
        let params = encode(&args);
        assert!(params.get("inlineKeyboardMarkup").unwrap().starts_with("[["));
    }

    #[test]
    fn scalars_use_default_string_conversion() {
        assert_eq!(encode_value(&json!(30)), Some("30".to_string()));
        assert_eq!(encode_value(&json!(true)), Some("true".to_string()));
        assert_eq!(encode_value(&json!(1.5)), Some("1.5".to_string()));
    }

    #[test]
    fn encoding_is_idempotent() {
        let args = object(json!({
            "a": "plain",
            "b": 7,
            "c": { "k": [1, 2] },
            "d": null
        }));
        let first = encode(&args);

        // Re-encode the already-encoded set: every value is now a string, so
        // nothing may change.
        let mut as_args = Map::new();
        for (k, v) in &first {
            as_args.insert(k.clone(), Value::String(v.clone()));
        }
        let second = encode(&as_args);

        for (k, v) in &first {
            assert_eq!(second.get(k), Some(v.as_str()));
        }
        assert_eq!(first.len(), second.len());
    }
}
