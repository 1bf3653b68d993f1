use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::diff::EditDiff;
use crate::errors::{FeatureError, FeatureResult};

/// Deserialize `null` as the type's default.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One edit, the unit of feature extraction.
///
/// Only `old_text` and `new_text` are required. A missing `diff` means the
/// inserted and deleted material is derived from the two texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub old_text: String,
    pub new_text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub comment: String,
    #[serde(default, deserialize_with = "nullable")]
    pub anonymous: bool,
    #[serde(default)]
    pub diff: Option<EditDiff>,
    #[serde(default, deserialize_with = "nullable")]
    pub edit_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub user_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_bot: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub is_minor: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

impl Edit {
    pub fn new(old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            old_text: old_text.into(),
            new_text: new_text.into(),
            ..Self::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }

    pub fn with_diff(mut self, diff: EditDiff) -> Self {
        self.diff = Some(diff);
        self
    }

    pub fn with_edit_id(mut self, edit_id: impl Into<String>) -> Self {
        self.edit_id = edit_id.into();
        self
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = user_name.into();
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_bot(mut self, is_bot: bool) -> Self {
        self.is_bot = is_bot;
        self
    }

    pub fn with_minor(mut self, is_minor: bool) -> Self {
        self.is_minor = is_minor;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and convert one loosely-typed record.
    ///
    /// Only a missing, null, or non-text `old_text`/`new_text` rejects the
    /// record. Numeric identifiers are read as text; any other unusable
    /// optional value is logged and replaced by its default.
    pub fn from_json(record: &Value) -> FeatureResult<Self> {
        let Some(fields) = record.as_object() else {
            return Err(FeatureError::WrongType {
                field: "edit",
                expected: "an object",
            });
        };
        Ok(Self {
            old_text: required_text(fields, "old_text")?,
            new_text: required_text(fields, "new_text")?,
            comment: lenient_text(fields, "comment"),
            anonymous: lenient_flag(fields, "anonymous"),
            diff: lenient_diff(fields),
            edit_id: lenient_text(fields, "edit_id"),
            user_name: lenient_text(fields, "user_name"),
            user_id: lenient_text(fields, "user_id"),
            timestamp: lenient_text(fields, "timestamp"),
            is_bot: lenient_flag(fields, "is_bot"),
            is_minor: lenient_flag(fields, "is_minor"),
            tags: lenient_tags(fields),
        })
    }

    /// Parse and validate one JSON document.
    pub fn from_json_str(text: &str) -> FeatureResult<Self> {
        let record: Value = serde_json::from_str(text)?;
        Self::from_json(&record)
    }
}

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

fn required_text(fields: &Map<String, Value>, field: &'static str) -> FeatureResult<String> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(FeatureError::MissingField { field }),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(FeatureError::WrongType {
            field,
            expected: "text",
        }),
    }
}

fn lenient_text(fields: &Map<String, Value>, field: &str) -> String {
    match fields.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            log::warn!("ignoring `{field}`: expected text, got {other}");
            String::new()
        }
    }
}

fn lenient_flag(fields: &Map<String, Value>, field: &str) -> bool {
    match fields.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") || s == "1" => true,
        Some(Value::String(s)) if s.is_empty() || s.eq_ignore_ascii_case("false") || s == "0" => {
            false
        }
        Some(other) => {
            log::warn!("ignoring `{field}`: expected a flag, got {other}");
            false
        }
    }
}

fn lenient_tags(fields: &Map<String, Value>) -> Vec<String> {
    match fields.get("tags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(tag)) if tag.is_empty() => Vec::new(),
        Some(Value::String(tag)) => vec![tag.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag.clone()),
                Value::Number(n) => Some(n.to_string()),
                other => {
                    log::warn!("ignoring tag {other}: expected text");
                    None
                }
            })
            .collect(),
        Some(other) => {
            log::warn!("ignoring `tags`: expected a list, got {other}");
            Vec::new()
        }
    }
}

/// An unusable supplied diff falls back to deriving one from the texts.
fn lenient_diff(fields: &Map<String, Value>) -> Option<EditDiff> {
    let value = fields.get("diff").filter(|v| !v.is_null())?;
    EditDiff::deserialize(value)
        .inspect_err(|err| log::warn!("ignoring supplied diff: {err}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn optional_fields_default() {
        let edit = Edit::from_json(&json!({"old_text": "", "new_text": "hi"})).unwrap();
        assert_eq!(edit, Edit::new("", "hi"));
    }

    #[test]
    fn nulls_are_absent() {
        let edit = Edit::from_json(&json!({
            "old_text": "a",
            "new_text": "b",
            "comment": null,
            "tags": null,
            "diff": {"inserted_words": ["x"], "deleted_lines": null},
        }))
        .unwrap();
        assert_eq!(edit.comment, "");
        assert!(edit.tags.is_empty());
        let diff = edit.diff.unwrap();
        assert_eq!(diff.inserted_words, vec!["x"]);
        assert!(diff.deleted_lines.is_empty());
    }

    #[test]
    fn missing_new_text_is_rejected() {
        let err = Edit::from_json(&json!({"old_text": "a"})).unwrap_err();
        assert!(matches!(err, FeatureError::MissingField { field: "new_text" }));
        assert!(err.is_validation());

        let err = Edit::from_json(&json!({"old_text": "a", "new_text": null})).unwrap_err();
        assert!(matches!(err, FeatureError::MissingField { field: "new_text" }));
    }

    #[test]
    fn non_text_is_rejected() {
        let err = Edit::from_json(&json!({"old_text": 3, "new_text": "b"})).unwrap_err();
        assert!(matches!(err, FeatureError::WrongType { field: "old_text", .. }));
        let err = Edit::from_json(&json!(["old_text", "new_text"])).unwrap_err();
        assert!(matches!(err, FeatureError::WrongType { field: "edit", .. }));
    }

    #[test]
    fn numeric_metadata_is_read_as_text_and_flags() {
        let edit = Edit::from_json(&json!({
            "old_text": "",
            "new_text": "hello",
            "edit_id": 42,
            "user_id": 1007,
            "anonymous": 1,
            "is_bot": 0,
        }))
        .unwrap();
        assert_eq!(edit.edit_id, "42");
        assert_eq!(edit.user_id, "1007");
        assert!(edit.anonymous);
        assert!(!edit.is_bot);
    }

    #[test]
    fn unusable_optional_values_fall_back_to_defaults() {
        let edit = Edit::from_json(&json!({
            "old_text": "",
            "new_text": "x",
            "anonymous": "yes",
            "comment": {"text": "nested"},
            "tags": ["ok", 5, false],
            "diff": {"inserted_words": 3},
        }))
        .unwrap();
        assert!(!edit.anonymous);
        assert_eq!(edit.comment, "");
        assert_eq!(edit.tags, vec!["ok", "5"]);
        assert_eq!(edit.diff, None);
    }

    #[test]
    fn unparseable_document_is_not_a_validation_error() {
        let err = Edit::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, FeatureError::Malformed(_)));
        assert!(!err.is_validation());
    }

    #[test]
    fn parses_json_text() {
        let edit = Edit::from_json_str(
            r#"{"old_text":"x","new_text":"y","anonymous":true,"edit_id":"42"}"#,
        )
        .unwrap();
        assert!(edit.anonymous);
        assert_eq!(edit.edit_id, "42");
    }
}
