/// Errors from feature extraction.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// The input is not a JSON document at all.
    #[error("malformed edit document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid reference distribution: {0}")]
    InvalidReference(String),
}

impl FeatureError {
    /// Whether this error rejects the edit record itself.
    ///
    /// Only a missing or non-text `old_text`/`new_text` does; batch drivers
    /// skip such a record and keep going.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FeatureError::MissingField { .. } | FeatureError::WrongType { .. }
        )
    }
}

pub type FeatureResult<T> = core::result::Result<T, FeatureError>;
