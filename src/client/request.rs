//! Request parameters and body encoding.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{Error, Result};

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

/// Ordered key/value pairs, used for both query strings and form bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Params(Vec<(String, String)>);

impl Params {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub(crate) fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Push only when `value` is non-empty.
    pub(crate) fn push_non_empty(&mut self, key: impl Into<String>, value: &str) {
        if !value.is_empty() {
            self.push(key, value);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` serialization.
    pub(crate) fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// The three body shapes the API accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RequestBody {
    /// No body and no content type.
    Empty,
    /// Form-encoded key/value pairs.
    Form(Params),
    /// A pre-serialized JSON document.
    Json(Vec<u8>),
}

impl RequestBody {
    pub(crate) fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_vec(value)
            .map(RequestBody::Json)
            .map_err(Error::Encode)
    }

    pub(crate) fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Form(_) => Some(FORM_CONTENT_TYPE),
            RequestBody::Json(_) => Some(JSON_CONTENT_TYPE),
        }
    }

    pub(crate) fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Form(params) => Some(params.encode().into_bytes()),
            RequestBody::Json(bytes) => Some(bytes),
        }
    }
}

/// Destination for endpoints that answer `{}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_encoding_escapes_brackets_and_spaces() {
        let params = Params::new()
            .with("metadata[notes]", "lunch with team")
            .with("amount", "1000");
        assert_eq!(
            params.encode(),
            "metadata%5Bnotes%5D=lunch+with+team&amount=1000"
        );
    }

    #[test]
    fn test_push_non_empty_skips_empty_values() {
        let mut params = Params::new();
        params.push_non_empty("since", "");
        assert!(params.is_empty());
        params.push_non_empty("before", "2025-01-01T00:00:00Z");
        assert_eq!(params.iter().count(), 1);
    }

    #[test]
    fn test_body_content_types() {
        assert_eq!(RequestBody::Empty.content_type(), None);
        assert_eq!(
            RequestBody::Form(Params::new()).content_type(),
            Some("application/x-www-form-urlencoded")
        );
        let json = RequestBody::json(&serde_json::json!({"total": 5})).unwrap();
        assert_eq!(json.content_type(), Some("application/json"));
        assert_eq!(json.into_bytes().unwrap(), br#"{"total":5}"#.to_vec());
        assert!(RequestBody::Empty.into_bytes().is_none());
    }

    #[test]
    fn test_empty_accepts_empty_object() {
        assert!(serde_json::from_str::<Empty>("{}").is_ok());
        assert!(serde_json::from_str::<Empty>(r#"{"ignored": true}"#).is_ok());
        assert!(serde_json::from_str::<Empty>("").is_err());
    }
}
