//! Request DTOs for the bucket API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::bucket::{ListObjectsRequest, UpdateObjectRequest};

/// Request body for PATCH /objects/*name
///
/// Absent fields are left unchanged. A `null` metadata value removes the key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateObjectBody {
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Option<String>>,
}

impl UpdateObjectBody {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.metadata.keys().any(|k| k.is_empty()) {
            return Some("Metadata keys cannot be empty".to_string());
        }
        None
    }

    pub fn into_request(self, name: String) -> UpdateObjectRequest {
        UpdateObjectRequest {
            name,
            content_type: self.content_type,
            content_encoding: self.content_encoding,
            cache_control: self.cache_control,
            metadata: self.metadata,
        }
    }
}

/// Query string for GET /objects
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub prefix: String,
    pub delimiter: Option<String>,
    pub page_token: Option<String>,
    pub max_results: Option<usize>,
}

impl From<ListQuery> for ListObjectsRequest {
    fn from(q: ListQuery) -> Self {
        ListObjectsRequest {
            prefix: q.prefix,
            delimiter: q.delimiter,
            continuation_token: q.page_token,
            max_results: q.max_results,
        }
    }
}

/// Query string for GET /objects/*name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadQuery {
    pub generation: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_deserialize() {
        let json = r#"{"content_type": "text/plain", "metadata": {"a": "1", "b": null}}"#;
        let body: UpdateObjectBody = serde_json::from_str(json).unwrap();

        assert_eq!(body.content_type.as_deref(), Some("text/plain"));
        assert!(body.cache_control.is_none());
        assert_eq!(body.metadata.get("a"), Some(&Some("1".to_string())));
        assert_eq!(body.metadata.get("b"), Some(&None));
    }

    #[test]
    fn test_update_body_empty() {
        let body: UpdateObjectBody = serde_json::from_str("{}").unwrap();
        assert!(body.metadata.is_empty());
        assert!(body.validate().is_none());
    }

    #[test]
    fn test_validate_empty_metadata_key() {
        let mut body = UpdateObjectBody::default();
        body.metadata.insert(String::new(), Some("x".into()));
        assert!(body.validate().is_some());
    }

    #[test]
    fn test_into_request_keeps_name() {
        let body = UpdateObjectBody {
            cache_control: Some("no-cache".into()),
            ..Default::default()
        };
        let req = body.into_request("dir/a".into());
        assert_eq!(req.name, "dir/a");
        assert_eq!(req.cache_control.as_deref(), Some("no-cache"));
    }

    #[test]
    fn test_list_query_into_request() {
        let q = ListQuery {
            prefix: "p/".into(),
            delimiter: Some("/".into()),
            page_token: Some("p/x".into()),
            max_results: Some(5),
        };
        let req = ListObjectsRequest::from(q);
        assert_eq!(req.prefix, "p/");
        assert_eq!(req.continuation_token.as_deref(), Some("p/x"));
        assert_eq!(req.max_results, Some(5));
    }
}
