//! Request bodies
//!
//! An [`ActionBody`] is what a payload construct hands to the request
//! builder: either a JSON value or a fully buffered multipart form.

use serde::Serialize;
use serde_json::Value;

use crate::Result;

/// Content type of the JSON part inside multipart bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of file parts
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Serialized body of one domain action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionBody {
    /// JSON body; mutating verbs require an object
    Json(Value),
    /// Multipart body with files already read into memory
    Multipart(MultipartForm),
}

impl ActionBody {
    /// Serialize any value as a JSON body
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// JSON value, when this is a JSON body
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Multipart(_) => None,
        }
    }

    /// Multipart form, when this is a multipart body
    pub fn as_multipart(&self) -> Option<&MultipartForm> {
        match self {
            Self::Json(_) => None,
            Self::Multipart(form) => Some(form),
        }
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

impl From<Value> for ActionBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<MultipartForm> for ActionBody {
    fn from(form: MultipartForm) -> Self {
        Self::Multipart(form)
    }
}

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Multipart form in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file field
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: OCTET_STREAM.to_string(),
            data,
        });
        self
    }

    /// Append a JSON text field
    pub fn json_text(mut self, name: impl Into<String>, json: String) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            filename: None,
            content_type: JSON_CONTENT_TYPE.to_string(),
            data: json.into_bytes(),
        });
        self
    }

    /// Field with the given name
    pub fn part(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<FormPart> {
        self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_keeps_field_order() {
        let form = MultipartForm::new()
            .file("files[0]", "a.txt", b"a".to_vec())
            .json_text("payload_json", "{}".to_string());

        let names: Vec<&str> = form.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["files[0]", "payload_json"]);
        assert_eq!(form.part("files[0]").unwrap().content_type, OCTET_STREAM);
        assert_eq!(
            form.part("payload_json").unwrap().content_type,
            JSON_CONTENT_TYPE
        );
    }

    #[test]
    fn test_action_body_accessors() {
        let body = ActionBody::from(json!({"content": "hi"}));
        assert!(!body.is_multipart());
        assert_eq!(body.as_json().unwrap()["content"], "hi");
        assert!(body.as_multipart().is_none());
    }
}
