use crate::domain::content::ContentDocument;
use serde_json::Value;

const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseFormat {
    Markdown,
    Json,
}

impl ResponseFormat {
    /// JSON only when the `Accept` header names it; anything else, including
    /// no header at all, means raw markdown.
    pub fn from_accept(accept: Option<&str>) -> Self {
        match accept {
            Some(value) if value.to_ascii_lowercase().contains(JSON_MEDIA_TYPE) => Self::Json,
            _ => Self::Markdown,
        }
    }
}

/// A single unit as it leaves the service.
#[derive(Clone, Debug, PartialEq)]
pub enum DocumentBody {
    Markdown(String),
    Json(Value),
}

impl DocumentBody {
    pub fn select(format: ResponseFormat, document: ContentDocument) -> Self {
        match format {
            ResponseFormat::Markdown => Self::Markdown(document.content),
            ResponseFormat::Json => {
                Self::Json(serde_json::to_value(&document).unwrap_or(Value::Null))
            }
        }
    }
}
