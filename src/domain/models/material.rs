//! Learning material and resource link models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Kind of an uploaded file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Text,
    Pdf,
    Other,
}

impl MaterialKind {
    pub fn from_filename(filename: &str) -> Self {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match ext.as_deref() {
            Some("txt" | "md" | "markdown" | "text") => MaterialKind::Text,
            Some("pdf") => MaterialKind::Pdf,
            _ => MaterialKind::Other,
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialKind::Text => write!(f, "text"),
            MaterialKind::Pdf => write!(f, "pdf"),
            MaterialKind::Other => write!(f, "other"),
        }
    }
}

/// A general learning file uploaded to the resource center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub filename: String,
    pub kind: MaterialKind,
    pub size_bytes: u64,
    pub sha256: String,
    pub stored_at: String,
    pub uploaded_at: DateTime<Utc>,
}

/// An external link shown in the resource center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
}

impl ResourceLink {
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
        }
    }
}

/// Links listed when the configuration does not provide any.
pub fn default_resource_links() -> Vec<ResourceLink> {
    vec![
        ResourceLink::new(
            "Machine Learning Documentation",
            "https://scikit-learn.org/stable/documentation.html",
        ),
        ResourceLink::new("Deep Learning Resources", "https://pytorch.org/tutorials/"),
        ResourceLink::new("Python Official Docs", "https://www.python.org/doc/"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(MaterialKind::from_filename("notes.TXT"), MaterialKind::Text);
        assert_eq!(MaterialKind::from_filename("slides.pdf"), MaterialKind::Pdf);
        assert_eq!(MaterialKind::from_filename("image.png"), MaterialKind::Other);
        assert_eq!(MaterialKind::from_filename("README"), MaterialKind::Other);
    }
}
