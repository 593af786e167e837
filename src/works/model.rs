//! Work item model and form payloads.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Portfolio categories accepted by the backend
pub const CATEGORIES: [&str; 8] = [
    "Branding",
    "SEO",
    "Website Development",
    "Performance Marketing",
    "Social Media Marketing",
    "Creative",
    "Production",
    "Digital PR",
];

/// One portfolio work item as served by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub image_url: String,
}

/// Create/update payload; `image` is read from disk and attached as a
/// multipart file part when present
#[derive(Debug, Clone, Default)]
pub struct WorkForm {
    pub title: String,
    pub category: String,
    pub description: String,
    pub link: String,
    pub featured: bool,
    pub image: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_deserializes_backend_shape() {
        let json = r#"{
            "_id": "66f0a1",
            "title": "Neon rebrand",
            "category": "Branding",
            "description": "Full identity refresh",
            "link": "https://example.com",
            "featured": true,
            "imageUrl": "/uploads/neon.png"
        }"#;
        let work: Work = serde_json::from_str(json).unwrap();
        assert_eq!(work.id, "66f0a1");
        assert!(work.featured);
        assert_eq!(work.image_url, "/uploads/neon.png");
    }

    #[test]
    fn test_work_tolerates_missing_optionals() {
        let json = r#"{
            "_id": "66f0a2",
            "title": "Quiet launch",
            "category": "SEO",
            "description": "Search overhaul"
        }"#;
        let work: Work = serde_json::from_str(json).unwrap();
        assert!(!work.featured);
        assert!(work.link.is_empty());
    }
}
