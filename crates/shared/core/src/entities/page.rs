use serde::{Deserialize, Serialize};

/// Inferred page context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Article,
    Homepage,
    Section,
    Search,
    Video,
    /// Explicit page type supplied by the publisher that we don't model
    Other(String),
}

impl PageType {
    /// Parse an explicit publisher-supplied page type
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "article" | "news" | "post" => PageType::Article,
            "homepage" | "home" => PageType::Homepage,
            "section" | "category" => PageType::Section,
            "search" => PageType::Search,
            "video" | "watch" => PageType::Video,
            other => PageType::Other(other.to_string()),
        }
    }
}
