use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sports {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    #[serde(rename = "type")]
    pub sports_type: SportsType,
    pub src: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SportsType {
    Basketball,
    Soccer,
    Volleyball,
    Lacrosse,
    Football,
    Highlight,
    Recruiting,
}

impl SportsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SportsType::Basketball => "basketball",
            SportsType::Soccer => "soccer",
            SportsType::Volleyball => "volleyball",
            SportsType::Lacrosse => "lacrosse",
            SportsType::Football => "football",
            SportsType::Highlight => "highlight",
            SportsType::Recruiting => "recruiting",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "basketball" => Some(SportsType::Basketball),
            "soccer" => Some(SportsType::Soccer),
            "volleyball" => Some(SportsType::Volleyball),
            "lacrosse" => Some(SportsType::Lacrosse),
            "football" => Some(SportsType::Football),
            "highlight" => Some(SportsType::Highlight),
            "recruiting" => Some(SportsType::Recruiting),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSportsRequest {
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    #[serde(rename = "type")]
    pub sports_type: SportsType,
    pub src: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSportsRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(rename = "type")]
    pub sports_type: Option<SportsType>,
    pub src: Option<String>,
    pub order: Option<i64>,
}

/// Fully prepared row handed to the repository; `order` is assigned there.
#[derive(Debug, Clone)]
pub struct NewSports {
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub sports_type: SportsType,
    pub src: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: Uuid,
    pub order: i64,
}

/// Pull the video URL out of a pasted embed snippet.
///
/// `<iframe src="https://..." ...>` yields the quoted URL; anything else is
/// taken as an already-clean link.
pub fn extract_video_src(value: &str) -> String {
    const MARKER: &str = "src=\"";

    if let Some(start) = value.find(MARKER) {
        let rest = &value[start + MARKER.len()..];
        if let Some(end) = rest.find('"') {
            let src = rest[..end].trim();
            if !src.is_empty() {
                return src.to_string();
            }
        }
    }

    value.trim().to_string()
}
