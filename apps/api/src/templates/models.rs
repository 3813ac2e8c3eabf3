use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// A presentation template as supplied by a template source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub color_schemes: Vec<String>,
    #[serde(default)]
    pub suitable_for: Vec<String>,
    #[serde(default)]
    pub compatible_versions: Vec<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub preview_image: Option<String>,
    /// Descriptor such as `"20-30"` or `"40+"`.
    #[serde(default)]
    pub slide_count: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
}
