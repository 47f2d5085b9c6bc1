use serde::{Deserialize, Serialize};
use orbit_engine::OrbitConfig;

/// Card content plus the orbit tunables, loaded from `cards.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardManifest {
    #[serde(default)]
    pub orbit: OrbitConfig,
    pub cards: Vec<CardInfo>,
}

/// One content card. The page renders `image`/`title`/`body`; the orbit only
/// sees the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardInfo {
    pub id: u32,
    /// Relative path to the card texture.
    pub image: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl CardManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The manifest bundled with the crate.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(include_str!("../cards.json"))
    }
}
