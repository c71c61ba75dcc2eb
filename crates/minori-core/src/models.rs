use serde::{Deserialize, Serialize};

/// Airing status of a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiringStatus {
    Airing,
    #[default]
    FinishedAiring,
    NotYetAired,
}

/// A library entry an extracted episode is matched against. Read-only
/// snapshot; the matcher never writes back to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Canonical title.
    pub title: String,
    /// Service-provided synonyms, "; "-separated.
    #[serde(default)]
    pub synonyms: String,
    /// User-added synonyms, "; "-separated.
    #[serde(default)]
    pub user_synonyms: String,
    /// Total episode count; 0 when unknown.
    #[serde(default)]
    pub episodes: u32,
    #[serde(default)]
    pub status: AiringStatus,
    /// First air date, "YYYY-MM-DD". None (or "0000-00-00") when unknown.
    #[serde(default)]
    pub start_date: Option<String>,
}
