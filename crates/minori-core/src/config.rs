use std::path::Path;

use minori_parse::KeywordTables;

use crate::error::CoreError;

const DEFAULT_KEYWORDS: &str = include_str!("../../../config/keywords.toml");

/// Load the keyword tables: the user file when one is given and exists,
/// otherwise the built-in defaults. Runs once at startup; recognition
/// itself never touches the filesystem.
pub fn load_keyword_tables(user_path: Option<&Path>) -> Result<KeywordTables, CoreError> {
    if let Some(path) = user_path {
        if path.exists() {
            let text = std::fs::read_to_string(path)?;
            return toml::from_str(&text).map_err(|e| CoreError::Config(e.to_string()));
        }
    }
    toml::from_str(DEFAULT_KEYWORDS).map_err(|e| CoreError::Config(e.to_string()))
}
