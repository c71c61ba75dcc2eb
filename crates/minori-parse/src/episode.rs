use serde::{Deserialize, Serialize};

/// Structured record produced by one recognition pass over a file name.
///
/// Every field is a string so that leading zeros and ranges ("01-02")
/// survive; empty means "not found". `number`, `version`, `checksum` and
/// `resolution` are written at most once per pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Episode {
    /// The series title.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Episode number as written ("05", "01-02").
    #[serde(skip_serializing_if = "String::is_empty")]
    pub number: String,
    /// Release version ("2" for a v2 release).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Release group name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,
    /// Video resolution ("720p", "1280x720").
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resolution: String,
    /// CRC32 checksum (8 hex characters).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub checksum: String,
    /// Video tags, space-joined ("H.264 10BIT").
    #[serde(skip_serializing_if = "String::is_empty")]
    pub video_type: String,
    /// Audio tags, space-joined ("AAC 5.1").
    #[serde(skip_serializing_if = "String::is_empty")]
    pub audio_type: String,
    /// Free-form annotations ("Uncensored", "Year: 2024").
    #[serde(skip_serializing_if = "String::is_empty")]
    pub extra: String,
    /// Episode title (text after the episode number).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Container format, uppercased ("MKV").
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    /// File name, extension included.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file: String,
    /// Directory part when the input was an absolute path.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub folder: String,
}

impl Episode {
    /// Last number of a possibly ranged episode number ("01-02" → 2).
    /// Returns 0 when the field is empty or not numeric.
    pub fn last_number(&self) -> u32 {
        self.number
            .rsplit('-')
            .next()
            .and_then(|part| part.parse().ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_number() {
        let mut episode = Episode::default();
        assert_eq!(episode.last_number(), 0);

        episode.number = "05".into();
        assert_eq!(episode.last_number(), 5);

        episode.number = "01-02".into();
        assert_eq!(episode.last_number(), 2);

        episode.number = "abc".into();
        assert_eq!(episode.last_number(), 0);
    }

    #[test]
    fn test_empty_fields_skipped_in_json() {
        let episode = Episode {
            title: "Title".into(),
            number: "05".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&episode).unwrap();
        assert_eq!(json, r#"{"title":"Title","number":"05"}"#);
    }
}
