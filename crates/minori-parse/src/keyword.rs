use serde::Deserialize;

// Built-in tables. Matching is case-insensitive; entries are listed
// uppercase by convention.

const AUDIO: &[&str] = &[
    "2CH", "5.1", "5.1CH", "AAC", "AC3", "DTS", "DTS-ES", "DTS5.1", "DUALAUDIO", "FLAC", "MP3",
    "OGG", "OPUS", "TRUEHD", "VORBIS",
];

const VIDEO: &[&str] = &[
    "8BIT", "10BIT", "AV1", "AVC", "DIVX", "H264", "H.264", "H265", "H.265", "HEVC", "HI10P",
    "VP9", "WMV", "X264", "X.264", "X265", "XVID",
];

const EXTRA: &[&str] = &[
    "BATCH", "BD", "BDRIP", "BLURAY", "BLU-RAY", "DVD", "DVDRIP", "ENG", "HARDSUB", "HDTV",
    "PROPER", "REMASTERED", "SOFTSUB", "SUBBED", "UNCENSORED", "UNCUT", "WEB-DL", "WEBRIP",
    "WIDESCREEN",
];

// Words that are plausible title text when unbracketed.
const EXTRA_UNSAFE: &[&str] = &[
    "COMPLETE", "END", "FINAL", "MOVIE", "OAD", "OAV", "ONA", "OVA", "SP", "SPECIAL", "TV",
];

const VERSION: &[&str] = &["V0", "V2", "V3", "V4"];

const EXTENSIONS: &[&str] = &[
    "3GP", "AVI", "FLV", "M2TS", "M4V", "MKV", "MOV", "MP4", "MPG", "OGM", "RM", "RMVB", "TS",
    "WEBM", "WMV",
];

/// The six keyword categories consumed by the classifier.
///
/// Built once at startup — from the built-in lists or a TOML file — and
/// shared read-only across recognition calls; nothing here is mutated
/// afterwards, so no synchronization is needed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeywordTables {
    pub audio: Vec<String>,
    pub video: Vec<String>,
    pub extra: Vec<String>,
    pub extra_unsafe: Vec<String>,
    pub version: Vec<String>,
    pub extensions: Vec<String>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            audio: to_owned(AUDIO),
            video: to_owned(VIDEO),
            extra: to_owned(EXTRA),
            extra_unsafe: to_owned(EXTRA_UNSAFE),
            version: to_owned(VERSION),
            extensions: to_owned(EXTENSIONS),
        }
    }
}

impl KeywordTables {
    pub fn is_audio(&self, word: &str) -> bool {
        contains(&self.audio, word)
    }

    pub fn is_video(&self, word: &str) -> bool {
        contains(&self.video, word)
    }

    pub fn is_extra(&self, word: &str) -> bool {
        contains(&self.extra, word)
    }

    pub fn is_extra_unsafe(&self, word: &str) -> bool {
        contains(&self.extra_unsafe, word)
    }

    pub fn is_version(&self, word: &str) -> bool {
        contains(&self.version, word)
    }

    pub fn is_extension(&self, word: &str) -> bool {
        contains(&self.extensions, word)
    }
}

fn to_owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|entry| entry.to_string()).collect()
}

/// Case-insensitive exact membership.
fn contains(keys: &[String], word: &str) -> bool {
    !word.is_empty() && keys.iter().any(|key| key.eq_ignore_ascii_case(word))
}
