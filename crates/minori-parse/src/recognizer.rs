use thiserror::Error;

use crate::episode::Episode;
use crate::keyword::KeywordTables;
use crate::tokenizer::{self, Token};

mod number;
mod words;

/// Reasons a file name cannot be recognized. All of these are expected
/// outcomes for garbage input, not faults; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognizeError {
    #[error("title is empty after preprocessing")]
    EmptyTitle,
    #[error("unknown file extension: {0}")]
    InvalidExtension(String),
    #[error("title contains no tokens")]
    NoTokens,
    #[error("no title remained after classification")]
    NoTitle,
}

/// Strips player-specific decoration from a window or file title before
/// recognition runs. Implemented by the media-player detection layer.
pub trait TitleEdit: Send + Sync {
    fn edit_title(&self, title: &str) -> String;
}

/// Flags controlling which recognition passes run.
#[derive(Debug, Clone)]
pub struct ExamineOptions {
    /// Run the word classifier over bracket-enclosed tokens.
    pub examine_enclosed: bool,
    /// Run the word classifier over bare tokens.
    pub examine_bare: bool,
    /// Scan the title string for a trailing episode number when the word
    /// classifier found none.
    pub scan_number: bool,
    /// Classify extra and extra-unsafe keywords.
    pub check_extras: bool,
    /// Fail on an extension that is not in the keyword tables. Off by
    /// default: window titles rarely carry one.
    pub strict_extension: bool,
}

impl Default for ExamineOptions {
    fn default() -> Self {
        Self {
            examine_enclosed: true,
            examine_bare: true,
            scan_number: true,
            check_extras: true,
            strict_extension: false,
        }
    }
}

/// The recognition engine: a pure function of the input string and the
/// keyword tables it borrows. Safe to share across threads.
pub struct Recognizer<'k> {
    keywords: &'k KeywordTables,
    title_editor: Option<Box<dyn TitleEdit>>,
}

impl<'k> Recognizer<'k> {
    pub fn new(keywords: &'k KeywordTables) -> Self {
        Self {
            keywords,
            title_editor: None,
        }
    }

    pub fn with_title_editor(mut self, editor: Box<dyn TitleEdit>) -> Self {
        self.title_editor = Some(editor);
        self
    }

    /// Decompose a file name (or full path) into an [`Episode`] record.
    ///
    /// # Example
    /// ```
    /// use minori_parse::{ExamineOptions, KeywordTables, Recognizer};
    ///
    /// let keywords = KeywordTables::default();
    /// let episode = Recognizer::new(&keywords)
    ///     .examine(
    ///         "[SubsPlease] Sousou no Frieren - 05 (1080p) [ABCD1234].mkv",
    ///         &ExamineOptions::default(),
    ///     )
    ///     .unwrap();
    /// assert_eq!(episode.title, "Sousou no Frieren");
    /// assert_eq!(episode.number, "05");
    /// assert_eq!(episode.group, "SubsPlease");
    /// assert_eq!(episode.resolution, "1080p");
    /// assert_eq!(episode.checksum, "ABCD1234");
    /// assert_eq!(episode.format, "MKV");
    /// ```
    #[tracing::instrument(name = "examine", skip(self, options), fields(filename = %filename))]
    pub fn examine(
        &self,
        filename: &str,
        options: &ExamineOptions,
    ) -> Result<Episode, RecognizeError> {
        let mut episode = Episode::default();
        let title = self.preprocess(filename, options, &mut episode)?;

        let mut tokens = tokenizer::tokenize(&title);
        if tokens.is_empty() {
            return Err(RecognizeError::NoTokens);
        }

        for token in &mut tokens {
            let examine = if token.is_enclosed() {
                options.examine_enclosed
            } else {
                options.examine_bare
            };
            if examine {
                words::examine_token(token, &mut episode, self.keywords, options.check_extras);
            }
        }

        merge_parentheticals(&mut tokens);
        tidy(&mut tokens);

        let title = assign_roles(&mut tokens, &mut episode);

        let title = if options.scan_number && episode.number.is_empty() {
            number::scan_backwards(title, &mut episode)
        } else {
            title
        };

        if title.is_empty() {
            return Err(RecognizeError::NoTitle);
        }
        episode.title = title;
        tracing::debug!(
            title = %episode.title,
            number = %episode.number,
            group = %episode.group,
            "recognized"
        );
        Ok(episode)
    }

    /// Strip invisible characters and player decoration, split off the
    /// directory part, and validate the extension.
    fn preprocess(
        &self,
        filename: &str,
        options: &ExamineOptions,
        episode: &mut Episode,
    ) -> Result<String, RecognizeError> {
        let mut title = filename.replace('\u{200B}', "");
        if let Some(editor) = &self.title_editor {
            title = editor.edit_title(&title);
        }
        if title.is_empty() {
            return Err(RecognizeError::EmptyTitle);
        }

        // "C:\..." — split an absolute path into folder and file name.
        let bytes = title.as_bytes();
        if bytes.len() > 3 && bytes[1] == b':' && bytes[2] == b'\\' {
            if let Some(pos) = title.rfind('\\') {
                episode.folder = title[..pos + 1].to_string();
                title = title[pos + 1..].to_string();
            }
        }
        episode.file = title.clone();

        if let Some(dot) = title.rfind('.') {
            let extension = title[dot + 1..].to_string();
            if !extension.is_empty() && extension.len() <= 5 && dot > 0 {
                let alphanumeric = extension.chars().all(|c| c.is_ascii_alphanumeric());
                if alphanumeric && self.keywords.is_extension(&extension) {
                    episode.format = extension.to_ascii_uppercase();
                    title.truncate(dot);
                } else if options.strict_extension {
                    return Err(RecognizeError::InvalidExtension(extension));
                }
                // Otherwise the extension text stays in the title.
            }
        }

        Ok(title)
    }
}

/// Fold spurious parenthetical fragments back into the bare token on their
/// left: `Title (TV) Extra` is one title, not title + metadata.
///
/// Fixed-point loop, restarted from the front after every merge. Quadratic
/// in the worst case, which is fine for filename-sized token counts.
fn merge_parentheticals(tokens: &mut Vec<Token>) {
    let bound = tokens.len();
    for _ in 0..bound {
        let Some(i) = find_mergeable(tokens) else {
            break;
        };
        let folded = format!("({})", tokens[i].content);
        tokens[i - 1].content.push_str(&folded);
        if !tokens[i + 1].is_enclosed() {
            let next = tokens.remove(i + 1);
            tokens[i - 1].content.push_str(&next.content);
            if tokens[i - 1].separator.is_none() {
                tokens[i - 1].separator = next.separator;
            }
        }
        tokens.remove(i);
    }
}

fn find_mergeable(tokens: &[Token]) -> Option<usize> {
    (1..tokens.len().saturating_sub(1)).find(|&i| {
        tokens[i].encloser == Some('(')
            && tokens[i].virgin
            && tokens[i - 1].virgin
            && !tokens[i - 1].is_enclosed()
            && tokens[i - 1].content.chars().count() >= 2
    })
}

/// Trim each token's content of its separator character and drop what is
/// left over as noise.
fn tidy(tokens: &mut Vec<Token>) {
    for token in tokens.iter_mut() {
        if let Some(separator) = token.separator {
            token.content = token.content.trim_matches(separator).to_string();
        }
    }
    tokens.retain(|token| token.content.chars().count() >= 2);
}

/// Pick the title and release-group tokens and turn the title token into
/// the working title string.
fn assign_roles(tokens: &mut [Token], episode: &mut Episode) -> String {
    let mut group_candidates: Vec<usize> = Vec::new();
    let mut title_candidates: Vec<usize> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if token.is_enclosed() {
            group_candidates.push(i);
        } else {
            title_candidates.push(i);
        }
    }

    // The first bare token is the title. With nothing bare, the second
    // enclosed token is (the first is presumed to be the group), or the
    // sole enclosed one.
    let mut title_index = None;
    if !title_candidates.is_empty() {
        title_index = Some(title_candidates.remove(0));
    } else if group_candidates.len() > 1 {
        title_index = Some(group_candidates.remove(1));
    } else if !group_candidates.is_empty() {
        title_index = Some(group_candidates.remove(0));
    }

    // The group is the first enclosed token classification left untouched,
    // or failing that a trailing bare token.
    let mut group_index = None;
    if let Some(pos) = group_candidates.iter().position(|&i| tokens[i].virgin) {
        group_index = Some(group_candidates.remove(pos));
    }
    if group_index.is_none() {
        group_index = title_candidates.pop();
    }

    let mut title = String::new();
    if let Some(i) = title_index {
        let content = normalize_separators(&tokens[i]);
        title = content
            .trim_matches(|c| c == ' ' || c == '-')
            .to_string();
        tokens[i].content.clear();
    }

    if let Some(i) = group_index {
        episode.group = if tokens[i].is_enclosed() {
            tokens[i].content.clone()
        } else {
            normalize_separators(&tokens[i])
                .trim_matches(|c| c == ' ' || c == '-')
                .to_string()
        };
        tokens[i].content.clear();
    }

    title
}

/// Replace a token's separator characters with spaces.
fn normalize_separators(token: &Token) -> String {
    match token.separator {
        Some(separator) => token.content.replace(separator, " "),
        None => token.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn examine(filename: &str) -> Result<Episode, RecognizeError> {
        let keywords = KeywordTables::default();
        Recognizer::new(&keywords).examine(filename, &ExamineOptions::default())
    }

    #[test]
    fn test_typical_subgroup_format() {
        let episode = examine("[GroupX] Anime Title - 05 [720p][AAC].mkv").unwrap();
        assert_eq!(episode.group, "GroupX");
        assert_eq!(episode.title, "Anime Title");
        assert_eq!(episode.number, "05");
        assert_eq!(episode.resolution, "720p");
        assert!(episode.audio_type.contains("AAC"));
        assert_eq!(episode.format, "MKV");
    }

    #[test]
    fn test_version_keyword_and_number() {
        let episode = examine("[Group] Title v2 - 12.mkv").unwrap();
        assert_eq!(episode.version, "2");
        assert_eq!(episode.number, "12");
        assert_eq!(episode.title, "Title");
        assert_eq!(episode.group, "Group");
    }

    #[test]
    fn test_underscore_separators() {
        let episode = examine("[Group]_Anime_Title_-_07_[1080p].mkv").unwrap();
        assert_eq!(episode.title, "Anime Title");
        assert_eq!(episode.number, "07");
        assert_eq!(episode.group, "Group");
        assert_eq!(episode.resolution, "1080p");
    }

    #[test]
    fn test_year_token_becomes_extra() {
        let episode = examine("[Group] Title (2024).mkv").unwrap();
        assert_eq!(episode.number, "");
        assert_eq!(episode.extra, "Year: 2024");
        assert_eq!(episode.title, "Title");
    }

    #[test]
    fn test_large_number_discarded_without_year_note() {
        let episode = examine("[Group] Title (1200).mkv").unwrap();
        assert_eq!(episode.number, "");
        assert_eq!(episode.extra, "");
    }

    #[test]
    fn test_checksum_tagged_once() {
        let episode = examine("[Group] Title - 03 [ABCD1234][DEADBEEF].mkv").unwrap();
        assert_eq!(episode.checksum, "ABCD1234");
        // The second hex token is left alone and never re-tagged.
        assert!(!episode.video_type.contains("DEADBEEF"));
        assert!(!episode.extra.contains("DEADBEEF"));
    }

    #[test]
    fn test_dotted_codec_not_shattered() {
        let episode = examine("[Group] Title - 02 [H.264][AAC].mkv").unwrap();
        assert_eq!(episode.video_type, "H.264");
        assert_eq!(episode.audio_type, "AAC");
    }

    #[test]
    fn test_dotted_group_name_survives() {
        let episode = examine("[m.3.3.w] Title - 04.mkv").unwrap();
        assert_eq!(episode.group, "m.3.3.w");
        assert_eq!(episode.title, "Title");
        assert_eq!(episode.number, "04");
    }

    #[test]
    fn test_episode_prefix_word() {
        let episode = examine("Title Ep12v2.mkv").unwrap();
        assert_eq!(episode.number, "12");
        assert_eq!(episode.version, "2");
        assert_eq!(episode.title, "Title");
    }

    #[test]
    fn test_episode_name_follows_prefix_word() {
        let episode = examine("[Group] Title Ep05 The Finale.mkv").unwrap();
        assert_eq!(episode.number, "05");
        assert_eq!(episode.name, "The Finale");
        assert_eq!(episode.title, "Title");
    }

    #[test]
    fn test_parenthetical_merged_into_title() {
        // With extras off, "(TV)" stays virgin and is folded back into the
        // neighboring bare token instead of being read as metadata.
        let keywords = KeywordTables::default();
        let options = ExamineOptions {
            check_extras: false,
            ..Default::default()
        };
        let episode = Recognizer::new(&keywords)
            .examine("Title (TV) Extra - 01.mkv", &options)
            .unwrap();
        assert_eq!(episode.title, "Title (TV) Extra");
        assert_eq!(episode.number, "01");
    }

    #[test]
    fn test_year_parenthetical_merged_into_title() {
        let episode = examine("Some Title (2011) Special Chapter.mkv").unwrap();
        assert_eq!(episode.title, "Some Title (2011) Special Chapter");
        assert_eq!(episode.number, "");
    }

    #[test]
    fn test_unsafe_extra_only_stripped_when_enclosed() {
        let enclosed = examine("[Group] Title - 09 [OVA].mkv").unwrap();
        assert!(enclosed.extra.contains("OVA"));

        // Bare unsafe keyword is noted but stays part of the title.
        let bare = examine("Title OVA.mkv").unwrap();
        assert!(bare.extra.contains("OVA"));
        assert_eq!(bare.title, "Title OVA");
    }

    #[test]
    fn test_group_fallback_to_trailing_bare_token() {
        // No virgin enclosed token remains, so the trailing bare token is
        // presumed to be the group tag.
        let episode = examine("Title - 11 [720p] GroupTag.mkv").unwrap();
        assert_eq!(episode.title, "Title");
        assert_eq!(episode.number, "11");
        assert_eq!(episode.group, "GroupTag");
    }

    #[test]
    fn test_enclosed_only_name() {
        // First enclosed token is the group, second is the title.
        let episode = examine("[Group][Some Title][03].mkv").unwrap();
        assert_eq!(episode.title, "Some Title");
        assert_eq!(episode.group, "Group");
        assert_eq!(episode.number, "03");
    }

    #[test]
    fn test_absolute_path_split() {
        let episode = examine("C:\\Anime\\[Group] Title - 06.mkv").unwrap();
        assert_eq!(episode.folder, "C:\\Anime\\");
        assert_eq!(episode.file, "[Group] Title - 06.mkv");
        assert_eq!(episode.title, "Title");
        assert_eq!(episode.number, "06");
    }

    #[test]
    fn test_strict_extension_rejected() {
        let keywords = KeywordTables::default();
        let options = ExamineOptions {
            strict_extension: true,
            ..Default::default()
        };
        let result = Recognizer::new(&keywords).examine("Title - 05.xyz", &options);
        assert_eq!(
            result,
            Err(RecognizeError::InvalidExtension("xyz".to_string()))
        );
    }

    #[test]
    fn test_lenient_extension_retained_in_title() {
        let episode = examine("Title - 05.xyz").unwrap();
        assert_eq!(episode.format, "");
        assert_eq!(episode.file, "Title - 05.xyz");
        // The unvalidated extension text survives into the scan, where it
        // ends up as trailing text rather than a format.
        assert_eq!(episode.title, "Title");
        assert_eq!(episode.number, "05");
    }

    #[test]
    fn test_no_tokens() {
        assert_eq!(examine("[](){}"), Err(RecognizeError::NoTokens));
    }

    #[test]
    fn test_empty_title_from_editor() {
        struct Blanker;
        impl TitleEdit for Blanker {
            fn edit_title(&self, _title: &str) -> String {
                String::new()
            }
        }
        let keywords = KeywordTables::default();
        let result = Recognizer::new(&keywords)
            .with_title_editor(Box::new(Blanker))
            .examine("Anything", &ExamineOptions::default());
        assert_eq!(result, Err(RecognizeError::EmptyTitle));
    }

    #[test]
    fn test_title_editor_strips_decoration() {
        struct SuffixStripper;
        impl TitleEdit for SuffixStripper {
            fn edit_title(&self, title: &str) -> String {
                title.trim_end_matches(" - MPC-HC").to_string()
            }
        }
        let keywords = KeywordTables::default();
        let episode = Recognizer::new(&keywords)
            .with_title_editor(Box::new(SuffixStripper))
            .examine("[Group] Title - 08.mkv - MPC-HC", &ExamineOptions::default())
            .unwrap();
        assert_eq!(episode.title, "Title");
        assert_eq!(episode.number, "08");
    }

    #[test]
    fn test_zero_width_space_removed() {
        let episode = examine("[Group] Ti\u{200B}tle - 05.mkv").unwrap();
        assert_eq!(episode.title, "Title");
    }

    #[test]
    fn test_fresh_state_per_call() {
        let keywords = KeywordTables::default();
        let recognizer = Recognizer::new(&keywords);
        let options = ExamineOptions::default();
        let first = recognizer
            .examine("[Group] Title - 05 [ABCD1234].mkv", &options)
            .unwrap();
        let second = recognizer.examine("Other Show - 01.mkv", &options).unwrap();
        assert_eq!(first.checksum, "ABCD1234");
        assert_eq!(second.checksum, "");
        assert_eq!(second.group, "");
    }
}
