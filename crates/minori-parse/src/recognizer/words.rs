use std::sync::LazyLock;

use regex::Regex;

use crate::episode::Episode;
use crate::keyword::KeywordTables;
use crate::tokenizer::Token;

// "Ep12", "EP12v2" — number with optional version suffix.
static RE_EP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Ep(\d+)(?:v(\d+))?$").unwrap());

// "E12" — bare single-letter prefix, numeric rest only.
static RE_E_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^E(\d+)$").unwrap());

/// Classify every word of a token, removing recognized words from its
/// content. Rules are ordered by priority; the first match wins.
pub(crate) fn examine_token(
    token: &mut Token,
    episode: &mut Episode,
    keywords: &KeywordTables,
    check_extras: bool,
) {
    token.separator = most_common_separator(&token.content);
    let words = split_words(token);

    for (i, word) in words.iter().enumerate() {
        if word.is_empty() {
            continue;
        }

        // Checksum
        if episode.checksum.is_empty()
            && word.chars().count() == 8
            && word.chars().all(|c| c.is_ascii_hexdigit())
        {
            episode.checksum = word.clone();
            remove_word(token, word, false);
        // Video resolution
        } else if episode.resolution.is_empty() && is_resolution(word) {
            episode.resolution = word.clone();
            remove_word(token, word, false);
        // Video info
        } else if keywords.is_video(word) {
            push_tag(&mut episode.video_type, word);
            remove_word(token, word, true);
        // Audio info
        } else if keywords.is_audio(word) {
            push_tag(&mut episode.audio_type, word);
            remove_word(token, word, true);
        // Version marker ("v2")
        } else if episode.version.is_empty() && keywords.is_version(word) {
            episode.version = word.chars().last().map(String::from).unwrap_or_default();
            remove_word(token, word, true);
        // Episode prefix word ("Ep12", "Ep12v2", "E12")
        } else if episode.number.is_empty() && parse_episode_word(word, episode) {
            // Whatever follows in this token is the episode title.
            for later in words.iter().skip(i + 1) {
                if later.is_empty() {
                    continue;
                }
                push_tag(&mut episode.name, later);
            }
            if let Some(pos) = token.content.find(word.as_str()) {
                token.content.truncate(pos);
            }
            token.virgin = false;
        // Bare number at either end of the word list
        } else if episode.number.is_empty()
            && (i == 0 || i == words.len() - 1)
            && is_numeric(word)
        {
            episode.number = word.clone();
            if !check_episode_number(episode) {
                continue;
            }
            remove_word(token, word, false);
        // Extras
        } else if check_extras && keywords.is_extra(word) {
            push_tag(&mut episode.extra, word);
            remove_word(token, word, true);
        } else if check_extras && keywords.is_extra_unsafe(word) {
            // Unsafe keywords are trusted as metadata only when bracketed;
            // in free text they stay part of the title.
            push_tag(&mut episode.extra, word);
            if token.is_enclosed() {
                remove_word(token, word, true);
            }
        }
    }
}

/// The most frequent non-alphanumeric character of the content, ties broken
/// by first occurrence. This is the token's word separator.
fn most_common_separator(content: &str) -> Option<char> {
    let mut counts: Vec<(char, usize)> = Vec::new();
    for c in content.chars().filter(|c| !c.is_alphanumeric()) {
        match counts.iter_mut().find(|(candidate, _)| *candidate == c) {
            Some((_, count)) => *count += 1,
            None => counts.push((c, 1)),
        }
    }
    let mut best: Option<(char, usize)> = None;
    for (c, count) in counts {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((c, count)),
        }
    }
    best.map(|(c, _)| c)
}

/// Split a token's content on its separator. For enclosed tokens a split
/// that produces any single-character word is reverted, so dotted group
/// names ("m.3.3.w") and codecs ("H.264") stay whole.
fn split_words(token: &Token) -> Vec<String> {
    let words: Vec<String> = match token.separator {
        Some(separator) => token.content.split(separator).map(str::to_string).collect(),
        None => vec![token.content.clone()],
    };
    if token.is_enclosed() && words.iter().any(|word| word.chars().count() == 1) {
        return vec![token.content.clone()];
    }
    words
}

/// Delete the first qualifying occurrence of `word` from the token content
/// and mark the token as touched. `whole_word` requires non-alphanumeric
/// (or edge) boundaries around the occurrence.
fn remove_word(token: &mut Token, word: &str, whole_word: bool) {
    if let Some(content) = without_word(&token.content, word, whole_word) {
        token.content = content;
    }
    token.virgin = false;
}

fn without_word(content: &str, word: &str, whole_word: bool) -> Option<String> {
    let mut search = 0;
    while let Some(found) = content[search..].find(word) {
        let pos = search + found;
        if !whole_word || has_word_boundaries(content, pos, word.len()) {
            let mut out = String::with_capacity(content.len() - word.len());
            out.push_str(&content[..pos]);
            out.push_str(&content[pos + word.len()..]);
            return Some(out);
        }
        search = pos + word.len().max(1);
    }
    None
}

fn has_word_boundaries(content: &str, pos: usize, len: usize) -> bool {
    let before = content[..pos].chars().next_back();
    let after = content[pos + len..].chars().next();
    before.map_or(true, |c| !c.is_alphanumeric()) && after.map_or(true, |c| !c.is_alphanumeric())
}

fn is_numeric(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit())
}

/// `NNNxNNN` (length > 6) or `NNNp` (length > 3).
fn is_resolution(word: &str) -> bool {
    let length = word.chars().count();
    if length > 6 {
        if let Some(pos) = word.find('x') {
            return is_numeric(&word[..pos]) && is_numeric(&word[pos + 1..]);
        }
    } else if length > 3 {
        if let Some(prefix) = word.strip_suffix('p') {
            return is_numeric(prefix);
        }
    }
    false
}

/// Validate a tentatively recorded episode number. Values above 1000 are
/// never episode numbers; those that look like a year become an extra note
/// instead. Returns false when the number was rejected.
fn check_episode_number(episode: &mut Episode) -> bool {
    let number = match episode.number.parse::<u32>() {
        Ok(number) => number,
        Err(_) => {
            episode.number.clear();
            return false;
        }
    };
    if number > 1000 {
        if number > 1950 && number < 2050 {
            let note = format!("Year: {}", episode.number);
            push_tag(&mut episode.extra, &note);
        }
        episode.number.clear();
        return false;
    }
    true
}

/// "Ep12" / "Ep12v2" / "E12" — writes number (and version) on a match.
fn parse_episode_word(word: &str, episode: &mut Episode) -> bool {
    if let Some(caps) = RE_EP_PREFIX.captures(word) {
        episode.number = caps[1].to_string();
        if let Some(version) = caps.get(2) {
            episode.version = version.as_str().to_string();
        }
        return true;
    }
    if let Some(caps) = RE_E_PREFIX.captures(word) {
        episode.number = caps[1].to_string();
        return true;
    }
    false
}

fn push_tag(field: &mut String, value: &str) {
    if !field.is_empty() {
        field.push(' ');
    }
    field.push_str(value);
}
