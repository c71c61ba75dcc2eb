use chrono::Local;
use minori_parse::Episode;

use crate::models::{AiringStatus, CatalogEntry};

/// Match a recognized episode against a catalog entry's canonical title and
/// synonym lists.
///
/// May mutate the episode: for single-episode entries a decorative trailing
/// number ("Title 01") is folded back into the title on a successful match.
/// Repeated calls with the same inputs are idempotent.
pub fn compare_episode(episode: &mut Episode, entry: &CatalogEntry) -> bool {
    if episode.title.is_empty() {
        return false;
    }
    // Out-of-range episode number cannot belong to this entry.
    if entry.episodes > 1 {
        let number = episode.last_number();
        if number == 0 || number > entry.episodes {
            return false;
        }
    }
    // An entry that has not started airing cannot have files yet.
    if entry.status == AiringStatus::NotYetAired && !has_aired(entry) {
        return false;
    }

    let title = clean_title(&episode.title);
    if title.is_empty() {
        return false;
    }

    if compare_with(&title, &entry.title, episode, entry) {
        tracing::debug!(title = %episode.title, candidate = %entry.title, "title matched");
        return true;
    }
    for synonyms in [&entry.synonyms, &entry.user_synonyms] {
        for synonym in synonyms.split(';') {
            if compare_with(&title, synonym, episode, entry) {
                tracing::debug!(title = %episode.title, synonym, "synonym matched");
                return true;
            }
        }
    }

    tracing::debug!(title = %episode.title, candidate = %entry.title, "no title match");
    false
}

fn has_aired(entry: &CatalogEntry) -> bool {
    let Some(start) = entry.start_date.as_deref() else {
        return false;
    };
    if start.is_empty() || start == "0000-00-00" {
        return false;
    }
    // Dates are "YYYY-MM-DD", so lexicographic order is date order.
    Local::now().format("%Y-%m-%d").to_string().as_str() >= start
}

/// Compare a cleaned episode title against one candidate title.
fn compare_with(title: &str, candidate: &str, episode: &mut Episode, entry: &CatalogEntry) -> bool {
    let candidate = clean_title(candidate);
    if candidate.is_empty() {
        return false;
    }
    // Single-episode works are often named "Title 01" where the number is
    // decorative; fold it into the title when that makes the match.
    if entry.episodes == 1 && !episode.number.is_empty() {
        let folded = format!("{title}{}", clean_title(&episode.number));
        if folded == candidate {
            episode.title.push_str(&episode.number);
            episode.number.clear();
            return true;
        }
    }
    title == candidate
}

/// Strip the "The" stopword and everything non-alphanumeric, lowercased.
fn clean_title(title: &str) -> String {
    let title = erase_all_ci(title, "The ");
    let title = erase_all_ci(&title, " The");
    title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Remove every occurrence of an ASCII needle, case-insensitively.
fn erase_all_ci(text: &str, needle: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let matches = i + needle.len() <= chars.len()
            && chars[i..i + needle.len()]
                .iter()
                .zip(&needle)
                .all(|(a, b)| a.eq_ignore_ascii_case(b));
        if matches {
            i += needle.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}
