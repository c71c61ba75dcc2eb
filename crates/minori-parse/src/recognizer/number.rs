use crate::episode::Episode;

/// Right-to-left scan of the working title for a trailing episode number.
///
/// Digits accumulate into a buffer; what interrupts them decides their
/// fate: a connector extends the buffer into a range, `v` turns it into a
/// release version, parentheses and decimal points discard it as noise, and
/// anything else is the split point between title, number and episode name.
/// Finding nothing is not an error — the number simply stays empty.
pub(crate) fn scan_backwards(title: String, episode: &mut Episode) -> String {
    let chars: Vec<char> = title.chars().collect();
    let mut buffer = String::new();
    let mut i = chars.len() as isize - 1;

    while i >= 0 {
        let c = chars[i as usize];
        if c.is_ascii_digit() {
            buffer.insert(0, c);
        } else if !buffer.is_empty() {
            match c {
                // Range connector: "01-02", "01&02".
                '-' | '&' => buffer.insert(0, '-'),
                // Version suffix: the digits seen so far are "v2", not an
                // episode number.
                'v' | 'V' => episode.version = std::mem::take(&mut buffer),
                // Parenthesized digits are noise ("(2011)").
                '(' | ')' => {
                    buffer.clear();
                    i = 1;
                }
                // Decimal-like numbers mid-sentence; resume before the
                // nearest space.
                '.' => {
                    i = chars[..=i as usize]
                        .iter()
                        .rposition(|&ch| ch == ' ')
                        .map_or(1, |pos| pos as isize);
                    buffer.clear();
                }
                _ => return split_title(&chars, i as usize, buffer, episode),
            }
        }
        i -= 1;
    }

    // No split point: leading digits stay in the title but still count as
    // the number.
    episode.number = buffer;
    title
}

/// Split at the first non-number character left of the buffer: the left
/// side becomes the title, the right side (when long enough) the episode
/// name.
fn split_title(chars: &[char], split: usize, buffer: String, episode: &mut Episode) -> String {
    let left: String = chars[..=split].iter().collect();
    let right: String = chars[split + 1 + buffer.len()..].iter().collect();

    let mut left = collapse_spaces(&left);
    let mut right = collapse_spaces(&right);
    episode.number = buffer.trim_start_matches('-').to_string();

    left = left.trim_end().to_string();
    right = right.trim_start().to_string();
    for suffix in [" ep.", " ep", " episode", " vol"] {
        erase_right_ci(&mut left, suffix);
    }
    left = left
        .trim_end_matches(|c: char| c == ' ' || c == '-')
        .to_string();
    right = right
        .trim_start_matches(|c: char| c == ' ' || c == '-')
        .to_string();

    if right.chars().count() > 2 {
        episode.name = right;
    }
    left
}

fn collapse_spaces(text: &str) -> String {
    let mut out = text.to_string();
    while out.contains("  ") {
        out = out.replace("  ", " ");
    }
    out
}

/// Remove `suffix` from the end of `text`, ASCII case-insensitively.
fn erase_right_ci(text: &mut String, suffix: &str) {
    let length = text.len();
    if length >= suffix.len()
        && text.is_char_boundary(length - suffix.len())
        && text[length - suffix.len()..].eq_ignore_ascii_case(suffix)
    {
        text.truncate(length - suffix.len());
    }
}
