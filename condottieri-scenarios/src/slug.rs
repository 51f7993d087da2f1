//! Slug derivation for settings, scenarios and countries.
use std::collections::BTreeSet;

/// ASCII spelling of an accented Latin letter, if it has one.
fn fold_latin(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĺ' | 'ļ' | 'ľ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'ŕ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ţ' | 'ť' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        _ => return None,
    };
    Some(folded)
}

/// Lowercase ASCII slug: accented Latin letters are folded to ASCII,
/// alphanumerics kept, runs of anything else collapse to a single `-`, no
/// leading or trailing separator. Truncated to `max_len`.
#[must_use]
pub fn slugify(text: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(text.len().min(max_len));
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if let Some(folded) = fold_latin(ch) {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push_str(folded);
        } else if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push('_');
        } else {
            pending_dash = true;
        }
    }

    truncate_slug(&slug, max_len)
}

fn truncate_slug(slug: &str, max_len: usize) -> String {
    // Slugs are pure ASCII at this point, so byte slicing is safe.
    let cut = &slug[..slug.len().min(max_len)];
    cut.trim_end_matches('-').to_string()
}

/// Make `base` unique among `taken` by appending `-2`, `-3`, ...
///
/// The suffix always fits in `max_len`; the base is shortened to make room.
#[must_use]
pub fn unique_slug(base: &str, taken: &BTreeSet<String>, max_len: usize) -> String {
    let base = truncate_slug(base, max_len);
    if !taken.contains(&base) {
        return base;
    }

    let mut counter: u32 = 2;
    loop {
        let suffix = format!("-{counter}");
        let room = max_len.saturating_sub(suffix.len());
        let candidate = format!("{}{suffix}", truncate_slug(&base, room));
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Italy, 1454!", 50), "italy-1454");
        assert_eq!(slugify("  The Great   War ", 50), "the-great-war");
        assert_eq!(slugify("papal_states", 20), "papal_states");
    }

    #[test]
    fn slugify_folds_accented_letters() {
        assert_eq!(slugify("Ñapoles", 50), "napoles");
        assert_eq!(slugify("Stato della Chiesa è Città", 50), "stato-della-chiesa-e-citta");
        assert_eq!(slugify("Großherzogtum Œuvre", 50), "grossherzogtum-oeuvre");
        assert_eq!(slugify("Łódź", 50), "lodz");
        assert_eq!(slugify("Καλημέρα", 50), "");
    }

    #[test]
    fn slugify_truncates_without_trailing_dash() {
        assert_eq!(slugify("Holy Roman Empire", 5), "holy");
        assert_eq!(slugify("Holy Roman Empire", 9), "holy-roma");
    }

    #[test]
    fn unique_slug_appends_counter() {
        let mut taken = BTreeSet::new();
        assert_eq!(unique_slug("venice", &taken, 20), "venice");
        taken.insert("venice".to_string());
        assert_eq!(unique_slug("venice", &taken, 20), "venice-2");
        taken.insert("venice-2".to_string());
        assert_eq!(unique_slug("venice", &taken, 20), "venice-3");
    }

    #[test]
    fn unique_slug_respects_max_len() {
        let mut taken = BTreeSet::new();
        taken.insert("abcdef".to_string());
        assert_eq!(unique_slug("abcdef", &taken, 6), "abcd-2");
    }
}
