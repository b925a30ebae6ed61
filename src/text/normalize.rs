// Comment text normalization.
//
// Strips links, u/ and r/ mentions and everything outside the Turkish
// alphabet, then lowercases. The output alphabet is closed: only a-z,
// ç ğ ı ö ş ü and whitespace survive, which makes cleaning idempotent.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Anything starting with "http" up to the next whitespace.
const URL_PATTERN: &str = r"http\S+";

/// Non-ASCII letters of the Turkish alphabet, both cases.
const TURKISH_LETTERS: &str = "çğıöşüÇĞİÖŞÜ";

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern is valid"))
}

/// Letters and digits of any script, plus `_`. regex-lite's `\w` only
/// covers ASCII, which would cut `u/şükrü` after the `u/`.
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Remove `u/name` and `r/name` mentions. The name ends at the first
/// character that is not a name character, so `u/ali’nin` leaves `’nin`.
fn strip_mentions(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        let is_mention = matches!(chars[i], 'u' | 'r')
            && chars.get(i + 1) == Some(&'/')
            && chars.get(i + 2).is_some_and(|&c| is_name_char(c));

        if is_mention {
            i += 2;
            while i < chars.len() && is_name_char(chars[i]) {
                i += 1;
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

/// True for characters the cleaned text may contain (before lowercasing).
pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_whitespace() || TURKISH_LETTERS.contains(c)
}

/// Lowercase one allowed character, staying inside the allowed alphabet.
///
/// `İ` is special: Unicode lowercases it to `i` plus a combining dot, which
/// would leave a non-letter in the output.
fn lower_allowed(c: char) -> char {
    match c {
        'İ' => 'i',
        c if c.is_ascii() => c.to_ascii_lowercase(),
        c => c.to_lowercase().next().unwrap_or(c),
    }
}

/// Check whether `text` contains a URL-pattern match.
pub fn contains_url(text: &str) -> bool {
    url_regex().is_match(text)
}

/// Clean a single raw comment.
///
/// Returns the empty string when nothing survives; callers drop those rows.
pub fn clean_text(raw: &str) -> String {
    let without_urls = url_regex().replace_all(raw, "");
    let without_mentions = strip_mentions(&without_urls);

    let letters: String = without_mentions
        .chars()
        .filter(|&c| is_allowed_char(c))
        .map(lower_allowed)
        .collect();

    // Dropping punctuation can glue "ht.tp" into a fresh "http..." run.
    let letters = url_regex().replace_all(&letters, "");

    letters.trim().to_string()
}
