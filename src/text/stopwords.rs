// Stopwords excluded from word-cloud weighting.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// Hand-picked fillers that dominate Reddit comments in Turkish, including
/// the ASCII spellings ("cok", "icin") people type on non-Turkish keyboards.
pub const BASE_STOPWORDS: [&str; 20] = [
    "ve", "ile", "ama", "bir", "cok", "daha", "bu", "icin", "mi", "ki", "ne", "de", "da", "şey",
    "çok", "olarak", "ben", "o", "var", "yok",
];

/// The full stopword set: the base list plus the stop-words crate's Turkish list.
pub fn turkish_stopwords() -> HashSet<String> {
    let mut words: HashSet<String> = BASE_STOPWORDS.iter().map(|w| w.to_string()).collect();
    words.extend(get(LANGUAGE::Turkish).into_iter().map(|w| w.to_lowercase()));
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_words_included() {
        let words = turkish_stopwords();
        for w in BASE_STOPWORDS {
            assert!(words.contains(w), "missing base stopword {w}");
        }
    }

    #[test]
    fn test_content_words_not_included() {
        let words = turkish_stopwords();
        assert!(!words.contains("zeka"));
        assert!(!words.contains("harika"));
    }
}
