use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Unicode-aware "word character run" pattern, the same shape used by the
/// rerank and diversity stages to turn free text into a comparable bag of
/// words.
static RE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w]+").expect("valid regex"));

pub fn word_set(text: &str) -> HashSet<String> {
    RE_WORD
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Jaccard similarity between the word sets of two strings. Returns 0.0 when
/// both sets are empty rather than dividing by zero.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a = word_set(a);
    let set_b = word_set(b);
    if set_a.is_empty() && set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_are_fully_similar() {
        assert_eq!(jaccard_similarity("apple banana", "apple banana"), 1.0);
    }

    #[test]
    fn disjoint_strings_are_not_similar() {
        assert_eq!(jaccard_similarity("apple", "durian"), 0.0);
    }

    #[test]
    fn partial_overlap_is_between_zero_and_one() {
        let sim = jaccard_similarity("apple banana", "apple banana cherry");
        assert!(sim > 0.0 && sim < 1.0);
    }
}
