//! English stop words shared by the normalizer and the keyword extractor.

use std::collections::HashSet;

/// Common English stop words. They occur in nearly every review and carry no
/// topical signal.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "cannot", "could", "did", "didn", "do", "does",
    "doesn", "doing", "don", "dont", "during", "each", "either", "else", "etc", "even",
    "ever", "every", "few", "for", "from", "further", "had", "has", "hasn", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
    "however", "i", "if", "in", "into", "is", "isn", "it", "its", "itself", "just", "ll",
    "may", "me", "might", "more", "most", "much", "must", "my", "myself", "neither",
    "no", "nor", "not", "now", "of", "off", "often", "on", "once", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "per", "quite", "rather", "re",
    "really", "s", "same", "she", "should", "since", "so", "some", "still", "such", "t",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "though", "through", "thus", "to", "too", "under",
    "until", "up", "upon", "us", "ve", "very", "was", "wasn", "we", "were", "what",
    "whatever", "when", "where", "whether", "which", "while", "who", "whom", "whose",
    "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Builds a lookup set over [`STOP_WORDS`].
pub fn stop_word_set() -> HashSet<&'static str> {
    STOP_WORDS.iter().copied().collect()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
