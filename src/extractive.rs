//! Keyword-frequency extractive summarization.
//!
//! Sentences are scored on four features and the best ones are returned in
//! their original order:
//!
//! - **Title overlap**: share of non-stopword title words present in the sentence
//! - **Keyword density**: weight of the article's top keywords found in the sentence
//! - **Length**: closeness to an ideal length of 20 words
//! - **Position**: fixed weights by relative position (leads and endings score higher)

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Number of sentences kept in a summary.
pub const SUMMARY_SENTENCES: usize = 5;
const TOP_KEYWORDS: usize = 10;
const IDEAL_SENTENCE_WORDS: f64 = 20.0;

/// Terminal punctuation, optional closing quotes or brackets, then whitespace.
static BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["'”’)\]]*\s+"#).expect("valid boundary regex"));
/// Initials and initialisms without their final period: `F`, `U.S`, `D.C`.
static INITIALISM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\p{Lu}\.)*\p{Lu}$").expect("valid initialism regex"));
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}]+)?").expect("valid word regex"));

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "said", "same", "says", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours", "yourself", "yourselves",
];

/// Titles that are followed by a period but never end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "Capt", "Col", "Dr", "Gen", "Gov", "Jr", "Lt", "Mr", "Mrs", "Ms", "Mt", "Prof", "Rep", "Sen",
    "Sr", "St",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

fn words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

fn content_words(text: &str) -> Vec<String> {
    words(text)
        .into_iter()
        .filter(|w| !STOPWORD_SET.contains(w.as_str()))
        .collect()
}

/// Whether the punctuation run `terminator`, following `before` and followed
/// by `after`, closes a sentence.
fn ends_sentence(before: &str, terminator: &str, after: &str) -> bool {
    let opens_sentence = after
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || c.is_numeric() || "\"“'‘(".contains(c));
    if !opens_sentence {
        return false;
    }
    if terminator.trim_end() != "." {
        return true;
    }
    let token = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    !(ABBREVIATIONS.contains(&token) || INITIALISM_RE.is_match(token))
}

/// Split text into trimmed, non-empty sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace and a capital,
/// a digit or an opening quote, unless the period belongs to a title such as
/// `Dr.` or an initialism such as `U.S.`. Blank lines always end a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    for block in text.split("\n\n") {
        let mut start = 0;
        for m in BOUNDARY_RE.find_iter(block) {
            if ends_sentence(&block[start..m.start()], m.as_str(), &block[m.end()..]) {
                sentences.push(&block[start..m.end()]);
                start = m.end();
            }
        }
        sentences.push(&block[start..]);
    }
    sentences
        .into_iter()
        .map(|s| s.split_whitespace().join(" "))
        .filter(|s| !words(s).is_empty())
        .collect()
}

/// The most frequent non-stopword words with weights relative to the top one.
pub fn keywords(text: &str) -> HashMap<String, f64> {
    let counts = content_words(text).into_iter().counts();
    let Some(max) = counts.values().copied().max() else {
        return HashMap::new();
    };
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(TOP_KEYWORDS)
        .map(|(word, count)| (word, count as f64 / max as f64))
        .collect()
}

fn title_score(title_words: &HashSet<String>, sentence_words: &[String]) -> f64 {
    if title_words.is_empty() {
        return 0.0;
    }
    let hits = sentence_words
        .iter()
        .filter(|w| title_words.contains(*w))
        .unique()
        .count();
    hits as f64 / title_words.len() as f64
}

fn keyword_score(keywords: &HashMap<String, f64>, sentence_words: &[String]) -> f64 {
    if sentence_words.is_empty() {
        return 0.0;
    }
    let total: f64 = sentence_words.iter().filter_map(|w| keywords.get(w)).sum();
    total / sentence_words.len() as f64 * 10.0_f64.min(sentence_words.len() as f64) / 10.0
}

fn length_score(word_count: usize) -> f64 {
    (1.0 - (IDEAL_SENTENCE_WORDS - word_count as f64).abs() / IDEAL_SENTENCE_WORDS).max(0.0)
}

fn position_score(index: usize, total: usize) -> f64 {
    let normalized = (index + 1) as f64 / total as f64;
    match normalized {
        n if n <= 0.1 => 0.17,
        n if n <= 0.2 => 0.23,
        n if n <= 0.3 => 0.14,
        n if n <= 0.4 => 0.08,
        n if n <= 0.5 => 0.05,
        n if n <= 0.6 => 0.04,
        n if n <= 0.7 => 0.06,
        n if n <= 0.8 => 0.04,
        n if n <= 0.9 => 0.04,
        _ => 0.15,
    }
}

/// Pick up to `max_sentences` representative sentences from `text`.
///
/// Returns `None` when the text holds no sentences. Ties are broken in
/// favour of earlier sentences, so the result is deterministic.
pub fn summarize(title: &str, text: &str, max_sentences: usize) -> Option<String> {
    let sentences = split_sentences(text);
    if sentences.is_empty() || max_sentences == 0 {
        return None;
    }

    let keywords = keywords(text);
    let title_words: HashSet<String> = content_words(title).into_iter().collect();
    let total = sentences.len();

    let chosen = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let sentence_words = content_words(sentence);
            let score = title_score(&title_words, &sentence_words) * 1.5
                + keyword_score(&keywords, &sentence_words) * 2.0
                + length_score(words(sentence).len()) * 0.5
                + position_score(i, total);
            (i, score)
        })
        .sorted_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(max_sentences)
        .map(|(i, _)| i)
        .sorted()
        .map(|i| sentences[i].as_str())
        .join(" ");

    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "The city council approved a new budget for public transit on Monday. \
        The transit budget adds forty electric buses and extends night service. \
        Council members debated the plan for six hours. \
        Some residents asked for more bike lanes instead. \
        The mayor praised the transit budget as a turning point for the city. \
        Weather on Monday was mild. \
        Construction of new bus depots starts next spring. \
        Critics said the budget relies on optimistic fare forecasts.";

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("First one. Second one!  Third?\nFourth without stop");
        assert_eq!(
            sentences,
            vec!["First one.", "Second one!", "Third?", "Fourth without stop"]
        );
    }

    #[test]
    fn test_split_sentences_keeps_decimals_titles_and_initialisms() {
        let sentences = split_sentences(
            "Inflation rose 2.5 percent in May. Dr. Smith from the U.S. Treasury disagreed.",
        );
        assert_eq!(
            sentences,
            vec![
                "Inflation rose 2.5 percent in May.",
                "Dr. Smith from the U.S. Treasury disagreed."
            ]
        );
    }

    #[test]
    fn test_split_sentences_quotes_and_paragraphs() {
        let sentences = split_sentences(
            "He said \"we are done.\" Then he left. John F. Kennedy was named.\n\nA heading\n\nnext paragraph here",
        );
        assert_eq!(
            sentences,
            vec![
                "He said \"we are done.\"",
                "Then he left.",
                "John F. Kennedy was named.",
                "A heading",
                "next paragraph here"
            ]
        );
    }

    #[test]
    fn test_split_sentences_needs_capital_after_period() {
        assert_eq!(split_sentences("See fig. three for details."), vec!["See fig. three for details."]);
    }

    #[test]
    fn test_split_sentences_skips_punctuation_only() {
        assert!(split_sentences("... !!! ???").is_empty());
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_keywords_rank_frequent_content_words() {
        let kw = keywords(ARTICLE);
        assert!(kw.len() <= TOP_KEYWORDS);
        assert_eq!(kw.get("budget").copied(), Some(1.0));
        assert!(kw.contains_key("transit"));
        assert!(!kw.contains_key("the"));
    }

    #[test]
    fn test_summarize_keeps_original_order_and_limit() {
        let summary = summarize("Council approves transit budget", ARTICLE, 3).unwrap();
        let picked = split_sentences(&summary);
        assert_eq!(picked.len(), 3);

        let all = split_sentences(ARTICLE);
        let positions: Vec<usize> = picked
            .iter()
            .map(|s| all.iter().position(|a| a == s).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(summary.contains("approved a new budget for public transit"));
        assert!(!summary.contains("Weather on Monday was mild."));
    }

    #[test]
    fn test_summarize_short_text_returns_everything() {
        let summary = summarize("", "Only one sentence here.", SUMMARY_SENTENCES).unwrap();
        assert_eq!(summary, "Only one sentence here.");
    }

    #[test]
    fn test_summarize_empty_is_none() {
        assert!(summarize("Title", "   ", SUMMARY_SENTENCES).is_none());
        assert!(summarize("Title", ARTICLE, 0).is_none());
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let a = summarize("Transit", ARTICLE, SUMMARY_SENTENCES);
        let b = summarize("Transit", ARTICLE, SUMMARY_SENTENCES);
        assert_eq!(a, b);
    }
}
