//! Text analyzer: pure function of a segment's transcript text, per §4.D.

use std::collections::HashSet;

/// Keyword/action-verb/stop-word configuration. Mutable because the
/// Engine config (§6) allows overriding the keyword and action-verb
/// lists; stop words are provided for both supported locales (en, es).
#[derive(Debug, Clone)]
pub struct TextAnalyzerConfig {
    pub keywords: Vec<String>,
    pub action_verbs: Vec<String>,
    pub emotion_words: Vec<String>,
    pub question_words: Vec<String>,
    pub stop_words_en: HashSet<String>,
    pub stop_words_es: HashSet<String>,
}

impl Default for TextAnalyzerConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "secret", "never", "always", "best", "worst", "shocking", "amazing",
                "unbelievable", "crazy", "insane", "proven", "mistake", "truth", "exposed",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            action_verbs: [
                "watch", "listen", "look", "discover", "learn", "try", "build", "create",
                "stop", "start", "avoid", "do",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            emotion_words: [
                "love", "hate", "amazing", "terrible", "incredible", "horrible", "excited",
                "shocked", "furious", "thrilled", "devastated", "ecstatic",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            question_words: [
                "who", "what", "when", "where", "why", "how", "quien", "que", "cuando",
                "donde", "por", "como",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            stop_words_en: STOP_WORDS_EN.iter().map(|s| s.to_string()).collect(),
            stop_words_es: STOP_WORDS_ES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

const STOP_WORDS_EN: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was",
    "one", "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now",
    "old", "see", "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she",
    "too", "use", "that", "with", "have", "this", "will", "your", "from", "they", "been",
    "than", "into", "just", "only", "over", "also", "back", "even", "most", "some",
];

const STOP_WORDS_ES: &[&str] = &[
    "que", "los", "las", "del", "con", "una", "por", "para", "como", "pero", "sus", "este",
    "esta", "ser", "son", "fue", "muy", "mas", "esa", "ese", "tiene", "estan", "entre",
    "cuando", "hasta", "desde", "todo", "toda", "todos", "todas", "otro", "otra",
];

/// Score a single segment's text. Returns 0.0 for empty input.
pub fn score_text(text: &str, config: &TextAnalyzerConfig) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let emotional_intensity = emotional_intensity(text, config);
    let keyword_density = keyword_density(text, config);
    let information_density = information_density(text, config);
    let question_score = question_score(text, config);
    let action_words = action_words(text, config);

    let combined = 0.25 * emotional_intensity
        + 0.35 * keyword_density
        + 0.20 * information_density
        + 0.10 * question_score
        + 0.10 * action_words;

    combined.min(1.0)
}

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

fn emotional_intensity(text: &str, config: &TextAnalyzerConfig) -> f64 {
    let exclaim_question_count = text.chars().filter(|c| *c == '!' || *c == '?').count() as f64;
    let lower = text.to_lowercase();
    let emotion_word_count = config
        .emotion_words
        .iter()
        .filter(|w| lower.contains(w.as_str()))
        .count() as f64;
    let all_caps_count = words(text)
        .iter()
        .filter(|w| w.len() > 2 && w.chars().all(|c| !c.is_alphabetic() || c.is_uppercase()))
        .count() as f64;

    0.5 * (exclaim_question_count / 3.0).min(1.0)
        + 0.3 * (emotion_word_count / 2.0).min(1.0)
        + 0.2 * (all_caps_count / 3.0).min(1.0)
}

fn keyword_density(text: &str, config: &TextAnalyzerConfig) -> f64 {
    let lower = text.to_lowercase();
    let matches = config
        .keywords
        .iter()
        .filter(|k| lower.contains(k.as_str()))
        .count() as f64;
    (matches / 3.0).min(1.0)
}

fn information_density(text: &str, config: &TextAnalyzerConfig) -> f64 {
    let lower = text.to_lowercase();
    let is_meaningful = |w: &str| {
        w.len() > 2
            && !config.stop_words_en.contains(w)
            && !config.stop_words_es.contains(w)
    };

    let meaningful: Vec<String> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .filter(|w| is_meaningful(w))
        .map(|w| w.to_string())
        .collect();

    if meaningful.is_empty() {
        return 0.0;
    }

    let unique: HashSet<&String> = meaningful.iter().collect();
    let ratio = unique.len() as f64 / meaningful.len() as f64;
    (ratio / 0.7).min(1.0)
}

fn question_score(text: &str, config: &TextAnalyzerConfig) -> f64 {
    let question_marks = text.chars().filter(|c| *c == '?').count() as f64;
    let lower = text.to_lowercase();
    let question_word_count = config
        .question_words
        .iter()
        .filter(|w| {
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|tok| tok == w.as_str())
        })
        .count() as f64;

    ((question_marks + 0.5 * question_word_count) / 2.0).min(1.0)
}

fn action_words(text: &str, config: &TextAnalyzerConfig) -> f64 {
    let lower = text.to_lowercase();
    let matches = config
        .action_verbs
        .iter()
        .filter(|v| lower.contains(v.as_str()))
        .count() as f64;
    (matches / 2.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_scores_zero() {
        let config = TextAnalyzerConfig::default();
        assert_eq!(score_text("", &config), 0.0);
        assert_eq!(score_text("   ", &config), 0.0);
    }

    #[test]
    fn score_is_capped_at_one() {
        let config = TextAnalyzerConfig::default();
        let text = "SHOCKING secret!!! Why is everyone AMAZING?? Discover the proven truth, exposed at last, never seen before!";
        let score = score_text(text, &config);
        assert!(score <= 1.0);
        assert!(score > 0.5);
    }

    #[test]
    fn plain_text_scores_low() {
        let config = TextAnalyzerConfig::default();
        let score = score_text("the cat sat on the mat", &config);
        assert!(score < 0.3);
    }

    #[test]
    fn question_words_raise_question_score() {
        let config = TextAnalyzerConfig::default();
        let score = question_score("why does this work? how does it happen?", &config);
        assert!(score > 0.5);
    }
}
