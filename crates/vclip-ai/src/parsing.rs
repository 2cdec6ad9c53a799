//! Multi-strategy parser for a batch of per-segment scores returned by a
//! text-completion model. Real models return JSON in many shapes; this
//! keeps trying cheaper, looser strategies until one yields numbers.

use std::sync::LazyLock;

use regex::Regex;

static JSON_ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\[\]]*\]").unwrap());
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?[0-9]*\.?[0-9]+").unwrap());

/// Parse a batch of `expected_len` scores out of `raw`, trying in order:
/// 1. Strip a ` ```json ` / ` ``` ` code fence, then parse as a JSON array.
/// 2. Scan for the first `[...]` substring anywhere in the text and parse it.
/// 3. Scan for comma-separated numbers.
/// 4. Take the first `expected_len` numeric tokens found anywhere.
///
/// The result is always exactly `expected_len` long: short results are
/// padded with `0.5`, long ones truncated.
pub fn parse_score_batch(raw: &str, expected_len: usize) -> Vec<f64> {
    let scores = try_fenced_json(raw)
        .or_else(|| try_any_json_array(raw))
        .or_else(|| try_comma_separated(raw))
        .or_else(|| try_first_n_numbers(raw, expected_len))
        .unwrap_or_default();

    normalize_length(scores, expected_len)
}

fn try_fenced_json(raw: &str) -> Option<Vec<f64>> {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let stripped = stripped.strip_suffix("```").unwrap_or(stripped).trim();
    serde_json::from_str::<Vec<f64>>(stripped).ok()
}

fn try_any_json_array(raw: &str) -> Option<Vec<f64>> {
    JSON_ARRAY_RE
        .find_iter(raw)
        .find_map(|m| serde_json::from_str::<Vec<f64>>(m.as_str()).ok())
}

fn try_comma_separated(raw: &str) -> Option<Vec<f64>> {
    let candidate = raw
        .lines()
        .find(|line| line.contains(',') && line.chars().any(|c| c.is_ascii_digit()))?;
    let values: Vec<f64> = candidate
        .split(',')
        .filter_map(|tok| tok.trim().trim_matches(|c: char| !c.is_ascii_digit() && c != '.' && c != '-').parse().ok())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn try_first_n_numbers(raw: &str, expected_len: usize) -> Option<Vec<f64>> {
    let values: Vec<f64> = NUMBER_RE
        .find_iter(raw)
        .filter_map(|m| m.as_str().parse().ok())
        .take(expected_len)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn normalize_length(mut scores: Vec<f64>, expected_len: usize) -> Vec<f64> {
    scores.truncate(expected_len);
    while scores.len() < expected_len {
        scores.push(0.5);
    }
    scores.into_iter().map(|s| s.clamp(0.0, 1.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_json_array() {
        let scores = parse_score_batch("[0.1, 0.5, 0.9]", 3);
        assert_eq!(scores, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn strips_markdown_code_fence() {
        let scores = parse_score_batch("```json\n[0.2, 0.4]\n```", 2);
        assert_eq!(scores, vec![0.2, 0.4]);
    }

    #[test]
    fn finds_json_array_embedded_in_prose() {
        let raw = "Sure, here are the scores: [0.3, 0.6, 0.9] — hope that helps!";
        let scores = parse_score_batch(raw, 3);
        assert_eq!(scores, vec![0.3, 0.6, 0.9]);
    }

    #[test]
    fn falls_back_to_comma_separated_numbers() {
        let raw = "scores are 0.1, 0.2, 0.3 for these segments";
        let scores = parse_score_batch(raw, 3);
        assert_eq!(scores, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn falls_back_to_first_n_numeric_tokens() {
        let raw = "segment one is about 0.7 ish then segment two is roughly 0.2 maybe";
        let scores = parse_score_batch(raw, 2);
        assert_eq!(scores, vec![0.7, 0.2]);
    }

    #[test]
    fn pads_short_results_with_neutral_score() {
        let scores = parse_score_batch("[0.9]", 3);
        assert_eq!(scores, vec![0.9, 0.5, 0.5]);
    }

    #[test]
    fn truncates_long_results() {
        let scores = parse_score_batch("[0.1, 0.2, 0.3, 0.4]", 2);
        assert_eq!(scores, vec![0.1, 0.2]);
    }

    #[test]
    fn total_failure_yields_all_neutral() {
        let scores = parse_score_batch("no numbers here at all", 3);
        assert_eq!(scores, vec![0.5, 0.5, 0.5]);
    }
}
