//! String similarity primitives for name reconciliation.
//!
//! Historical sources abbreviate, reorder and misspell names, so exact
//! lookups are hopeless. `token_set_ratio` tolerates word reordering and
//! one-sided extra tokens ("Спартак Ленинград" vs "Ленинград Спартак");
//! plain `ratio` is used for person names where order carries meaning.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Accept a fuzzy match only above this score (0..1 scale, applied
/// uniformly across team and person resolution).
pub const SIM_THRESHOLD: f64 = 0.6;

/// Whole-string similarity in 0..1.
pub fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Token-set similarity in 0..1.
///
/// Both strings are split into lowercase word sets; the score is the best
/// pairwise ratio between the sorted intersection and each side's
/// intersection-plus-remainder, which makes the measure insensitive to
/// word order and forgiving of tokens present on only one side.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<String> = tokens(a);
    let tokens_b: BTreeSet<String> = tokens(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let common: Vec<&String> = tokens_a.intersection(&tokens_b).collect();
    let only_a: Vec<&String> = tokens_a.difference(&tokens_b).collect();
    let only_b: Vec<&String> = tokens_b.difference(&tokens_a).collect();

    let base = join(&common);
    let combined_a = join_two(&common, &only_a);
    let combined_b = join_two(&common, &only_b);

    let r1 = normalized_levenshtein(&base, &combined_a);
    let r2 = normalized_levenshtein(&base, &combined_b);
    let r3 = normalized_levenshtein(&combined_a, &combined_b);
    r1.max(r2).max(r3)
}

fn tokens(s: &str) -> BTreeSet<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn join(parts: &[&String]) -> String {
    parts
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_two(head: &[&String], tail: &[&String]) -> String {
    let mut all: Vec<&str> = head.iter().map(|s| s.as_str()).collect();
    all.extend(tail.iter().map(|s| s.as_str()));
    all.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        assert!((token_set_ratio("Спартак Москва", "Спартак Москва") - 1.0).abs() < 1e-9);
        assert!((ratio("Динамо", "Динамо") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_order_is_ignored() {
        let r = token_set_ratio("Спартак Ленинград", "Ленинград Спартак");
        assert!(r > 0.99, "got {r}");
    }

    #[test]
    fn test_subset_scores_high() {
        let r = token_set_ratio("Динамо", "Динамо Москва");
        assert!(r > 0.99, "got {r}");
    }

    #[test]
    fn test_unrelated_names_score_low() {
        let r = token_set_ratio("Динамо Москва", "Жальгирис Каунас");
        assert!(r < SIM_THRESHOLD, "got {r}");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_set_ratio("", "Динамо"), 0.0);
        assert_eq!(token_set_ratio("  ", ""), 0.0);
    }

    #[test]
    fn test_deterministic() {
        let a = token_set_ratio("КрСов Москва", "Крылья Советов Москва");
        let b = token_set_ratio("КрСов Москва", "Крылья Советов Москва");
        assert_eq!(a, b);
    }
}
