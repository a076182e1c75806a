//! String similarity scoring for operation names.
//!
//! Scores are case-insensitive and land in `[0, 1]`. Exact and substring
//! matches short-circuit the edit-distance path; short words get typo floors
//! so a single slip or an adjacent swap still ranks as a likely match.

use strsim::{levenshtein, osa_distance};

const SUBSTRING_SCORE: f64 = 0.7;
const VARIATION_BOOST: f64 = 0.2;
const SHORT_WORD_MAX_LENGTH: usize = 6;
const SINGLE_EDIT_FLOOR: f64 = 0.75;
const TRANSPOSITION_FLOOR: f64 = 0.72;
const MAX_VARIATION_RESIDUAL_DISTANCE: usize = 2;

const COMMON_PREFIXES: &[&str] = &["get", "set", "create", "delete", "update", "send", "fetch", "add", "remove", "list"];
const COMMON_SUFFIXES: &[&str] = &["data", "item", "items", "record", "records", "message", "messages", "file", "files", "folder"];

/// Computes how likely `candidate` is the operation meant by `invalid`.
pub fn calculate_similarity(invalid: &str, candidate: &str) -> f64 {
    let invalid_lower = invalid.to_lowercase();
    let candidate_lower = candidate.to_lowercase();

    if invalid_lower == candidate_lower {
        return 1.0;
    }

    if is_substring_either_way(&invalid_lower, &candidate_lower) {
        let mut score = SUBSTRING_SCORE;
        if are_common_variations(&invalid_lower, &candidate_lower) {
            score += VARIATION_BOOST;
        }
        return score.clamp(0.0, 1.0);
    }

    let invalid_length = invalid_lower.chars().count();
    let candidate_length = candidate_lower.chars().count();
    let longest = invalid_length.max(candidate_length);
    if longest == 0 {
        return 0.0;
    }

    let distance = levenshtein_distance(&invalid_lower, &candidate_lower);
    let mut score = 1.0 - distance as f64 / longest as f64;

    if invalid_length <= SHORT_WORD_MAX_LENGTH && candidate_length <= SHORT_WORD_MAX_LENGTH {
        if distance == 1 {
            score = score.max(SINGLE_EDIT_FLOOR);
        } else if distance == 2 && is_adjacent_transposition(&invalid_lower, &candidate_lower) {
            score = score.max(TRANSPOSITION_FLOOR);
        }
    }

    score.clamp(0.0, 1.0)
}

/// Unit-cost edit distance over characters (insert, delete, substitute).
pub fn levenshtein_distance(left: &str, right: &str) -> usize {
    levenshtein(left, right)
}

/// Recognizes prefix/suffix compositions such as `getmessage`/`message`,
/// `sendmessage`/`send` or `createitems`/`item`.
///
/// Identical or empty inputs are never variations.
pub fn are_common_variations(left: &str, right: &str) -> bool {
    if left.is_empty() || right.is_empty() || left == right {
        return false;
    }

    for prefix in COMMON_PREFIXES {
        let left_has = left.starts_with(prefix);
        let right_has = right.starts_with(prefix);
        if left_has == right_has {
            continue;
        }
        let left_rest = if left_has { &left[prefix.len()..] } else { left };
        let right_rest = if right_has { &right[prefix.len()..] } else { right };
        if residuals_match(left_rest, right_rest) {
            return true;
        }
    }

    for suffix in COMMON_SUFFIXES {
        let left_has = left.ends_with(suffix);
        let right_has = right.ends_with(suffix);
        if left_has == right_has {
            continue;
        }
        let left_rest = if left_has { &left[..left.len() - suffix.len()] } else { left };
        let right_rest = if right_has { &right[..right.len() - suffix.len()] } else { right };
        if residuals_match(left_rest, right_rest) {
            return true;
        }
    }

    false
}

/// Labels a confidence score for display.
pub fn get_similarity_reason(confidence: f64, invalid: &str, candidate: &str) -> &'static str {
    if confidence >= 0.95 {
        return "almost exact match, likely a typo";
    }
    if confidence >= 0.8 {
        return "very similar, common variation";
    }
    if confidence >= 0.6 {
        return "similar operation";
    }
    if is_substring_either_way(&invalid.to_lowercase(), &candidate.to_lowercase()) {
        return "partial match";
    }
    "possibly related operation"
}

fn residuals_match(left: &str, right: &str) -> bool {
    if left.is_empty() || right.is_empty() {
        return false;
    }
    left == right || levenshtein_distance(left, right) <= MAX_VARIATION_RESIDUAL_DISTANCE
}

// Empty strings are substrings of everything; they never count as a match here.
fn is_substring_either_way(left: &str, right: &str) -> bool {
    if left.is_empty() || right.is_empty() {
        return false;
    }
    left.contains(right) || right.contains(left)
}

// Only consulted at Levenshtein distance 2, where an OSA distance of 1 means one swap of neighbours.
fn is_adjacent_transposition(left: &str, right: &str) -> bool {
    osa_distance(left, right) == 1
}
