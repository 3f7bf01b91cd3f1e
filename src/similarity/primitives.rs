//! Independent similarity methods.
//!
//! Every function takes already-normalized strings and returns a score in
//! `0.0..=100.0`. A method that cannot evaluate its inputs (typically because one
//! side is empty) scores 0 rather than failing.

use regex::Regex;

use crate::config::MethodScores;
use crate::similarity::normalize::compact;
use crate::similarity::phonetic::sounds_alike;

const VARIATION_PREFIXES: &[&str] = &[
    "e", "i", "my", "the", "go", "pro", "super", "ultra", "mega", "smart",
];

const VARIATION_SUFFIXES: &[&str] = &[
    "app", "apps", "ly", "io", "hq", "hub", "plus", "pro", "now", "go", "net", "tech",
];

pub fn exact(candidate: &str, protected: &str) -> f64 {
    if !candidate.is_empty() && candidate == protected {
        100.0
    } else {
        0.0
    }
}

/// Candidate starts with the protected mark, or a short candidate is itself the
/// start of the protected mark.
pub fn prefix(candidate: &str, protected: &str, scores: &MethodScores) -> f64 {
    let (candidate, protected) = (compact(candidate), compact(protected));
    if candidate.is_empty() || protected.is_empty() {
        return 0.0;
    }

    let forward = candidate.starts_with(&protected);
    let reverse = candidate.chars().count() >= scores.reverse_prefix_min_len
        && protected.starts_with(&candidate);

    if forward || reverse {
        scores.prefix
    } else {
        0.0
    }
}

pub fn suffix(candidate: &str, protected: &str, scores: &MethodScores) -> f64 {
    let (candidate, protected) = (compact(candidate), compact(protected));
    if !protected.is_empty() && candidate.ends_with(&protected) {
        scores.suffix
    } else {
        0.0
    }
}

pub fn contains(candidate: &str, protected: &str, scores: &MethodScores) -> f64 {
    let (candidate, protected) = (compact(candidate), compact(protected));
    if !protected.is_empty() && candidate.contains(&protected) {
        scores.contains
    } else {
        0.0
    }
}

/// `100 × (1 − distance / max_len)` over characters, spaces ignored.
///
/// Symmetric. Returns 0 when either side is empty.
pub fn edit_distance_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = (compact(a), compact(b));
    let max_len = a.chars().count().max(b.chars().count());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let distance = strsim::levenshtein(&a, &b);
    100.0 * (1.0 - distance as f64 / max_len as f64)
}

/// [`edit_distance_ratio`], counted only once it reaches the configured floor.
pub fn edit_distance(candidate: &str, protected: &str, scores: &MethodScores) -> f64 {
    let ratio = edit_distance_ratio(candidate, protected);
    if ratio >= scores.edit_distance_floor {
        ratio
    } else {
        0.0
    }
}

/// Soundex or Metaphone codes of the two marks agree.
pub fn phonetic(candidate: &str, protected: &str, scores: &MethodScores) -> f64 {
    if sounds_alike(candidate, protected) {
        scores.phonetic
    } else {
        0.0
    }
}

/// Any of the protected mark's watch patterns matches the candidate, in its
/// normalized or compacted form.
pub fn pattern(candidate: &str, patterns: &[Regex], scores: &MethodScores) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }

    let compacted = compact(candidate);
    if patterns
        .iter()
        .any(|re| re.is_match(candidate) || re.is_match(&compacted))
    {
        scores.pattern
    } else {
        0.0
    }
}

/// Common brand variations of the protected mark: `my` + mark, mark + `hub`, ...
pub fn variation(candidate: &str, protected: &str, scores: &MethodScores) -> f64 {
    let (candidate, protected) = (compact(candidate), compact(protected));
    if candidate.is_empty() || protected.is_empty() {
        return 0.0;
    }

    let variations = VARIATION_PREFIXES
        .iter()
        .map(|p| format!("{p}{protected}"))
        .chain(VARIATION_SUFFIXES.iter().map(|s| format!("{protected}{s}")));

    let mut best = 0.0;
    for variant in variations {
        if candidate == variant {
            return scores.variation_exact;
        }
        if candidate.starts_with(&variant) || candidate.ends_with(&variant) {
            best = scores.variation_partial;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    fn scores() -> MethodScores {
        MethodScores::default()
    }

    #[test]
    fn test_exact() {
        assert_eq!(exact("topo", "topo"), 100.0);
        assert_eq!(exact("topos", "topo"), 0.0);
        assert_eq!(exact("", ""), 0.0);
    }

    #[test]
    fn test_prefix_forward_and_reverse() {
        assert_eq!(prefix("topocorp", "topo", &scores()), 85.0);
        assert_eq!(prefix("topo corp", "topo", &scores()), 85.0);
        // short candidate that begins the protected mark
        assert_eq!(prefix("topolog", "topology", &scores()), 85.0);
        // too short for the reverse direction
        assert_eq!(prefix("top", "topology", &scores()), 0.0);
        assert_eq!(prefix("mytopo", "topo", &scores()), 0.0);
        assert_eq!(prefix("", "topo", &scores()), 0.0);
    }

    #[test]
    fn test_suffix_and_contains() {
        assert_eq!(suffix("mytopo", "topo", &scores()), 80.0);
        assert_eq!(suffix("topomap", "topo", &scores()), 0.0);
        assert_eq!(contains("getopomaps", "topo", &scores()), 70.0);
        assert_eq!(contains("tpoo", "topo", &scores()), 0.0);
        assert_eq!(contains("anything", "", &scores()), 0.0);
    }

    #[test]
    fn test_edit_distance_ratio() {
        assert_eq!(edit_distance_ratio("topo", "topo"), 100.0);
        assert_eq!(edit_distance_ratio("topo", "tupo"), 75.0);
        assert_eq!(
            edit_distance_ratio("topology", "topologee"),
            edit_distance_ratio("topologee", "topology")
        );
        assert_eq!(edit_distance_ratio("", "topo"), 0.0);
        assert_eq!(edit_distance_ratio("topo", ""), 0.0);
        assert_eq!(edit_distance_ratio("", ""), 0.0);
    }

    #[test]
    fn test_edit_distance_floor() {
        // 4 of 8 characters differ: ratio 50, below the floor
        assert_eq!(edit_distance("topocorp", "topo", &scores()), 0.0);
        assert_eq!(edit_distance("tupo", "topo", &scores()), 75.0);
    }

    #[test]
    fn test_phonetic() {
        assert_eq!(phonetic("topologee", "topology", &scores()), 75.0);
        assert_eq!(phonetic("fone", "phone", &scores()), 75.0);
        assert_eq!(phonetic("zenith", "topo", &scores()), 0.0);
        assert_eq!(phonetic("", "", &scores()), 0.0);
    }

    #[test]
    fn test_pattern() {
        let patterns = vec![RegexBuilder::new("^TOPO")
            .case_insensitive(true)
            .build()
            .unwrap()];
        assert_eq!(pattern("topomaps", &patterns, &scores()), 75.0);
        assert_eq!(pattern("maps topo", &patterns, &scores()), 0.0);
        assert_eq!(pattern("topomaps", &[], &scores()), 0.0);
        assert_eq!(pattern("", &patterns, &scores()), 0.0);
    }

    #[test]
    fn test_pattern_sees_compacted_candidate() {
        let patterns = vec![Regex::new("topo.*logy").unwrap()];
        assert_eq!(pattern("topo lo gy", &patterns, &scores()), 75.0);
    }

    #[test]
    fn test_variation() {
        assert_eq!(variation("mytopo", "topo", &scores()), 80.0);
        assert_eq!(variation("topohub", "topo", &scores()), 80.0);
        assert_eq!(variation("mytopomaps", "topo", &scores()), 70.0);
        assert_eq!(variation("zenith", "topo", &scores()), 0.0);
    }
}
