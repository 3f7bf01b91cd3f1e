use std::collections::BTreeMap;

use crate::config::MethodScores;
use crate::models::{Method, ProtectedMark, SimilarityResult};
use crate::similarity::normalize::normalize;
use crate::similarity::primitives;

/// Score a candidate mark against one protected mark.
///
/// Every primitive runs and is recorded; the mark score is the maximum of them,
/// never a sum. Ties go to the earliest method in [`Method::ALL`].
pub fn combine(candidate: &str, mark: &ProtectedMark, scores: &MethodScores) -> SimilarityResult {
    let candidate = normalize(candidate);
    let protected = mark.normalized.as_str();

    let mut method_scores = BTreeMap::new();
    let mut score = 0.0;
    let mut best_method = None;

    for method in Method::ALL {
        let value = match method {
            Method::Exact => primitives::exact(&candidate, protected),
            Method::Prefix => primitives::prefix(&candidate, protected, scores),
            Method::Suffix => primitives::suffix(&candidate, protected, scores),
            Method::Contains => primitives::contains(&candidate, protected, scores),
            Method::EditDistance => primitives::edit_distance(&candidate, protected, scores),
            Method::Phonetic => primitives::phonetic(&candidate, protected, scores),
            Method::Pattern => primitives::pattern(&candidate, &mark.patterns, scores),
            Method::Variation => primitives::variation(&candidate, protected, scores),
        }
        .clamp(0.0, 100.0);

        if value > score {
            score = value;
            best_method = Some(method);
        }
        method_scores.insert(method, value);
    }

    SimilarityResult {
        method_scores,
        score,
        best_method,
    }
}
