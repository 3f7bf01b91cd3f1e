use std::collections::BTreeSet;

use crate::config::{PriorityKeyword, ScoringConfig};
use crate::models::{FilingRecord, ProtectedMark, Relevance};
use crate::similarity::normalize::normalize;

/// Commercial-context relevance of a filing to one protected mark, in `0..=100`.
///
/// - Class score: 0 unless the filing touches a monitored class, otherwise the
///   share of the mark's classes the filing also covers (a mark without classes
///   is measured against the monitored classes instead).
/// - Keyword boost: `keyword_boost` per distinct priority keyword found at a
///   word start in the goods/services text (singular or plural), capped at
///   `keyword_boost_cap`.
pub fn relevance(
    filing: &FilingRecord,
    mark: &ProtectedMark,
    monitored_classes: &BTreeSet<u32>,
    priority_keywords: &[PriorityKeyword],
    scoring: &ScoringConfig,
) -> Relevance {
    let in_monitored = filing.classes.iter().any(|c| monitored_classes.contains(c));

    let reference = if mark.classes.is_empty() {
        monitored_classes
    } else {
        &mark.classes
    };

    let matched_classes: BTreeSet<u32> = filing.classes.intersection(reference).copied().collect();

    let class_score = if in_monitored && !reference.is_empty() {
        100.0 * matched_classes.len() as f64 / reference.len() as f64
    } else {
        0.0
    };

    let matched_keywords = matching_keywords(&filing.goods_services, priority_keywords);
    let boost = (matched_keywords.len() as f64 * scoring.keyword_boost).min(scoring.keyword_boost_cap);

    Relevance {
        score: (class_score + boost).clamp(0.0, 100.0),
        matched_classes,
        matched_keywords,
    }
}

fn matching_keywords(goods_services: &str, keywords: &[PriorityKeyword]) -> Vec<String> {
    let text = normalize(goods_services);
    if text.is_empty() {
        return Vec::new();
    }

    keywords
        .iter()
        .filter(|k| k.matcher.is_match(&text))
        .map(|k| k.term.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Watchlist};

    fn filing(classes: &[u32], goods: &str) -> FilingRecord {
        FilingRecord {
            serial_number: "90000001".to_string(),
            mark_text: "TOPOCORP".to_string(),
            classes: classes.iter().copied().collect(),
            goods_services: goods.to_string(),
            ..FilingRecord::default()
        }
    }

    fn score(filing: &FilingRecord) -> Relevance {
        let watchlist = Watchlist::from_config(&Config::default()).unwrap();
        relevance(
            filing,
            &watchlist.marks[0],
            &watchlist.monitored_classes,
            &watchlist.priority_keywords,
            &watchlist.scoring,
        )
    }

    #[test]
    fn test_half_class_overlap_with_keywords() {
        let result = score(&filing(&[9], "mobile social app"));
        assert_eq!(result.score, 70.0);
        assert_eq!(result.matched_classes, BTreeSet::from([9]));
        assert_eq!(result.matched_keywords, vec!["mobile", "app", "social"]);
    }

    #[test]
    fn test_full_overlap_without_keywords() {
        let result = score(&filing(&[9, 42], "hardware tools"));
        assert_eq!(result.score, 100.0);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_unmonitored_class_scores_zero() {
        let result = score(&filing(&[25], "clothing, namely shirts"));
        assert_eq!(result.score, 0.0);
        assert!(result.matched_classes.is_empty());
    }

    #[test]
    fn test_keywords_count_without_class_overlap() {
        let result = score(&filing(&[25], "Downloadable software"));
        assert_eq!(result.score, 20.0);
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        // "app" must not match inside "apparel"
        let result = score(&filing(&[25], "apparel and applesauce"));
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_plural_goods_wording_counts() {
        let result = score(&filing(&[9], "Mobile applications; downloadable apps"));
        assert_eq!(result.matched_keywords, vec!["mobile", "application", "app", "downloadable"]);
        assert_eq!(result.score, 70.0);
    }

    #[test]
    fn test_mobile_applications_scenario() {
        let result = score(&filing(&[9], "Mobile applications"));
        assert_eq!(result.matched_keywords, vec!["mobile", "application"]);
        assert_eq!(result.score, 70.0);
    }

    #[test]
    fn test_clamped_to_100() {
        let result = score(&filing(&[9, 42], "mobile software platform"));
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_empty_fields_degrade_to_zero() {
        let result = score(&filing(&[], ""));
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_mark_without_classes_uses_monitored() {
        let mut watchlist = Watchlist::from_config(&Config::default()).unwrap();
        watchlist.marks[0].classes.clear();
        let result = relevance(
            &filing(&[42], ""),
            &watchlist.marks[0],
            &watchlist.monitored_classes,
            &watchlist.priority_keywords,
            &watchlist.scoring,
        );
        assert_eq!(result.score, 50.0);
    }
}
