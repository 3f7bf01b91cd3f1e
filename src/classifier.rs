use crate::config::{ScoringConfig, Watchlist};
use crate::models::{ConflictFinding, FilingRecord, ProtectedMark, ReviewStatus, Severity};
use crate::relevance::relevance;
use crate::similarity::combiner::combine;

/// Classify one filing against one protected mark.
///
/// Returns `None` when the blended score falls below `min_score`, or when the
/// filing is one of the protected mark's own applications. Never fails: empty or
/// missing filing fields only drag the scores toward 0.
pub fn classify(
    filing: &FilingRecord,
    mark: &ProtectedMark,
    watchlist: &Watchlist,
) -> Option<ConflictFinding> {
    if mark.serial_numbers.contains(&filing.serial_number) {
        return None;
    }
    let scoring = &watchlist.scoring;

    let similarity = combine(&filing.mark_text, mark, &scoring.methods);
    let relevance = relevance(
        filing,
        mark,
        &watchlist.monitored_classes,
        &watchlist.priority_keywords,
        scoring,
    );

    let final_score = final_score(similarity.score, relevance.score, scoring);
    let severity = severity_for(final_score, scoring)?;

    Some(ConflictFinding {
        filing: filing.clone(),
        protected_mark: mark.name.clone(),
        mark_score: similarity.score,
        relevance_score: relevance.score,
        final_score,
        severity,
        best_method: similarity.best_method,
        method_scores: similarity.method_scores,
        matched_classes: relevance.matched_classes,
        matched_keywords: relevance.matched_keywords,
        status: ReviewStatus::New,
    })
}

/// Weighted blend of mark similarity and relevance, clamped and rounded to
/// two decimals.
pub fn final_score(mark_score: f64, relevance_score: f64, scoring: &ScoringConfig) -> f64 {
    let blended = scoring.mark_weight * mark_score + scoring.relevance_weight * relevance_score;
    let clamped = blended.clamp(0.0, 100.0);
    (clamped * 100.0).round() / 100.0
}

/// Severity tier for a final score, or `None` below the flagging threshold.
///
/// Lower bounds are inclusive: `high` and above is High, `medium` up to `high`
/// is Medium, `min_score` up to `medium` is Low.
pub fn severity_for(final_score: f64, scoring: &ScoringConfig) -> Option<Severity> {
    if final_score.is_nan() || final_score < scoring.min_score {
        None
    } else if final_score >= scoring.severity.high {
        Some(Severity::High)
    } else if final_score >= scoring.severity.medium {
        Some(Severity::Medium)
    } else {
        Some(Severity::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Method;

    fn watchlist() -> Watchlist {
        Watchlist::from_config(&Config::default()).unwrap()
    }

    fn filing(mark: &str, classes: &[u32], goods: &str) -> FilingRecord {
        FilingRecord {
            serial_number: "97000001".to_string(),
            mark_text: mark.to_string(),
            filing_date: Some("20260115".to_string()),
            classes: classes.iter().copied().collect(),
            goods_services: goods.to_string(),
            applicant_name: Some("Example Labs LLC".to_string()),
        }
    }

    #[test]
    fn test_severity_boundaries() {
        let scoring = ScoringConfig::default();
        assert_eq!(severity_for(100.0, &scoring), Some(Severity::High));
        assert_eq!(severity_for(85.0, &scoring), Some(Severity::High));
        assert_eq!(severity_for(84.99, &scoring), Some(Severity::Medium));
        assert_eq!(severity_for(75.0, &scoring), Some(Severity::Medium));
        assert_eq!(severity_for(74.99, &scoring), Some(Severity::Low));
        assert_eq!(severity_for(65.0, &scoring), Some(Severity::Low));
        assert_eq!(severity_for(64.99, &scoring), None);
        assert_eq!(severity_for(0.0, &scoring), None);
        assert_eq!(severity_for(f64::NAN, &scoring), None);
    }

    #[test]
    fn test_final_score_blend() {
        let scoring = ScoringConfig::default();
        assert_eq!(final_score(85.0, 70.0, &scoring), 80.5);
        assert_eq!(final_score(100.0, 100.0, &scoring), 100.0);
        assert_eq!(final_score(0.0, 0.0, &scoring), 0.0);
    }

    #[test]
    fn test_topocorp_scenario() {
        let watchlist = watchlist();
        let finding = classify(
            &filing("TOPOCORP", &[9], "mobile social app"),
            &watchlist.marks[0],
            &watchlist,
        )
        .expect("TOPOCORP should be flagged against TOPO");

        assert_eq!(finding.protected_mark, "TOPO");
        assert_eq!(finding.mark_score, 85.0);
        assert_eq!(finding.best_method, Some(Method::Prefix));
        assert_eq!(finding.relevance_score, 70.0);
        assert_eq!(finding.final_score, 80.5);
        assert_eq!(finding.severity, Severity::Medium);
        assert_eq!(finding.status, ReviewStatus::New);
        assert_eq!(finding.method_scores.len(), Method::ALL.len());
    }

    #[test]
    fn test_plural_goods_wording_reaches_medium() {
        let watchlist = watchlist();
        let finding = classify(
            &filing("TOPOCORP", &[9], "Mobile applications"),
            &watchlist.marks[0],
            &watchlist,
        )
        .unwrap();
        assert_eq!(finding.matched_keywords, vec!["mobile", "application"]);
        assert_eq!(finding.relevance_score, 70.0);
        assert_eq!(finding.final_score, 80.5);
        assert_eq!(finding.severity, Severity::Medium);
    }

    #[test]
    fn test_zenith_scenario() {
        let watchlist = watchlist();
        let zenith = filing("ZENITH", &[25], "clothing, namely shirts and hats");
        for mark in &watchlist.marks {
            assert!(classify(&zenith, mark, &watchlist).is_none());
        }
    }

    #[test]
    fn test_topologee_phonetic_scenario() {
        let watchlist = watchlist();
        let finding = classify(
            &filing("TOPOLOGEE", &[9, 42], "software"),
            &watchlist.marks[1],
            &watchlist,
        )
        .expect("phonetic collision should be flagged");

        assert_eq!(finding.method_scores[&Method::Phonetic], 75.0);
        assert!(matches!(finding.severity, Severity::Low | Severity::Medium));
    }

    #[test]
    fn test_exact_match_high() {
        let watchlist = watchlist();
        let finding = classify(&filing("Topo", &[9, 42], ""), &watchlist.marks[0], &watchlist).unwrap();
        assert_eq!(finding.mark_score, 100.0);
        assert_eq!(finding.final_score, 100.0);
        assert_eq!(finding.severity, Severity::High);
    }

    #[test]
    fn test_threshold_boundary_through_classify() {
        // Mark similarity alone, with `contains` worth exactly the threshold.
        let mut config = Config::default();
        config.scoring.mark_weight = 1.0;
        config.scoring.relevance_weight = 0.0;
        config.scoring.methods.contains = 65.0;
        config.marks[0].patterns.clear();
        let watchlist = Watchlist::from_config(&config).unwrap();

        let at_threshold = classify(&filing("GETOPOS", &[], ""), &watchlist.marks[0], &watchlist).unwrap();
        assert_eq!(at_threshold.final_score, 65.0);
        assert_eq!(at_threshold.severity, Severity::Low);
        assert_eq!(at_threshold.best_method, Some(Method::Contains));

        config.scoring.methods.contains = 64.99;
        let watchlist = Watchlist::from_config(&config).unwrap();
        assert!(classify(&filing("GETOPOS", &[], ""), &watchlist.marks[0], &watchlist).is_none());
    }

    #[test]
    fn test_own_application_not_flagged() {
        let watchlist = watchlist();
        let mut own = filing("TOPO", &[9, 42], "software");
        own.serial_number = "99634122".to_string();
        assert!(classify(&own, &watchlist.marks[0], &watchlist).is_none());
        // still compared against the other protected mark
        assert!(classify(&own, &watchlist.marks[1], &watchlist).is_some());
    }

    #[test]
    fn test_malformed_filing_does_not_panic() {
        let watchlist = watchlist();
        let empty = FilingRecord::default();
        for mark in &watchlist.marks {
            assert!(classify(&empty, mark, &watchlist).is_none());
        }
    }

    #[test]
    fn test_weak_signal_filtered_even_with_relevance() {
        let watchlist = watchlist();
        // edit distance to TOPOLOGY is 62.5 and relevance 70: 64.75 < 65
        assert!(classify(
            &filing("TOPOCORP", &[9], "mobile social app"),
            &watchlist.marks[1],
            &watchlist
        )
        .is_none());
    }
}
