//! Greedy conflict resolution
//!
//! Candidates are ranked by score, then span length, then start offset. The
//! sort is stable, so candidates equal on all three keep their input order
//! (registry order, then emission order). Each candidate is accepted unless
//! it overlaps an already accepted span. Overlapping spans are never merged.
//!
//! Accepted spans are disjoint and keyed by start, so only the nearest
//! accepted span starting before a candidate's end can overlap it.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use fz152_common::privacy::patterns::RecognitionResult;

fn rank(a: &RecognitionResult, b: &RecognitionResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| a.start.cmp(&b.start))
}

/// Non-overlapping subset of `candidates`, sorted by start ascending.
/// Empty spans are dropped.
pub fn resolve_conflicts(mut candidates: Vec<RecognitionResult>) -> Vec<RecognitionResult> {
    candidates.sort_by(rank);

    let mut accepted: BTreeMap<usize, RecognitionResult> = BTreeMap::new();
    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }
        let blocked = accepted
            .range(..candidate.end)
            .next_back()
            .is_some_and(|(_, kept)| kept.overlaps_with(&candidate));
        if !blocked {
            accepted.insert(candidate.start, candidate);
        }
    }

    accepted.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fz152_common::privacy::patterns::EntityType;

    fn result(entity: EntityType, start: usize, end: usize, score: f64) -> RecognitionResult {
        RecognitionResult::new(entity, start, end, score)
    }

    /// Validates `resolve_conflicts` behavior for the priority scenario.
    ///
    /// Assertions:
    /// - Confirms only the 0.9 candidate survives an overlap with 0.6.
    #[test]
    fn test_higher_score_wins() {
        let resolved = resolve_conflicts(vec![
            result(EntityType::Cvv, 0, 4, 0.6),
            result(EntityType::RuInn, 0, 10, 0.9),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entity_type, EntityType::RuInn);
    }

    #[test]
    fn test_longer_span_breaks_score_tie() {
        let resolved = resolve_conflicts(vec![
            result(EntityType::Cvv, 5, 8, 0.6),
            result(EntityType::EmeImei, 0, 15, 0.6),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entity_type, EntityType::EmeImei);
    }

    #[test]
    fn test_earlier_start_breaks_length_tie() {
        let resolved = resolve_conflicts(vec![
            result(EntityType::Cvv, 2, 5, 0.6),
            result(EntityType::RuOms, 0, 3, 0.6),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entity_type, EntityType::RuOms);
    }

    /// Validates `resolve_conflicts` behavior for the complete tie scenario.
    ///
    /// Assertions:
    /// - Confirms the candidate seen first is kept.
    #[test]
    fn test_complete_tie_keeps_input_order() {
        let resolved = resolve_conflicts(vec![
            result(EntityType::RuPassport, 0, 11, 0.85),
            result(EntityType::RuDriverLicense, 0, 11, 0.85),
        ]);
        assert_eq!(resolved[0].entity_type, EntityType::RuPassport);

        let reversed = resolve_conflicts(vec![
            result(EntityType::RuDriverLicense, 0, 11, 0.85),
            result(EntityType::RuPassport, 0, 11, 0.85),
        ]);
        assert_eq!(reversed[0].entity_type, EntityType::RuDriverLicense);
    }

    #[test]
    fn test_adjacent_spans_both_kept_and_sorted() {
        let resolved = resolve_conflicts(vec![
            result(EntityType::Cvv, 4, 8, 0.5),
            result(EntityType::Cvv, 0, 4, 0.9),
            result(EntityType::Cvv, 20, 24, 0.7),
        ]);
        let starts: Vec<usize> = resolved.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0, 4, 20]);
    }

    #[test]
    fn test_no_merging() {
        let resolved = resolve_conflicts(vec![
            result(EntityType::Cvv, 0, 5, 0.9),
            result(EntityType::Cvv, 3, 9, 0.8),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!((resolved[0].start, resolved[0].end), (0, 5));
    }

    /// Validates `resolve_conflicts` behavior for the large disjoint input
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms 100k disjoint candidates are all kept, in start order.
    /// - Ensures resolution finishes well within a time bound.
    #[test]
    fn test_many_disjoint_candidates_resolve_quickly() {
        let candidates: Vec<RecognitionResult> = (0..100_000)
            .rev()
            .map(|i| result(EntityType::Cvv, i * 4, i * 4 + 3, 0.6))
            .collect();

        let started = std::time::Instant::now();
        let resolved = resolve_conflicts(candidates);
        assert!(started.elapsed() < std::time::Duration::from_secs(5), "{:?}", started.elapsed());

        assert_eq!(resolved.len(), 100_000);
        assert!(resolved.windows(2).all(|pair| pair[0].end < pair[1].start));
    }

    /// Validates `resolve_conflicts` behavior for the neighbour overlap
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms a candidate spanning two accepted spans is rejected.
    /// - Confirms a candidate in the gap between them is kept.
    #[test]
    fn test_overlap_checked_against_neighbours() {
        let resolved = resolve_conflicts(vec![
            result(EntityType::RuInn, 0, 10, 0.9),
            result(EntityType::RuInn, 20, 30, 0.9),
            result(EntityType::Cvv, 8, 22, 0.8),
            result(EntityType::Cvv, 12, 15, 0.7),
            result(EntityType::Cvv, 29, 40, 0.6),
        ]);
        let spans: Vec<(usize, usize)> = resolved.iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(spans, vec![(0, 10), (12, 15), (20, 30)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve_conflicts(Vec::new()).is_empty());
    }
}
