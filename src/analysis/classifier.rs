//! Two-round plurality vote over the collected evidence
//!
//! Round one awards a point to the framework with strictly the most references,
//! round two to the one with strictly the highest asset score. A tie for first
//! place awards nothing. The framework holding strictly the most points wins;
//! anything else is reported as unknown.

use super::evidence::Evidence;
use super::framework::{FrameworkId, PlatformLabel};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The key whose value is strictly greater than every other value
///
/// Returns `None` for an empty input or a tie at the top.
pub fn strict_leader<K, V, I>(values: I) -> Option<K>
where
    I: IntoIterator<Item = (K, V)>,
    V: PartialOrd,
{
    let mut best: Option<(K, V)> = None;
    let mut tied = false;

    for (key, value) in values {
        let ordering = match &best {
            None => Some(Ordering::Greater),
            Some((_, top)) => value.partial_cmp(top),
        };

        match ordering {
            Some(Ordering::Greater) => {
                best = Some((key, value));
                tied = false;
            }
            Some(Ordering::Equal) => tied = true,
            _ => {}
        }
    }

    if tied {
        None
    } else {
        best.map(|(key, _)| key)
    }
}

/// Points per framework after both rounds
pub fn tally(evidence: &Evidence) -> BTreeMap<FrameworkId, u32> {
    let mut points: BTreeMap<FrameworkId, u32> = evidence.iter().map(|(id, _)| (id, 0)).collect();

    let rounds = [
        strict_leader(evidence.iter().map(|(id, v)| (id, v.references))),
        strict_leader(evidence.iter().map(|(id, v)| (id, v.asset_score))),
    ];

    for winner in rounds.into_iter().flatten() {
        *points.entry(winner).or_insert(0) += 1;
    }

    points
}

pub fn classify(evidence: &Evidence) -> PlatformLabel {
    strict_leader(tally(evidence))
        .map(PlatformLabel::from)
        .unwrap_or(PlatformLabel::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::evidence::EvidenceVector;
    use yare::parameterized;

    fn evidence(react: (u64, f64), flutter: (u64, f64), cordova: (u64, f64)) -> Evidence {
        [
            (FrameworkId::React, react),
            (FrameworkId::Flutter, flutter),
            (FrameworkId::Cordova, cordova),
        ]
        .into_iter()
        .map(|(id, (references, asset_score))| {
            (
                id,
                EvidenceVector {
                    references,
                    asset_score,
                },
            )
        })
        .collect()
    }

    #[parameterized(
        flutter_engine_only = { (0, 0.0), (5, 83.33), (0, 0.0), PlatformLabel::Flutter },
        react_both_rounds = { (40, 100.0), (2, 0.0), (0, 0.0), PlatformLabel::React },
        cordova_references_only = { (0, 0.0), (0, 0.0), (7, 0.0), PlatformLabel::Cordova },
        cordova_assets_only = { (0, 0.0), (0, 0.0), (0, 7.69), PlatformLabel::Cordova },
        all_equal = { (3, 50.0), (3, 50.0), (3, 50.0), PlatformLabel::Unknown },
        all_zero = { (0, 0.0), (0, 0.0), (0, 0.0), PlatformLabel::Unknown },
        split_rounds = { (9, 0.0), (0, 100.0), (0, 0.0), PlatformLabel::Unknown },
        reference_tie_asset_winner = { (4, 0.0), (4, 83.33), (0, 0.0), PlatformLabel::Flutter },
        both_rounds_tied = { (4, 100.0), (4, 100.0), (0, 0.0), PlatformLabel::Unknown },
    )]
    fn test_classify(react: (u64, f64), flutter: (u64, f64), cordova: (u64, f64), expected: PlatformLabel) {
        assert_eq!(classify(&evidence(react, flutter, cordova)), expected);
    }

    #[test]
    fn test_strict_leader() {
        assert_eq!(strict_leader([("a", 1), ("b", 3), ("c", 2)]), Some("b"));
        assert_eq!(strict_leader([("a", 3), ("b", 3), ("c", 2)]), None);
        assert_eq!(strict_leader([("a", 1), ("b", 3), ("c", 3)]), None);
        assert_eq!(strict_leader([("a", 3), ("b", 3), ("c", 5)]), Some("c"));
        assert_eq!(strict_leader(Vec::<(&str, u32)>::new()), None);
        assert_eq!(strict_leader([("only", 0)]), Some("only"));
    }

    #[test]
    fn test_tally_split_rounds() {
        let points = tally(&evidence((9, 0.0), (0, 100.0), (0, 0.0)));
        assert_eq!(points[&FrameworkId::React], 1);
        assert_eq!(points[&FrameworkId::Flutter], 1);
        assert_eq!(points[&FrameworkId::Cordova], 0);
    }

    #[test]
    fn test_classify_is_pure() {
        let e = evidence((1, 10.0), (0, 0.0), (0, 0.0));
        assert_eq!(classify(&e), classify(&e));
        assert_eq!(classify(&e), PlatformLabel::React);
    }
}
