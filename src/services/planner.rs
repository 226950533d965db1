use thiserror::Error;

use crate::models::{Friend, SlotTag, WatchTimeSuggestion};

/// Most suggestions returned for one roster snapshot
const MAX_SUGGESTIONS: usize = 3;

/// Share of the roster that triggers the secondary weekend-evening
/// suggestion on the fallback path
const WEEKEND_EVENING_THRESHOLD: f64 = 0.70;
/// Share of the roster that triggers the tertiary weekday-evening
/// suggestion on the fallback path
const WEEKDAY_EVENING_THRESHOLD: f64 = 0.60;

/// Errors from the watch-time scorer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlannerError {
    #[error("No friends with a name and at least one selected time slot")]
    NoQualifyingFriends,
}

/// Slots that can produce a perfect-match suggestion, with their fixed
/// confidence scores and rationales
const PERFECT_MATCHES: [(SlotTag, u8, &str); 3] = [
    (
        SlotTag::WeekendEvening,
        95,
        "Everyone is free on weekend evenings",
    ),
    (
        SlotTag::WeekendAfternoon,
        85,
        "Everyone is free on weekend afternoons",
    ),
    (
        SlotTag::WeekdayEvening,
        80,
        "Everyone is free on weekday evenings",
    ),
];

/// Scores candidate watch times for a group of friends.
///
/// Pure and synchronous: the same roster snapshot always produces the same
/// ranked suggestions. Friends without a name or without any selected slot
/// are ignored; if nobody qualifies the call fails rather than returning
/// an empty list.
///
/// When every qualifying friend shares one of the three headline slots, a
/// fixed high-confidence suggestion is emitted per shared slot. Otherwise
/// the best-attended slot wins with `round(count / total * 100)` percent
/// confidence, plus extra weekend/weekday-evening suggestions when those
/// slots clear their attendance thresholds.
pub fn suggest_watch_times(friends: &[Friend]) -> Result<Vec<WatchTimeSuggestion>, PlannerError> {
    let qualifying: Vec<&Friend> = friends.iter().filter(|f| f.qualifies()).collect();
    let total = qualifying.len();
    if total == 0 {
        return Err(PlannerError::NoQualifyingFriends);
    }

    let counts = tally_slots(&qualifying);

    let mut suggestions: Vec<WatchTimeSuggestion> = Vec::new();

    for (slot, confidence, reason) in PERFECT_MATCHES {
        if count_for(&counts, slot) == total {
            suggestions.push(WatchTimeSuggestion {
                time: slot.display_time().to_string(),
                confidence,
                participants: total,
                reason: reason.to_string(),
            });
        }
    }

    if suggestions.is_empty() {
        // Ties go to the first-declared slot, so only a strictly greater
        // count displaces the current best.
        let mut best_slot = SlotTag::ALL[0];
        let mut best_count = count_for(&counts, best_slot);
        for &slot in &SlotTag::ALL[1..] {
            let count = count_for(&counts, slot);
            if count > best_count {
                best_slot = slot;
                best_count = count;
            }
        }

        suggestions.push(fallback_suggestion(best_slot, best_count, total));

        let weekend_evening = count_for(&counts, SlotTag::WeekendEvening);
        if weekend_evening as f64 >= total as f64 * WEEKEND_EVENING_THRESHOLD {
            suggestions.push(fallback_suggestion(
                SlotTag::WeekendEvening,
                weekend_evening,
                total,
            ));
        }

        let weekday_evening = count_for(&counts, SlotTag::WeekdayEvening);
        if weekday_evening as f64 >= total as f64 * WEEKDAY_EVENING_THRESHOLD {
            suggestions.push(fallback_suggestion(
                SlotTag::WeekdayEvening,
                weekday_evening,
                total,
            ));
        }

        // A zero-attendance "best" slot is unreachable while qualifying
        // friends must select at least one tag, but the guard keeps the
        // output sane if that filter is ever loosened.
        suggestions.retain(|s| s.confidence > 0);
    }

    suggestions.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    suggestions.truncate(MAX_SUGGESTIONS);

    Ok(suggestions)
}

/// Per-slot attendance over qualifying friends, indexed by declaration order
fn tally_slots(qualifying: &[&Friend]) -> [usize; SlotTag::ALL.len()] {
    let mut counts = [0usize; SlotTag::ALL.len()];
    for friend in qualifying {
        for (i, slot) in SlotTag::ALL.iter().enumerate() {
            if friend.availability.contains(slot) {
                counts[i] += 1;
            }
        }
    }
    counts
}

fn count_for(counts: &[usize; SlotTag::ALL.len()], slot: SlotTag) -> usize {
    let index = SlotTag::ALL
        .iter()
        .position(|&s| s == slot)
        .expect("slot is a member of SlotTag::ALL");
    counts[index]
}

fn fallback_suggestion(slot: SlotTag, count: usize, total: usize) -> WatchTimeSuggestion {
    WatchTimeSuggestion {
        time: slot.display_time().to_string(),
        confidence: percentage(count, total),
        participants: count,
        reason: format!("{} of {} friends are free on {}", count, total, slot.label()),
    }
}

fn percentage(count: usize, total: usize) -> u8 {
    (count as f64 / total as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timezone;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn friend(name: &str, slots: &[SlotTag]) -> Friend {
        Friend {
            id: Uuid::new_v4(),
            name: name.to_string(),
            timezone: Timezone::Est,
            availability: slots.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_all_share_weekend_evening() {
        let friends = vec![
            friend("Ana", &[SlotTag::WeekendEvening]),
            friend("Ben", &[SlotTag::WeekendEvening]),
        ];
        let suggestions = suggest_watch_times(&friends).unwrap();

        assert_eq!(suggestions[0].time, "Saturday, 7:00 PM EST");
        assert_eq!(suggestions[0].confidence, 95);
        assert_eq!(suggestions[0].participants, 2);
    }

    #[test]
    fn test_multiple_perfect_matches_ranked() {
        let slots = [SlotTag::WeekendEvening, SlotTag::WeekdayEvening];
        let friends = vec![friend("Ana", &slots), friend("Ben", &slots)];
        let suggestions = suggest_watch_times(&friends).unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].confidence, 95);
        assert_eq!(suggestions[1].confidence, 80);
    }

    #[test]
    fn test_fallback_tie_breaks_on_declaration_order() {
        // One friend free weekday evenings, one free weekend afternoons:
        // no perfect match, both slots at count 1, weekday_evening is
        // declared first.
        let friends = vec![
            friend("Ana", &[SlotTag::WeekdayEvening]),
            friend("Ben", &[SlotTag::WeekendAfternoon]),
        ];
        let suggestions = suggest_watch_times(&friends).unwrap();

        assert_eq!(suggestions[0].time, SlotTag::WeekdayEvening.display_time());
        assert_eq!(suggestions[0].confidence, 50);
        assert_eq!(suggestions[0].participants, 1);
    }

    #[test]
    fn test_no_qualifying_friends_is_an_error() {
        assert_eq!(
            suggest_watch_times(&[]),
            Err(PlannerError::NoQualifyingFriends)
        );

        // A name without slots and slots without a name both fail to qualify.
        let unnamed = friend("", &[SlotTag::WeekendLate]);
        let empty = friend("Ana", &[]);
        assert_eq!(
            suggest_watch_times(&[unnamed, empty]),
            Err(PlannerError::NoQualifyingFriends)
        );
    }

    #[test]
    fn test_whitespace_name_does_not_qualify() {
        let friends = vec![friend("   ", &[SlotTag::WeekendEvening])];
        assert_eq!(
            suggest_watch_times(&friends),
            Err(PlannerError::NoQualifyingFriends)
        );
    }

    #[test]
    fn test_secondary_threshold_not_triggered_below_seventy_percent() {
        // Two of three share weekend_evening: 67% < 70%, so only the
        // primary fallback suggestion appears.
        let friends = vec![
            friend("Ana", &[SlotTag::WeekendEvening]),
            friend("Ben", &[SlotTag::WeekendEvening]),
            friend("Cleo", &[SlotTag::WeekdayLate]),
        ];
        let suggestions = suggest_watch_times(&friends).unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].time, SlotTag::WeekendEvening.display_time());
        assert_eq!(suggestions[0].confidence, 67);
        assert_eq!(suggestions[0].participants, 2);
    }

    #[test]
    fn test_secondary_weekend_evening_duplicates_primary() {
        // Three of four share weekend_evening (75% >= 70%) but one holdout
        // blocks the perfect match. The slot wins the primary fallback AND
        // triggers the secondary rule; duplicates are kept.
        let friends = vec![
            friend("Ana", &[SlotTag::WeekendEvening]),
            friend("Ben", &[SlotTag::WeekendEvening]),
            friend("Cleo", &[SlotTag::WeekendEvening]),
            friend("Dia", &[SlotTag::WeekdayLate]),
        ];
        let suggestions = suggest_watch_times(&friends).unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].time, SlotTag::WeekendEvening.display_time());
        assert_eq!(suggestions[1].time, SlotTag::WeekendEvening.display_time());
        assert_eq!(suggestions[0].confidence, 75);
        assert_eq!(suggestions[1].confidence, 75);
    }

    #[test]
    fn test_tertiary_weekday_evening_threshold() {
        // Three of five on weekday_evening (60%) triggers the tertiary
        // rule; four of five on weekend_late wins the primary fallback.
        let friends = vec![
            friend("Ana", &[SlotTag::WeekdayEvening, SlotTag::WeekendLate]),
            friend("Ben", &[SlotTag::WeekdayEvening, SlotTag::WeekendLate]),
            friend("Cleo", &[SlotTag::WeekdayEvening, SlotTag::WeekendLate]),
            friend("Dia", &[SlotTag::WeekendLate]),
            friend("Eli", &[SlotTag::WeekdayLate]),
        ];
        let suggestions = suggest_watch_times(&friends).unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].time, SlotTag::WeekendLate.display_time());
        assert_eq!(suggestions[0].confidence, 80);
        assert_eq!(suggestions[1].time, SlotTag::WeekdayEvening.display_time());
        assert_eq!(suggestions[1].confidence, 60);
    }

    #[test]
    fn test_output_sorted_and_capped() {
        // No headline slot is unanimous, so all three fallback rules fire:
        // weekend_late primary (4/4), weekend_evening secondary (3/4),
        // weekday_evening tertiary (3/4).
        let friends = vec![
            friend(
                "Ana",
                &[SlotTag::WeekendLate, SlotTag::WeekendEvening, SlotTag::WeekdayEvening],
            ),
            friend(
                "Ben",
                &[SlotTag::WeekendLate, SlotTag::WeekendEvening, SlotTag::WeekdayEvening],
            ),
            friend(
                "Cleo",
                &[SlotTag::WeekendLate, SlotTag::WeekendEvening, SlotTag::WeekdayEvening],
            ),
            friend("Dia", &[SlotTag::WeekendLate]),
        ];
        let suggestions = suggest_watch_times(&friends).unwrap();

        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].confidence, 100);
        for pair in suggestions.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
        for suggestion in &suggestions {
            assert!(suggestion.participants <= friends.len());
        }
    }

    #[test]
    fn test_scorer_is_deterministic() {
        let friends = vec![
            friend("Ana", &[SlotTag::WeekendEvening, SlotTag::WeekdayLate]),
            friend("Ben", &[SlotTag::WeekendAfternoon]),
            friend("Cleo", &[SlotTag::WeekendEvening]),
        ];
        let first = suggest_watch_times(&friends).unwrap();
        let second = suggest_watch_times(&friends).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_qualifying_friends_excluded_from_totals() {
        let friends = vec![
            friend("Ana", &[SlotTag::WeekendEvening]),
            friend("Ben", &[SlotTag::WeekendEvening]),
            friend("", &[SlotTag::WeekdayLate]),
            friend("Dia", &[]),
        ];
        let suggestions = suggest_watch_times(&friends).unwrap();

        // Both qualifying friends share weekend_evening: perfect match
        // against a total of 2, not 4.
        assert_eq!(suggestions[0].confidence, 95);
        assert_eq!(suggestions[0].participants, 2);
    }
}
