//! Fair-exposure ranking through the public API.
//!
//! Uses a small card type implementing `Rankable` so properties can be
//! checked without building full directory rows.

use chrono::{DateTime, Duration, Utc};
use portal_core::domains::directory::{fairness_score, rank_entries, EntryTier, Rankable, RankingConfig};

#[derive(Debug, Clone, PartialEq)]
struct Card {
    name: &'static str,
    tier: EntryTier,
    exposures: i64,
    last_exposed_at: Option<DateTime<Utc>>,
    weight: f64,
}

impl Rankable for Card {
    fn tier(&self) -> EntryTier {
        self.tier
    }

    fn exposure_count(&self) -> i64 {
        self.exposures
    }

    fn last_exposed_at(&self) -> Option<DateTime<Utc>> {
        self.last_exposed_at
    }

    fn exposure_weight(&self) -> f64 {
        self.weight
    }
}

fn premium(name: &'static str, exposures: i64) -> Card {
    Card {
        name,
        tier: EntryTier::Premium,
        exposures,
        last_exposed_at: None,
        weight: 1.0,
    }
}

fn regular(name: &'static str, exposures: i64) -> Card {
    Card {
        tier: EntryTier::Regular,
        ..premium(name, exposures)
    }
}

fn names(cards: &[Card]) -> Vec<&'static str> {
    cards.iter().map(|c| c.name).collect()
}

#[test]
fn less_exposed_premium_leads_and_regular_follows_two_premium() {
    let now = Utc::now();
    let ranked = rank_entries(
        vec![premium("B", 100), regular("C", 0), premium("A", 0)],
        now,
        &RankingConfig::default(),
    );
    assert_eq!(names(&ranked), vec!["A", "B", "C"]);
}

#[test]
fn interleave_repeats_two_to_one_then_drains() {
    let now = Utc::now();
    let cards = vec![
        premium("p1", 0),
        premium("p2", 1),
        premium("p3", 2),
        premium("p4", 3),
        premium("p5", 4),
        regular("r1", 0),
        regular("r2", 1),
    ];
    let ranked = rank_entries(cards, now, &RankingConfig::default());
    assert_eq!(names(&ranked), vec!["p1", "p2", "r1", "p3", "p4", "r2", "p5"]);
}

#[test]
fn only_premium_cards_are_ordered_by_score() {
    let now = Utc::now();
    let ranked = rank_entries(
        vec![premium("busy", 30), premium("quiet", 0), premium("mid", 10)],
        now,
        &RankingConfig::default(),
    );
    assert_eq!(names(&ranked), vec!["quiet", "mid", "busy"]);
}

#[test]
fn only_regular_cards_are_ordered_by_score() {
    let now = Utc::now();
    let ranked = rank_entries(
        vec![regular("busy", 40), regular("quiet", 2), regular("mid", 10)],
        now,
        &RankingConfig::default(),
    );
    assert_eq!(names(&ranked), vec!["quiet", "mid", "busy"]);
}

#[test]
fn resting_time_bonus_is_capped() {
    let now = Utc::now();
    let config = RankingConfig::default();

    let mut day = regular("day", 0);
    day.last_exposed_at = Some(now - Duration::hours(24));
    let mut week = regular("week", 0);
    week.last_exposed_at = Some(now - Duration::days(7));

    assert_eq!(fairness_score(&day, now, &config), 124.0);
    assert_eq!(fairness_score(&week, now, &config), 124.0);
}

#[test]
fn future_exposure_time_earns_no_bonus() {
    let now = Utc::now();
    let mut skewed = regular("skewed", 0);
    skewed.last_exposed_at = Some(now + Duration::hours(3));

    assert_eq!(fairness_score(&skewed, now, &RankingConfig::default()), 100.0);
}

#[test]
fn weight_scales_the_whole_score() {
    let now = Utc::now();
    let mut boosted = regular("boosted", 100);
    boosted.weight = 2.0;

    // (100 - 50) * 2
    assert_eq!(fairness_score(&boosted, now, &RankingConfig::default()), 100.0);

    let ranked = rank_entries(
        vec![regular("fresh", 20), boosted],
        now,
        &RankingConfig::default(),
    );
    assert_eq!(names(&ranked), vec!["boosted", "fresh"]);
}

#[test]
fn ranking_is_a_permutation() {
    let now = Utc::now();
    let cards: Vec<Card> = (0..20)
        .map(|i| {
            let name: &'static str = Box::leak(format!("c{i}").into_boxed_str());
            if i % 3 == 0 {
                premium(name, i)
            } else {
                regular(name, 20 - i)
            }
        })
        .collect();

    let ranked = rank_entries(cards.clone(), now, &RankingConfig::default());

    assert_eq!(ranked.len(), cards.len());
    let mut before = names(&cards);
    let mut after = names(&ranked);
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn reranking_unchanged_input_is_stable() {
    let now = Utc::now();
    let config = RankingConfig::default();
    let cards = vec![
        premium("a", 3),
        regular("b", 3),
        premium("c", 3),
        regular("d", 0),
        premium("e", 1),
    ];

    let once = rank_entries(cards, now, &config);
    let twice = rank_entries(once.clone(), now, &config);
    assert_eq!(once, twice);
}

#[test]
fn custom_run_lengths() {
    let now = Utc::now();
    let config = RankingConfig {
        premium_run: 1,
        regular_run: 2,
        ..RankingConfig::default()
    };
    let ranked = rank_entries(
        vec![
            premium("p1", 0),
            premium("p2", 1),
            regular("r1", 0),
            regular("r2", 1),
            regular("r3", 2),
        ],
        now,
        &config,
    );
    assert_eq!(names(&ranked), vec!["p1", "r1", "r2", "p2", "r3"]);
}

/// Cards for a generated mix, exposures spread deterministically by `seed`.
fn mix(premiums: usize, regulars: usize, seed: usize) -> Vec<Card> {
    let name = |prefix: &str, i: usize| -> &'static str {
        Box::leak(format!("{prefix}{seed}-{i}").into_boxed_str())
    };
    let mut cards: Vec<Card> = (0..premiums)
        .map(|i| premium(name("p", i), ((seed * 37 + i * 11) % 50) as i64))
        .chain((0..regulars).map(|i| regular(name("r", i), ((seed * 13 + i * 7) % 50) as i64)))
        .collect();
    // Rotate so premium cards are not always first in the input
    cards.rotate_left(seed % (premiums + regulars).max(1));
    cards
}

#[test]
fn generated_mixes_keep_two_to_one_until_a_tier_runs_out() {
    let now = Utc::now();
    let config = RankingConfig::default();

    for premiums in 0..=7 {
        for regulars in 0..=7 {
            let seed = premiums * 8 + regulars;
            let ranked = rank_entries(mix(premiums, regulars, seed), now, &config);
            let tiers: Vec<EntryTier> = ranked.iter().map(|c| c.tier).collect();

            assert_eq!(tiers.iter().filter(|t| **t == EntryTier::Premium).count(), premiums);
            assert_eq!(tiers.iter().filter(|t| **t == EntryTier::Regular).count(), regulars);

            // Prefix in which both tiers still have cards left to place
            let (mut seen_p, mut seen_r) = (0, 0);
            let mut both_left = 0;
            for tier in &tiers {
                match tier {
                    EntryTier::Premium => seen_p += 1,
                    EntryTier::Regular => seen_r += 1,
                }
                both_left += 1;
                if seen_p == premiums || seen_r == regulars {
                    break;
                }
            }

            for window in tiers[..both_left].windows(3) {
                let p = window.iter().filter(|t| **t == EntryTier::Premium).count();
                assert!(p <= 2, "{premiums}p/{regulars}r: {window:?}");
                assert!(3 - p <= 1, "{premiums}p/{regulars}r: {window:?}");
            }

            for tier in [EntryTier::Premium, EntryTier::Regular] {
                let scores: Vec<f64> = ranked
                    .iter()
                    .filter(|c| c.tier == tier)
                    .map(|c| fairness_score(c, now, &config))
                    .collect();
                assert!(
                    scores.windows(2).all(|w| w[0] >= w[1]),
                    "{premiums}p/{regulars}r {tier:?} not descending: {scores:?}"
                );
            }
        }
    }
}
