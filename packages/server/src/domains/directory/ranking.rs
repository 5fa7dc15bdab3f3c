//! Fair display order for directory cards.
//!
//! Each card gets a fairness score
//!
//! ```text
//! score = (base - exposure_count * exposure_decay + time_bonus) * exposure_weight
//! time_bonus = min(hours since last exposure, max_bonus_hours) * bonus_per_hour
//! ```
//!
//! so cards that were shown less, or rested longer, float up. Premium and
//! regular cards are scored separately and then interleaved two premium to
//! one regular. Ranking is a pure function of its input and `now`.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use super::models::{DirectoryEntry, EntryTier};

/// Tunables for the fairness score and interleave ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    pub base: f64,
    /// Score lost per recorded exposure
    pub exposure_decay: f64,
    /// Score gained per hour since the last exposure
    pub bonus_per_hour: f64,
    /// Resting time beyond this many hours earns nothing extra
    pub max_bonus_hours: f64,
    /// Premium cards emitted per cycle
    pub premium_run: usize,
    /// Regular cards emitted per cycle
    pub regular_run: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            base: 100.0,
            exposure_decay: 0.5,
            bonus_per_hour: 1.0,
            max_bonus_hours: 24.0,
            premium_run: 2,
            regular_run: 1,
        }
    }
}

/// What the ranking needs to know about a card.
pub trait Rankable {
    fn tier(&self) -> EntryTier;
    fn exposure_count(&self) -> i64;
    fn last_exposed_at(&self) -> Option<DateTime<Utc>>;
    fn exposure_weight(&self) -> f64;
}

impl Rankable for DirectoryEntry {
    fn tier(&self) -> EntryTier {
        self.tier
    }

    fn exposure_count(&self) -> i64 {
        self.exposure_count
    }

    fn last_exposed_at(&self) -> Option<DateTime<Utc>> {
        self.last_exposed_at
    }

    fn exposure_weight(&self) -> f64 {
        self.exposure_weight
    }
}

/// Fairness score of one card at `now`.
///
/// A card never exposed is treated as exposed at `now` (no time bonus).
pub fn fairness_score<T: Rankable>(item: &T, now: DateTime<Utc>, config: &RankingConfig) -> f64 {
    let rested_hours = item
        .last_exposed_at()
        .map(|at| (now - at).num_milliseconds() as f64 / 3_600_000.0)
        .unwrap_or(0.0)
        .max(0.0);
    let time_bonus = rested_hours.min(config.max_bonus_hours) * config.bonus_per_hour;

    let score = (config.base - item.exposure_count() as f64 * config.exposure_decay + time_bonus)
        * item.exposure_weight();

    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// Reorder `items` for one rendering pass.
///
/// Nothing is added or dropped. Within a tier, higher scores come first and
/// equal scores keep their input order.
pub fn rank_entries<T: Rankable>(items: Vec<T>, now: DateTime<Utc>, config: &RankingConfig) -> Vec<T> {
    let total = items.len();
    let mut premium = Vec::new();
    let mut regular = Vec::new();

    for item in items {
        let score = fairness_score(&item, now, config);
        match item.tier() {
            EntryTier::Premium => premium.push((score, item)),
            EntryTier::Regular => regular.push((score, item)),
        }
    }

    let premium = sort_by_score(premium);
    let regular = sort_by_score(regular);

    let ranked = interleave(premium, regular, config.premium_run, config.regular_run);
    debug_assert_eq!(ranked.len(), total);
    ranked
}

fn sort_by_score<T>(mut scored: Vec<(f64, T)>) -> VecDeque<T> {
    // `sort_by` is stable, so ties keep input order
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}

/// Emit `premium_run` from the first queue, then `regular_run` from the
/// second, until both are empty. An exhausted side is simply skipped.
fn interleave<T>(
    mut premium: VecDeque<T>,
    mut regular: VecDeque<T>,
    premium_run: usize,
    regular_run: usize,
) -> Vec<T> {
    let premium_run = premium_run.max(1);
    let regular_run = regular_run.max(1);
    let mut out = Vec::with_capacity(premium.len() + regular.len());

    while !premium.is_empty() || !regular.is_empty() {
        for _ in 0..premium_run {
            match premium.pop_front() {
                Some(item) => out.push(item),
                None => break,
            }
        }
        for _ in 0..regular_run {
            match regular.pop_front() {
                Some(item) => out.push(item),
                None => break,
            }
        }
    }

    out
}
