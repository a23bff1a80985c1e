use crate::error::{TrainerError, TrainerResult};
use crate::random::RandomSource;
use crate::symbol_stat::SymbolStat;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Weight every symbol gets on top of its error rate
pub const DEFAULT_FLOOR_WEIGHT: f64 = 0.1;

/// Policy deciding which symbol to present next
///
/// Implementations read the stats but never mutate them. Any randomness comes
/// from the `random` source handed in by the caller.
pub trait SelectionStrategy: Send {
    /// Pick one symbol from `stats`, or `None` when `stats` is empty
    fn next_symbol(&self, stats: &[SymbolStat], random: &mut dyn RandomSource) -> Option<char>;

    fn name(&self) -> &'static str;
}

/// Picks symbols with probability proportional to `error_rate + floor`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedRandomStrategy {
    floor: f64,
}

impl Default for WeightedRandomStrategy {
    fn default() -> Self {
        Self {
            floor: DEFAULT_FLOOR_WEIGHT,
        }
    }
}

impl WeightedRandomStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floor(floor: f64) -> TrainerResult<Self> {
        if !floor.is_finite() || floor <= 0.0 {
            return Err(TrainerError::InvalidFloorWeight(floor));
        }
        Ok(Self { floor })
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Selection weight of each stat, in input order
    pub fn weights(&self, stats: &[SymbolStat]) -> Vec<f64> {
        stats
            .iter()
            .map(|stat| stat.error_rate() + self.floor)
            .collect()
    }
}

impl SelectionStrategy for WeightedRandomStrategy {
    fn next_symbol(&self, stats: &[SymbolStat], random: &mut dyn RandomSource) -> Option<char> {
        let last = stats.last()?;

        let weights = self.weights(stats);
        let total_weight: f64 = weights.iter().sum();
        let mut remaining = random.next_unit() * total_weight;

        for (stat, weight) in stats.iter().zip(&weights) {
            remaining -= weight;
            if remaining <= 0.0 {
                return Some(stat.symbol());
            }
        }

        // Rounding in the running subtraction can leave a sliver above zero
        Some(last.symbol())
    }

    fn name(&self) -> &'static str {
        "weighted"
    }
}

/// Every symbol equally likely, ignoring history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformRandomStrategy;

impl SelectionStrategy for UniformRandomStrategy {
    fn next_symbol(&self, stats: &[SymbolStat], random: &mut dyn RandomSource) -> Option<char> {
        if stats.is_empty() {
            return None;
        }
        let idx = ((random.next_unit() * stats.len() as f64) as usize).min(stats.len() - 1);
        Some(stats[idx].symbol())
    }

    fn name(&self) -> &'static str {
        "uniform"
    }
}

/// Deterministically serves the symbol with the fewest attempts, earliest on ties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeastPracticedStrategy;

impl SelectionStrategy for LeastPracticedStrategy {
    fn next_symbol(&self, stats: &[SymbolStat], _random: &mut dyn RandomSource) -> Option<char> {
        stats
            .iter()
            .min_by_key(|stat| stat.attempts())
            .map(SymbolStat::symbol)
    }

    fn name(&self) -> &'static str {
        "least-practiced"
    }
}

/// Strategy choice as it appears on the command line and in the config file
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    Weighted,
    Uniform,
    LeastPracticed,
}

impl StrategyKind {
    pub fn build(self, floor_weight: f64) -> TrainerResult<Box<dyn SelectionStrategy>> {
        Ok(match self {
            StrategyKind::Weighted => Box::new(WeightedRandomStrategy::with_floor(floor_weight)?),
            StrategyKind::Uniform => Box::new(UniformRandomStrategy),
            StrategyKind::LeastPracticed => Box::new(LeastPracticedStrategy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedRandom, ThreadRandom};
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn stat_with(symbol: char, attempts: u64, errors: u64) -> SymbolStat {
        let mut stat = SymbolStat::new(symbol);
        for i in 0..attempts {
            stat.record_attempt(i < errors);
        }
        stat
    }

    fn perfect_and_hopeless() -> Vec<SymbolStat> {
        vec![stat_with('a', 4, 0), stat_with('b', 4, 4)]
    }

    #[test]
    fn test_weighted_empty_returns_none() {
        let strategy = WeightedRandomStrategy::new();
        assert_eq!(strategy.next_symbol(&[], &mut ThreadRandom), None);
    }

    #[test]
    fn test_weighted_draw_lands_on_first_bucket() {
        let stats = perfect_and_hopeless();
        let strategy = WeightedRandomStrategy::new();
        // total weight 1.2, so r = 0.06
        let mut random = FixedRandom::new(0.05);
        assert_eq!(strategy.next_symbol(&stats, &mut random), Some('a'));
    }

    #[test]
    fn test_weighted_draw_lands_on_second_bucket() {
        let stats = perfect_and_hopeless();
        let strategy = WeightedRandomStrategy::new();
        // r = 0.5 once scaled by the 1.2 total
        let mut random = || 0.5 / 1.2;
        assert_eq!(strategy.next_symbol(&stats, &mut random), Some('b'));
    }

    #[test]
    fn test_weighted_falls_back_to_last_symbol() {
        let stats = vec![stat_with('a', 0, 0), stat_with('b', 0, 0), stat_with('c', 0, 0)];
        let strategy = WeightedRandomStrategy::new();
        // A source that breaks the [0, 1) contract forces the walk past every bucket
        let mut random = || 1.5;
        assert_eq!(strategy.next_symbol(&stats, &mut random), Some('c'));
    }

    #[test]
    fn test_weighted_zero_draw_picks_first() {
        let stats = perfect_and_hopeless();
        let strategy = WeightedRandomStrategy::new();
        assert_eq!(strategy.next_symbol(&stats, &mut FixedRandom::new(0.0)), Some('a'));
    }

    #[test]
    fn test_weights_include_floor() {
        let stats = perfect_and_hopeless();
        let weights = WeightedRandomStrategy::new().weights(&stats);
        assert_eq!(weights.len(), 2);
        assert!((weights[0] - 0.1).abs() < 1e-12);
        assert!((weights[1] - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_custom_floor_changes_weights() {
        let strategy = WeightedRandomStrategy::with_floor(0.5).unwrap();
        let weights = strategy.weights(&perfect_and_hopeless());
        assert!((weights[0] - 0.5).abs() < 1e-12);
        assert!((weights[1] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_floor_rejected() {
        for floor in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert_matches!(
                WeightedRandomStrategy::with_floor(floor),
                Err(TrainerError::InvalidFloorWeight(_))
            );
        }
    }

    #[test]
    fn test_weighted_prefers_error_prone_symbols() {
        let stats = perfect_and_hopeless();
        let strategy = WeightedRandomStrategy::new();
        let mut random = ThreadRandom;

        let trials = 2000;
        let b_count = (0..trials)
            .filter(|_| strategy.next_symbol(&stats, &mut random) == Some('b'))
            .count();

        // Expected share for 'b' is 1.1 / 1.2
        assert!(
            b_count > trials * 3 / 4,
            "b should dominate selection (got {b_count} out of {trials})"
        );
        assert!(b_count < trials, "a must never be starved");
    }

    #[test]
    fn test_weighted_does_not_mutate_stats() {
        let stats = perfect_and_hopeless();
        let before = stats.clone();
        let strategy = WeightedRandomStrategy::new();
        for _ in 0..10 {
            strategy.next_symbol(&stats, &mut ThreadRandom);
        }
        assert_eq!(stats, before);
    }

    #[test]
    fn test_uniform_selector() {
        let stats = vec![stat_with('a', 0, 0), stat_with('b', 9, 9), stat_with('c', 1, 0)];
        let strategy = UniformRandomStrategy;
        assert_eq!(strategy.next_symbol(&stats, &mut FixedRandom::new(0.0)), Some('a'));
        assert_eq!(strategy.next_symbol(&stats, &mut FixedRandom::new(0.5)), Some('b'));
        assert_eq!(strategy.next_symbol(&stats, &mut FixedRandom::new(0.99)), Some('c'));
        assert_eq!(strategy.next_symbol(&[], &mut ThreadRandom), None);
    }

    #[test]
    fn test_least_practiced_selector() {
        let stats = vec![stat_with('a', 3, 0), stat_with('b', 1, 1), stat_with('c', 1, 0)];
        let strategy = LeastPracticedStrategy;
        assert_eq!(strategy.next_symbol(&stats, &mut ThreadRandom), Some('b'));
        assert_eq!(strategy.next_symbol(&[], &mut ThreadRandom), None);
    }

    #[test]
    fn test_strategy_kind_builds_each_variant() {
        for (kind, name) in [
            (StrategyKind::Weighted, "weighted"),
            (StrategyKind::Uniform, "uniform"),
            (StrategyKind::LeastPracticed, "least-practiced"),
        ] {
            let strategy = kind.build(DEFAULT_FLOOR_WEIGHT).unwrap();
            assert_eq!(strategy.name(), name);
            assert_eq!(kind.to_string(), name);
        }
        assert_matches!(
            StrategyKind::Weighted.build(0.0).err(),
            Some(TrainerError::InvalidFloorWeight(_))
        );
    }

    #[test]
    fn test_strategies_usable_as_trait_objects() {
        let strategies: Vec<Box<dyn SelectionStrategy>> = vec![
            Box::new(WeightedRandomStrategy::new()),
            Box::new(UniformRandomStrategy),
            Box::new(LeastPracticedStrategy),
        ];
        let stats = perfect_and_hopeless();
        for strategy in strategies {
            let picked = strategy.next_symbol(&stats, &mut ThreadRandom);
            assert!(matches!(picked, Some('a') | Some('b')));
        }
    }

    fn arb_stats() -> impl Strategy<Value = Vec<SymbolStat>> {
        proptest::collection::vec((0u64..50, 0u64..50), 1..30).prop_map(|counts| {
            counts
                .into_iter()
                .enumerate()
                .map(|(i, (attempts, errors))| {
                    let symbol = char::from_u32('a' as u32 + i as u32).unwrap_or('?');
                    stat_with(symbol, attempts, errors.min(attempts))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn every_weight_at_least_floor(stats in arb_stats()) {
            let weights = WeightedRandomStrategy::new().weights(&stats);
            prop_assert_eq!(weights.len(), stats.len());
            for w in weights {
                prop_assert!(w >= DEFAULT_FLOOR_WEIGHT);
            }
        }

        #[test]
        fn selection_is_member_of_input(stats in arb_stats(), draw in 0.0f64..1.0) {
            let strategy = WeightedRandomStrategy::new();
            let picked = strategy.next_symbol(&stats, &mut FixedRandom::new(draw));
            prop_assert!(picked.is_some());
            let picked = picked.unwrap();
            prop_assert!(stats.iter().any(|s| s.symbol() == picked));
        }
    }
}
