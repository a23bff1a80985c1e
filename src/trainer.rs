use crate::error::{TrainerError, TrainerResult};
use crate::random::{RandomSource, ThreadRandom};
use crate::strategy::{SelectionStrategy, WeightedRandomStrategy};
use crate::symbol_stat::SymbolStat;
use crate::util::percentage;
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;

/// One row of the "hardest symbols" ranking
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyEntry {
    pub symbol: char,
    pub error_rate_percent: f64,
    pub attempts: u64,
}

/// Ties per-symbol stats to a selection strategy and runs the
/// request-next / report-outcome cycle.
///
/// The session owns everything it touches; callers that share it across
/// threads must serialize access to the whole cycle themselves.
pub struct TrainerSession {
    symbols: Vec<SymbolStat>,
    strategy: Box<dyn SelectionStrategy>,
    random: Box<dyn RandomSource>,
    current_symbol: Option<char>,
    total_correct: u64,
    total_errors: u64,
}

impl fmt::Debug for TrainerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainerSession")
            .field("symbols", &self.symbols)
            .field("strategy", &self.strategy.name())
            .field("current_symbol", &self.current_symbol)
            .field("total_correct", &self.total_correct)
            .field("total_errors", &self.total_errors)
            .finish()
    }
}

impl TrainerSession {
    /// Build a session over `alphabet`, which must be non-empty and free of repeats
    pub fn new<I>(
        alphabet: I,
        strategy: Box<dyn SelectionStrategy>,
        random: Box<dyn RandomSource>,
    ) -> TrainerResult<Self>
    where
        I: IntoIterator<Item = char>,
    {
        let mut seen = HashSet::new();
        let mut symbols = Vec::new();
        for symbol in alphabet {
            if !seen.insert(symbol) {
                return Err(TrainerError::DuplicateSymbol(symbol));
            }
            symbols.push(SymbolStat::new(symbol));
        }

        if symbols.is_empty() {
            return Err(TrainerError::EmptyAlphabet);
        }

        tracing::info!(
            symbols = symbols.len(),
            strategy = strategy.name(),
            "trainer session initialized"
        );

        Ok(Self {
            symbols,
            strategy,
            random,
            current_symbol: None,
            total_correct: 0,
            total_errors: 0,
        })
    }

    /// Session with the weighted strategy and the thread-local generator
    pub fn with_alphabet(alphabet: &str) -> TrainerResult<Self> {
        Self::new(
            alphabet.chars(),
            Box::new(WeightedRandomStrategy::new()),
            Box::new(ThreadRandom),
        )
    }

    /// Ask the strategy for the next symbol and remember it as current
    pub fn request_next(&mut self) -> TrainerResult<char> {
        let symbol = self
            .strategy
            .next_symbol(&self.symbols, self.random.as_mut())
            .ok_or(TrainerError::NoSelection {
                strategy: self.strategy.name(),
            })?;

        tracing::debug!(%symbol, strategy = self.strategy.name(), "selected next symbol");
        self.current_symbol = Some(symbol);
        Ok(symbol)
    }

    /// Record a response for `symbol`. Symbols outside the alphabet are ignored.
    pub fn report_outcome(&mut self, symbol: char, is_error: bool) {
        let Some(stat) = self.symbols.iter_mut().find(|s| s.symbol() == symbol) else {
            tracing::debug!(%symbol, "ignoring report for symbol outside the alphabet");
            return;
        };

        stat.record_attempt(is_error);
        if is_error {
            self.total_errors += 1;
        } else {
            self.total_correct += 1;
        }

        tracing::trace!(
            %symbol,
            is_error,
            attempts = stat.attempts(),
            errors = stat.errors(),
            "recorded attempt"
        );
    }

    /// Session-wide miss percentage, one decimal
    pub fn global_error_rate(&self) -> f64 {
        percentage(self.total_errors, self.total_attempts())
    }

    /// Attempted symbols ordered hardest first, at most `limit` of them.
    /// Ties keep alphabet order.
    pub fn ranked_difficulty(&self, limit: usize) -> Vec<DifficultyEntry> {
        self.symbols
            .iter()
            .filter(|stat| stat.attempts() > 0)
            .map(|stat| DifficultyEntry {
                symbol: stat.symbol(),
                error_rate_percent: percentage(stat.errors(), stat.attempts()),
                attempts: stat.attempts(),
            })
            .sorted_by(|a, b| {
                b.error_rate_percent
                    .partial_cmp(&a.error_rate_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .take(limit)
            .collect()
    }

    pub fn symbols(&self) -> &[SymbolStat] {
        &self.symbols
    }

    pub fn stat(&self, symbol: char) -> Option<&SymbolStat> {
        self.symbols.iter().find(|s| s.symbol() == symbol)
    }

    pub fn current_symbol(&self) -> Option<char> {
        self.current_symbol
    }

    pub fn total_correct(&self) -> u64 {
        self.total_correct
    }

    pub fn total_errors(&self) -> u64 {
        self.total_errors
    }

    pub fn total_attempts(&self) -> u64 {
        self.total_correct + self.total_errors
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}
