/// Attempt and error counters for a single symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolStat {
    symbol: char,
    attempts: u64,
    errors: u64,
}

impl SymbolStat {
    pub fn new(symbol: char) -> Self {
        Self {
            symbol,
            attempts: 0,
            errors: 0,
        }
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    /// Count one response, bumping `errors` as well when it was a miss
    pub fn record_attempt(&mut self, is_error: bool) {
        self.attempts += 1;
        if is_error {
            self.errors += 1;
        }
    }

    /// Fraction of attempts that were misses, 0.0 when never attempted
    pub fn error_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.errors as f64 / self.attempts as f64
        }
    }
}
