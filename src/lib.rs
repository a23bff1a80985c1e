// Library surface for the drill binary and headless integration tests.
pub mod config;
pub mod drill;
pub mod error;
pub mod random;
pub mod runtime;
pub mod strategy;
pub mod symbol_stat;
pub mod trainer;
pub mod ui;
pub mod util;

pub use error::{ConfigError, TrainerError, TrainerResult};
pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
pub use strategy::{
    LeastPracticedStrategy, SelectionStrategy, StrategyKind, UniformRandomStrategy,
    WeightedRandomStrategy, DEFAULT_FLOOR_WEIGHT,
};
pub use symbol_stat::SymbolStat;
pub use trainer::{DifficultyEntry, TrainerSession};
