//! The prompt/response loop as seen from the terminal: normalizes key presses,
//! reports them against the presented symbol and decides when the drill ends.

use crate::config::Config;
use crate::error::{TrainerError, TrainerResult};
use crate::random::{RandomSource, SeededRandom, ThreadRandom};
use crate::trainer::{DifficultyEntry, TrainerSession};
use chrono::{DateTime, Local};
use std::fmt;

/// Result of answering one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub expected: char,
    pub typed: char,
    pub correct: bool,
    /// Next prompt, `None` once the drill is over
    pub next: Option<char>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrillSummary {
    pub started_at: Option<DateTime<Local>>,
    pub finished_at: DateTime<Local>,
    pub correct: u64,
    pub errors: u64,
    pub global_error_rate: f64,
    pub hardest: Vec<DifficultyEntry>,
}

impl DrillSummary {
    pub fn prompts(&self) -> u64 {
        self.correct + self.errors
    }
}

impl fmt::Display for DrillSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(started_at) = self.started_at {
            let secs = (self.finished_at - started_at).num_milliseconds() as f64 / 1000.0;
            writeln!(
                f,
                "started {}, {:.1}s",
                started_at.format("%Y-%m-%d %H:%M:%S"),
                secs
            )?;
        }
        writeln!(
            f,
            "{} prompts, {} correct, {} missed, {:.1}% error rate",
            self.prompts(),
            self.correct,
            self.errors,
            self.global_error_rate
        )?;
        if !self.hardest.is_empty() {
            writeln!(f, "hardest:")?;
            for entry in &self.hardest {
                writeln!(
                    f,
                    "  {}  {:>5.1}%  ({} attempts)",
                    entry.symbol, entry.error_rate_percent, entry.attempts
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Drill {
    session: TrainerSession,
    /// Prompts to answer before finishing; 0 runs until quit
    rounds: usize,
    ranking_limit: usize,
    answered: usize,
    started_at: Option<DateTime<Local>>,
    finished: bool,
}

impl Drill {
    pub fn new(session: TrainerSession, rounds: usize, ranking_limit: usize) -> Self {
        Self {
            session,
            rounds,
            ranking_limit,
            answered: 0,
            started_at: None,
            finished: false,
        }
    }

    pub fn from_config(cfg: &Config) -> TrainerResult<Self> {
        cfg.validate()?;
        let strategy = cfg.strategy.build(cfg.floor_weight)?;
        let random: Box<dyn RandomSource> = match cfg.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(ThreadRandom),
        };
        let session = TrainerSession::new(cfg.alphabet.chars(), strategy, random)?;
        Ok(Self::new(session, cfg.rounds, cfg.ranking_limit))
    }

    /// Present the first prompt
    pub fn start(&mut self) -> TrainerResult<char> {
        self.started_at = Some(Local::now());
        self.session.request_next()
    }

    /// Answer the current prompt with `typed` and move on to the next one
    pub fn handle_key(&mut self, typed: char) -> TrainerResult<Feedback> {
        if self.finished {
            return Err(TrainerError::DrillFinished);
        }
        let expected = match self.session.current_symbol() {
            Some(symbol) => symbol,
            None => self.start()?,
        };

        let typed = self.normalize(typed);
        let correct = typed == expected;
        self.session.report_outcome(expected, !correct);
        self.answered += 1;

        let next = if self.rounds > 0 && self.answered >= self.rounds {
            self.finished = true;
            None
        } else {
            Some(self.session.request_next()?)
        };

        Ok(Feedback {
            expected,
            typed,
            correct,
            next,
        })
    }

    /// Fold case only when the raw key is not itself part of the alphabet and
    /// its lowercase form is a single char
    fn normalize(&self, typed: char) -> char {
        if self.session.stat(typed).is_some() {
            return typed;
        }
        let mut lower = typed.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(folded), None) => folded,
            _ => typed,
        }
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current(&self) -> Option<char> {
        self.session.current_symbol()
    }

    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn session(&self) -> &TrainerSession {
        &self.session
    }

    pub fn summary(&self) -> DrillSummary {
        DrillSummary {
            started_at: self.started_at,
            finished_at: Local::now(),
            correct: self.session.total_correct(),
            errors: self.session.total_errors(),
            global_error_rate: self.session.global_error_rate(),
            hardest: self.session.ranked_difficulty(self.ranking_limit),
        }
    }
}
