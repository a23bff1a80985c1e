use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keydrill::{
    config::{Config, ConfigStore, FileConfigStore},
    drill::{Drill, Feedback},
    runtime::{CrosstermEventSource, DrillEvent, Runner},
    strategy::StrategyKind,
    ui::DrillScreen,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const POLL_INTERVAL_MS: u64 = 100;

#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A single-key typing drill that tracks your misses per character and keeps serving the ones you get wrong most."
)]
pub struct Cli {
    /// characters to drill, in display order (default: a-z)
    #[clap(short = 'a', long)]
    alphabet: Option<String>,

    /// how the next character is picked
    #[clap(short = 'S', long, value_enum)]
    strategy: Option<StrategyKind>,

    /// weight every character gets on top of its error rate, must be above zero
    #[clap(long)]
    floor_weight: Option<f64>,

    /// number of prompts in the drill, 0 runs until ESC
    #[clap(short = 'n', long)]
    rounds: Option<usize>,

    /// number of characters in the hardest-characters table
    #[clap(short = 'l', long)]
    limit: Option<usize>,

    /// seed for a reproducible prompt sequence
    #[clap(long)]
    seed: Option<u64>,

    /// drop a seed stored in the config and draw freshly each run
    #[clap(long, conflicts_with = "seed")]
    no_seed: bool,

    /// config file to read (and write with --save-config) instead of the default location
    #[clap(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// write the resulting settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command line flags on top of the stored config
    fn merge_into(&self, mut cfg: Config) -> Config {
        if let Some(alphabet) = &self.alphabet {
            cfg.alphabet = alphabet.clone();
        }
        if let Some(strategy) = self.strategy {
            cfg.strategy = strategy;
        }
        if let Some(floor_weight) = self.floor_weight {
            cfg.floor_weight = floor_weight;
        }
        if let Some(rounds) = self.rounds {
            cfg.rounds = rounds;
        }
        if let Some(limit) = self.limit {
            cfg.ranking_limit = limit;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if self.no_seed {
            cfg.seed = None;
        }
        cfg
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let cfg = cli.merge_into(store.load());

    let mut drill = match Drill::from_config(&cfg) {
        Ok(drill) => drill,
        Err(err) => Cli::command().error(ErrorKind::InvalidValue, err).exit(),
    };

    if cli.save_config {
        store.save(&cfg)?;
        tracing::info!(path = %store.path().display(), "saved config");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let res = run_drill(&mut terminal, &mut drill);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;

    print!("{}", drill.summary());
    Ok(())
}

fn run_drill<B: Backend>(terminal: &mut Terminal<B>, drill: &mut Drill) -> Result<()> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(POLL_INTERVAL_MS),
    );

    drill.start()?;
    let mut last: Option<Feedback> = None;
    draw(terminal, drill, last.as_ref())?;

    while !drill.is_finished() {
        match runner.step() {
            DrillEvent::Tick => {}
            DrillEvent::Resize => draw(terminal, drill, last.as_ref())?,
            DrillEvent::Quit => drill.finish(),
            DrillEvent::Key(c) => {
                let feedback = drill.handle_key(c)?;
                if feedback.next.is_some() {
                    last = Some(feedback);
                    draw(terminal, drill, last.as_ref())?;
                }
            }
        }
    }
    Ok(())
}

fn draw<B: Backend>(
    terminal: &mut Terminal<B>,
    drill: &Drill,
    last: Option<&Feedback>,
) -> io::Result<()> {
    let screen = DrillScreen::new(drill, last);
    terminal.draw(|f| f.render_widget(&screen, f.area()))?;
    Ok(())
}
