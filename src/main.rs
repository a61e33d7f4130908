use clap::Parser;
use kanadrill::{
    app::{App, Flow},
    config::{Config, ConfigStore, FileConfigStore},
    drill::Drill,
    kana::PracticeMode,
    runtime::{DrillEvent, FixedTicker, LineEventSource, Runner},
    store::DualStore,
    weak_set::select_weak,
};
use std::{
    error::Error,
    io::{self, Write},
    path::PathBuf,
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 100;

/// kana flashcards that remember which characters you miss
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Kana flashcards with per-character proficiency tracking, streaks, triple rewards, and a focused review of your weakest characters. Type an answer and press enter; :help lists the commands."
)]
pub struct Cli {
    /// practice mode to start in
    #[clap(short = 'm', long, value_enum)]
    mode: Option<PracticeMode>,

    /// start with triple rewards on
    #[clap(short = 't', long)]
    triple: bool,

    /// directory holding the progress database and snapshot
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// config file to read and update
    #[clap(long)]
    config: Option<PathBuf>,

    /// print the n weakest characters and exit
    #[clap(long, value_name = "N")]
    weak: Option<usize>,
}

impl Cli {
    /// Config for this run: saved settings with command-line overrides on top
    fn apply(&self, saved: &Config) -> Config {
        let mut config = saved.clone();
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.triple {
            config.triple = true;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config_store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let saved = config_store.load();
    let config = cli.apply(&saved);

    let mut store = DualStore::in_dir(config.resolved_data_dir());
    let mut stdout = io::stdout();

    if let Some(n) = cli.weak {
        let progress = store.load_existing();
        let weak = select_weak(&progress.records, n);
        if weak.is_empty() {
            writeln!(stdout, "not enough data yet")?;
        } else {
            writeln!(stdout, "{}", weak.join(" "))?;
        }
        return Ok(());
    }

    let mut drill = Drill::new(store, config.mode);
    drill.set_multiplier(config.triple.into());
    drill.set_autosave_every(config.autosave_every);

    let events = LineEventSource::stdin();
    // Ctrl-C ends the session through the same path as end of input.
    let interrupt = events.sender();
    ctrlc::set_handler(move || {
        let _ = interrupt.send(DrillEvent::Closed);
    })?;

    let mut app = App::new(drill, &config);
    run(&mut app, events, &mut stdout)?;

    if let Err(e) = app.shutdown() {
        log::error!("failed to save progress: {e}");
        eprintln!("failed to save progress: {e}");
    }

    // Only the session choices are remembered; command-line paths are not.
    let updated = Config {
        mode: app.drill.mode(),
        triple: app.drill.multiplier().is_active(),
        ..saved
    };
    if let Err(e) = config_store.save(&updated) {
        log::warn!("failed to save config to {}: {e}", config_store.path().display());
    }

    Ok(())
}

fn run<S, W>(app: &mut App<S>, events: LineEventSource, out: &mut W) -> io::Result<()>
where
    S: kanadrill::store::ProgressStore,
    W: Write,
{
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    app.start(out)?;
    out.flush()?;

    loop {
        match runner.step() {
            DrillEvent::Tick => app.on_tick(Instant::now(), out)?,
            DrillEvent::Line(line) => {
                if app.handle_line(&line, Instant::now(), out)? == Flow::Quit {
                    break;
                }
            }
            DrillEvent::Closed => break,
        }
        out.flush()?;
    }

    Ok(())
}
