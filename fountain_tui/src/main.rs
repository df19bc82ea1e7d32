mod config;
mod screen;

use anyhow::{Context, Result};
use clap::Parser;
use fountain_core::{
    console::{InputSource, LineInput, LineOutput, OutputSink},
    game::{Game, GameError, GameState, choose_map_size},
    layout::{Layout, MapSize},
};
use log::{LevelFilter, info};
use std::{fs::File, io, path::PathBuf};

use crate::{
    config::{DEFAULT_LOG_FILE, Settings},
    screen::Screen,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Find the Fountain of Objects, turn it back on and escape the cavern",
    long_about = None
)]
pub struct Args {
    /// Map size to play (small, medium or large); asked for when neither this nor --map is given
    #[arg(short, long, value_name = "SIZE")]
    size: Option<MapSize>,

    /// Map file to load instead of a built-in map
    #[arg(short, long, value_name = "MAP_FILE")]
    map: Option<PathBuf>,

    /// Play without pits
    #[arg(long)]
    classic: bool,

    /// Use a plain line console instead of the full-screen interface
    #[arg(long)]
    plain: bool,

    /// Config file to read (fountain.toml is used when present)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// File to write logs to
    #[arg(long, value_name = "LOG_FILE")]
    log_file: Option<PathBuf>,
}

/// How a session ended, for the closing line.
struct Summary {
    state: GameState,
    turns: u32,
}

fn main() -> Result<()> {
    // Parse command line arguments, then layer the config file underneath
    let args = Args::parse();
    let file_config = config::load(args.config.as_deref())?;
    let settings = Settings::merge(&args, file_config)?;

    init_logging(&settings)?;

    // Load a custom map up front so a bad file fails before the screen is taken over
    let layout = match &settings.map {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read map file {}", path.display()))?;
            let layout = Layout::parse(&text)
                .with_context(|| format!("Invalid map file {}", path.display()))?;
            Some(layout)
        }
        None => None,
    };

    let outcome = if settings.plain {
        run_plain(&settings, layout)
    } else {
        run_fullscreen(&settings, layout)
    };

    match outcome {
        Ok(summary) => {
            info!("Session finished: {:?}", summary.state);
            let verdict = match summary.state {
                GameState::Won => "escaped",
                GameState::Lost => "perished",
                GameState::Playing => "left",
            };
            println!("You {} after {} turns.", verdict, summary.turns);
            Ok(())
        }
        Err(GameError::InputExhausted) => {
            info!("Input ended, leaving the cavern");
            println!("You leave the cavern before finishing your quest.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Sets up `env_logger`. `RUST_LOG` applies unless a level is configured.
fn init_logging(settings: &Settings) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    builder.parse_default_env();
    if let Some(level) = settings.log_level {
        builder.filter_level(level);
    }

    // The full-screen interface owns the terminal, so its logs go to a file
    let log_file = match (&settings.log_file, settings.plain) {
        (Some(path), _) => Some(path.clone()),
        (None, false) => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        (None, true) => None,
    };
    if let Some(path) = log_file {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("Failed to initialize logging")?;
    Ok(())
}

/// Plays on stdin/stdout.
fn run_plain(settings: &Settings, layout: Option<Layout>) -> Result<Summary, GameError> {
    let mut input = LineInput::new(io::stdin().lock());
    let mut output = LineOutput::new(io::stdout());
    play(settings, layout, &mut input, &mut output)
}

/// Plays in the full-screen interface.
fn run_fullscreen(settings: &Settings, layout: Option<Layout>) -> Result<Summary, GameError> {
    let mut screen = Screen::new()?;
    let mut output = screen.output();
    let summary = play(settings, layout, &mut screen, &mut output)?;
    screen.wait_for_key("Press any key to leave.")?;
    Ok(summary)
}

/// Runs one session, asking for a map size if none was configured.
fn play<I, O>(
    settings: &Settings,
    layout: Option<Layout>,
    input: &mut I,
    output: &mut O,
) -> Result<Summary, GameError>
where
    I: InputSource,
    O: OutputSink,
{
    let layout = match (layout, settings.size) {
        (Some(layout), _) => layout,
        (None, Some(size)) => Layout::builtin(size),
        (None, None) => Layout::builtin(choose_map_size(input, output)?),
    };

    let mut game = Game::new(&layout, settings.variant, input, output)?;
    let state = game.run()?;
    Ok(Summary {
        state,
        turns: game.turns(),
    })
}
