use anyhow::{Context, Result};
use clap::Parser;
use snake_tui::audio::{AudioCue, Silent, TerminalBell};
use snake_tui::game::GameConfig;
use snake_tui::modes::HumanMode;
use snake_tui::persistence::{HighScoreStore, JsonFileStore, MemoryStore};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "snake-tui")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Board width and height in cells
    #[arg(long)]
    grid_size: Option<usize>,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Do not read or write the high score file
    #[arg(long)]
    no_persist: bool,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    /// Log file (the terminal itself is taken by the game)
    #[arg(long, default_value = "snake-tui.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "snake_tui=info".into()))
        .init();

    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    // Command line wins over the file
    if let Some(size) = cli.grid_size {
        config.grid_size = size;
    }
    if cli.seed.is_some() {
        config.rng_seed = cli.seed;
    }

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = build_config(&cli)?;
    info!(?config, "Starting");

    let store: Box<dyn HighScoreStore> = if cli.no_persist {
        Box::new(MemoryStore::default())
    } else {
        Box::new(JsonFileStore::new(&cli.high_score_file))
    };

    let audio: Box<dyn AudioCue> = if cli.mute {
        Box::new(Silent)
    } else {
        Box::new(TerminalBell::new(std::io::stderr()))
    };

    let mut human_mode = HumanMode::new(config, store, audio);
    human_mode.run().await?;

    Ok(())
}
