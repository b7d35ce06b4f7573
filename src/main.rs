use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stepdeck::DeckConfig;

#[cfg(feature = "window")]
mod renderer;
mod script;

#[derive(Parser, Debug)]
#[command(name = "stepdeck", about = "Step-animated slide deck player")]
struct Cli {
    /// Deck description (TOML). Plays the bundled demo deck when omitted.
    deck: Option<PathBuf>,

    /// Run without a window, feeding the keys given by --keys
    #[arg(long)]
    headless: bool,

    /// Headless input: n/space next, c step, p previous, r reset, . idle
    #[arg(long, default_value = "")]
    keys: String,

    /// Time that passes after each headless key, in milliseconds
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,

    #[arg(long, default_value_t = 1280)]
    width: i32,

    #[arg(long, default_value_t = 720)]
    height: i32,

    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepdeck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.deck {
        Some(path) => DeckConfig::from_path(path)
            .with_context(|| format!("loading deck {}", path.display()))?,
        None => DeckConfig::demo().context("loading bundled demo deck")?,
    };
    let mut presentation = config.build().context("building deck")?;
    info!(
        title = %presentation.title,
        slides = presentation.deck.len(),
        "deck loaded"
    );

    if cli.headless {
        let keys = script::parse_keys(&cli.keys)?;
        script::run(&mut presentation, &keys, Duration::from_millis(cli.tick_ms));
    } else {
        window(&mut presentation, &cli)?;
    }

    Ok(())
}

#[cfg(feature = "window")]
fn window(presentation: &mut stepdeck::Presentation, cli: &Cli) -> Result<()> {
    renderer::run(presentation, cli.width, cli.height, cli.fps);
    Ok(())
}

#[cfg(not(feature = "window"))]
fn window(_presentation: &mut stepdeck::Presentation, _cli: &Cli) -> Result<()> {
    anyhow::bail!("built without the `window` feature; run with --headless")
}
