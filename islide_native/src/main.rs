use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
    time::Duration,
};

use args::ViewportParser;
use clap::Parser;
use color_eyre::{
    config::Theme,
    eyre::{self, bail, Context},
};
use islide_engine::{derive_steps, EditorSession, EffectCue, EngineConfig, TimelinePlayer};
use islide_layout::{CanvasBounds, Viewport};
use islide_model::SlideDeck;
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod args;

/// Inspect and play interactive slide decks
#[derive(Parser)]
struct Args {
    /// Deck to load, as JSON
    input: PathBuf,
    /// JSON file overriding engine defaults
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Viewport as WIDTHxHEIGHT or one of mobile, tablet, desktop
    #[clap(short, long, value_parser = ViewportParser, default_value = "desktop")]
    size: Viewport,
    /// Slide to lay out, 1 based
    #[clap(long, default_value_t = 1)]
    slide: usize,
    /// Print the element frames of the slide at the chosen size
    #[clap(short, long)]
    layout: bool,
    /// Print the derived timeline steps
    #[clap(short = 't', long)]
    steps: bool,
    /// Play the timeline on a simulated clock, logging every cue
    #[clap(short, long)]
    play: bool,
    /// Playback speed, between 0.25 and 4
    #[clap(long, default_value_t = 1.0)]
    speed: f32,
    /// Write the deck back out as loaded, unreadable effect parameters
    /// replaced by their defaults
    #[clap(short, long)]
    normalize: bool,
}

impl Args {
    fn open_deck(&self) -> eyre::Result<SlideDeck> {
        let file = BufReader::new(
            File::open(&self.input)
                .wrap_err_with(|| format!("Failed to open deck {}", self.input.display()))?,
        );
        SlideDeck::from_reader(file).wrap_err("Failed to load deck")
    }

    fn engine_config(&self) -> eyre::Result<EngineConfig> {
        let Some(path) = self.config.as_deref() else {
            return Ok(EngineConfig::default());
        };
        let file = BufReader::new(File::open(path).wrap_err("Failed to open config file")?);
        serde_json::from_reader(file)
            .wrap_err_with(|| format!("Invalid config file {}", path.display()))
    }
}

fn main() -> eyre::Result<()> {
    let args = Args::parse();
    let color = supports_color::on(supports_color::Stream::Stderr)
        .map(|c| c.has_basic)
        .unwrap_or_default();
    if !color {
        color_eyre::config::HookBuilder::new()
            .theme(Theme::default())
            .install()?;
    } else {
        color_eyre::install()?;
    }

    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(color)
                .with_writer(io::stderr),
        )
        .init();

    let deck = args.open_deck()?;
    let config = args.engine_config()?;
    tracing::debug!(slides = deck.slides.len(), title = %deck.title, "Loaded deck");

    let mut stdout = io::stdout().lock();

    if args.layout {
        let mut session = EditorSession::new(deck.clone(), config, args.size);
        session.set_canvas_bounds(Some(CanvasBounds::new(args.size.width, args.size.height)));
        let Some(index) = args.slide.checked_sub(1).filter(|&i| session.set_slide(i)) else {
            bail!(
                "Slide {} does not exist, the deck has {}",
                args.slide,
                deck.slides.len()
            );
        };
        tracing::info!(slide = index + 1, device_class = %session.device_class(), "Layout");
        serde_json::to_writer_pretty(&mut stdout, &session.frames())?;
        writeln!(stdout)?;
    }

    let steps = derive_steps(&deck, &config.timeline);

    if args.steps {
        for step in &steps {
            writeln!(
                stdout,
                "{:>3}  {:>7.2}s  slide {:<3} {:<16} {:<12} {}",
                step.step_number,
                step.timestamp,
                step.slide_index + 1,
                step.element_id,
                step.interaction.trigger,
                step.interaction.effect.effect_type(),
            )?;
        }
    }

    if args.play {
        play(steps, &config, &args)?;
    }

    if args.normalize {
        writeln!(stdout, "{}", deck.to_json_pretty()?)?;
    }

    Ok(())
}

/// Runs the timeline to the end, jumping the clock straight to each
/// scheduled advance
fn play(
    steps: Vec<islide_engine::TimelineStep>,
    config: &EngineConfig,
    args: &Args,
) -> eyre::Result<()> {
    if steps.is_empty() {
        tracing::warn!("Deck has no timeline steps");
        return Ok(());
    }

    let mut player = TimelinePlayer::new(steps, config.timeline);
    player.set_speed(args.speed);
    player.set_device_class(args.size.device_class(&config.breakpoints));

    let mut now = Duration::ZERO;
    if let Some(cue) = player.play(now) {
        log_cue(now, &cue);
    }
    while let Some(deadline) = player.next_advance_at() {
        now = deadline;
        for cue in player.poll(now) {
            log_cue(now, &cue);
        }
    }

    tracing::info!(elapsed = ?now, state = %player.state(), "Playback finished");
    Ok(())
}

fn log_cue(now: Duration, cue: &EffectCue) {
    tracing::info!(
        at = ?now,
        step = ?cue.step,
        element = %cue.element_id,
        effect = %cue.effect.effect_type(),
        duration = ?cue.effect.duration,
        delay = ?cue.effect.delay,
        "Cue"
    );
}
