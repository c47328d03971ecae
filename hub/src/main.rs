//! gesture-hub - hand-landmark desktop hub.
//!
//! Turns a stream of hand landmarks into pointer motion, pinch clicks,
//! zoom/swipe hotkeys, hover typing and freehand drawing.

mod actions;
mod backend;
mod config;
mod gesture;
mod input;
mod modes;
mod render;
mod sexp;
mod state;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use crate::actions::{automation, Dispatcher, DiskPersistence};
use crate::config::HubConfig;
use crate::input::ReplaySource;
use crate::render::SexpRenderer;
use crate::state::HubState;

#[derive(Parser, Debug)]
#[command(name = "gesture-hub", about = "Hand-landmark desktop hub")]
struct Cli {
    /// Landmark frame stream to read, or "-" for stdin
    #[arg(long, default_value = "-")]
    replay: String,

    /// S-expression config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Screen resolution for pointer mapping, WxH
    #[arg(long)]
    screen: Option<String>,

    /// Directory for saved text and drawings
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Hover time before a key or button fires, in milliseconds
    #[arg(long)]
    hover_ms: Option<f64>,

    /// Pace the replay by its recorded timestamps
    #[arg(long)]
    realtime: bool,

    /// Write each frame's draw list to this file, one line per frame
    #[arg(long)]
    render_log: Option<PathBuf>,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<HubConfig> {
    let mut config = match &cli.config {
        Some(path) => HubConfig::from_file(path)?,
        None => HubConfig::default(),
    };
    if let Some(screen) = &cli.screen {
        let Some((w, h)) = HubConfig::parse_resolution(screen) else {
            bail!("invalid --screen {:?}, expected WxH", screen);
        };
        config.screen_width = w;
        config.screen_height = h;
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(ms) = cli.hover_ms {
        config.hover_ms = ms;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("gesture-hub {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_hub=info".into()),
        )
        .init();

    info!("gesture-hub v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    let dispatcher = Dispatcher::new(
        automation::default_backend()?,
        Box::new(DiskPersistence::new(config.output_dir.clone())),
        config.status_ttl_ms,
    );

    let render_out: Option<Box<dyn Write>> = match &cli.render_log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating render log {}", path.display()))?;
            info!("render log: {}", path.display());
            Some(Box::new(BufWriter::new(file)))
        }
        None => None,
    };
    let mut renderer = SexpRenderer::new(render_out);

    let replay = backend::ReplayConfig {
        realtime: cli.realtime,
        ..Default::default()
    };
    let mut state = HubState::new(config, dispatcher);

    if cli.replay == "-" {
        info!("reading frames from stdin");
        let mut source = ReplaySource::new(io::stdin().lock());
        backend::run(&mut state, &mut source, &mut renderer, &replay)
    } else {
        let file = File::open(&cli.replay)
            .with_context(|| format!("opening frame source {}", cli.replay))?;
        info!("reading frames from {}", cli.replay);
        let mut source = ReplaySource::new(BufReader::new(file));
        backend::run(&mut state, &mut source, &mut renderer, &replay)
    }
}
