mod beacon;
mod color;
mod config;
mod controls;
mod error;
mod geo;
mod globe;
mod help;
mod projection;
mod render;
mod rotation;
mod settings;
mod sphere;
mod spring;
mod surface;
mod terminal;

use anyhow::{Context, Result};
use beacon::ClockMode;
use clap::{Args, Parser, Subcommand};
use config::GlobeConfig;
use geo::GeoPoint;
use log::LevelFilter;
use projection::{project_point, Viewport};
use settings::Settings;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use terminal::Terminal;

#[derive(Parser, Debug)]
#[command(name = "pulseglobe")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Rotating terminal globe with pulsing location beacons", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the interactive globe (drag to rotate)
    Run {
        /// Animation speed (seconds per frame)
        #[arg(short, long, default_value = "0.03")]
        time: f32,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Render frames off-screen and print the last one to stdout
    Print {
        /// Width in terminal columns
        #[arg(long, default_value = "80")]
        width: u16,

        /// Height in terminal rows
        #[arg(long, default_value = "40")]
        height: u16,

        /// Number of frames to simulate
        #[arg(short, long, default_value = "1")]
        frames: u32,

        /// Seconds per simulated frame
        #[arg(short, long, default_value = "0.03")]
        time: f32,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Project a location to screen space and print it as JSON
    Project {
        #[arg(long, allow_negative_numbers = true)]
        lat: f32,

        #[arg(long, allow_negative_numbers = true)]
        lng: f32,

        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        phi: f32,

        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        theta: f32,

        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        cx: f32,

        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        cy: f32,

        #[arg(long, default_value = "1.0")]
        radius: f32,
    },
}

/// Overrides applied on top of the config file
#[derive(Args, Debug, Default)]
struct ViewArgs {
    /// Starting rotation about the vertical axis, radians
    #[arg(long, allow_negative_numbers = true)]
    phi: Option<f32>,

    /// Tilt about the horizontal axis, radians
    #[arg(long, allow_negative_numbers = true)]
    theta: Option<f32>,

    /// How the beacon clock and spin advance each frame
    #[arg(long, value_enum)]
    clock: Option<ClockMode>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, matches!(cli.command, Commands::Run { .. }));

    match cli.command {
        Commands::Run { time, view } => {
            let config = load_config(cli.config.as_deref(), &view)?;
            let mut term = Terminal::new().context("failed to initialise terminal")?;
            globe::run(&mut term, &config, time)?;
        }
        Commands::Print { width, height, frames, time, view } => {
            let config = load_config(cli.config.as_deref(), &view)?;
            let term = globe::render_frames(&config, width, height, frames, time)?;
            term.print_to_stdout()?;
        }
        Commands::Project { lat, lng, phi, theta, cx, cy, radius } => {
            let point = GeoPoint::checked(lat, lng)?;
            let projected = project_point(point, phi, theta, Viewport { cx, cy, radius });
            println!("{}", serde_json::to_string(&projected)?);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>, view: &ViewArgs) -> Result<GlobeConfig> {
    let mut config = Settings::load(path)?
        .into_config()
        .context("invalid settings")?;
    if let Some(phi) = view.phi {
        config.sphere.phi = phi;
    }
    if let Some(theta) = view.theta {
        config.sphere.theta = theta;
    }
    if let Some(clock) = view.clock {
        config.clock_mode = clock;
    }
    config.check_view().context("invalid view override")?;
    Ok(config)
}

/// Logs go to stderr, except while the interactive view owns the screen
fn init_logging(verbose: u8, interactive: bool) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if interactive {
        match open_log_file() {
            Some(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            None => {
                builder.filter_level(LevelFilter::Off);
            }
        }
    }
    let _ = builder.try_init();
}

fn open_log_file() -> Option<fs::File> {
    let dir = dirs::cache_dir()?.join("pulseglobe");
    fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("pulseglobe.log"))
        .ok()
}
