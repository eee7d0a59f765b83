use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use valuechase_core::{AppConfig, Ease, EasingType};

mod commands;

#[derive(Parser)]
#[command(name = "valuechase")]
#[command(author, version, about = "Chase a value across animation frames")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the configured friction
    #[arg(long, global = true)]
    friction: Option<f64>,

    /// Override the configured tolerance (decimal digits)
    #[arg(long, global = true)]
    tolerance: Option<u32>,

    /// Easing curve, e.g. in_circ or out-quad
    #[arg(long, global = true)]
    ease: Option<EasingType>,

    /// Keep the ticker running after the value settles
    #[arg(long, global = true)]
    no_idle: bool,

    /// Override the configured frame rate
    #[arg(long, global = true)]
    fps: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal demo
    Demo,
    /// Step frames deterministically and print every notification
    Simulate {
        /// Target value
        #[arg(long)]
        to: f64,
        /// Value to start from (configured initial by default)
        #[arg(long)]
        from: Option<f64>,
        /// Give up after this many frames
        #[arg(long, default_value_t = 10_000)]
        frames: usize,
        /// Print notifications as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Chase in real time at the configured frame rate until settled
    Run {
        /// Target value
        #[arg(long)]
        to: f64,
        /// Value to start from (configured initial by default)
        #[arg(long)]
        from: Option<f64>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Fold command line overrides into the loaded configuration
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(friction) = self.friction {
            config.chase.friction = friction;
        }
        if let Some(tolerance) = self.tolerance {
            config.chase.tolerance = tolerance;
        }
        if let Some(ease) = self.ease {
            config.chase.ease = Some(Ease::Named(ease));
        }
        if self.no_idle {
            config.chase.idle = false;
        }
        if let Some(fps) = self.fps {
            config.ticker.fps = fps;
        }
    }

    fn is_demo(&self) -> bool {
        matches!(self.command, Some(Commands::Demo) | None)
    }
}

/// Install the tracing subscriber
///
/// The demo owns the terminal, so it only logs when RUST_LOG asks for it.
fn init_logging(config: &AppConfig, demo: bool) {
    let env = std::env::var("RUST_LOG").ok();
    if demo && env.is_none() {
        return;
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env.unwrap_or_else(|| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;
    cli.apply_overrides(&mut config);

    init_logging(&config, cli.is_demo());

    match cli.command {
        Some(Commands::Demo) | None => commands::demo::run(config),
        Some(Commands::Simulate {
            to,
            from,
            frames,
            json,
        }) => commands::simulate::run(&config, from, to, frames, json),
        Some(Commands::Run { to, from }) => commands::run::run(&config, from, to).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}
