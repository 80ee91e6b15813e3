//! Waymark session recorder CLI.
//!
//! Provides three modes of operation:
//! - `record`: drive the agent from the keyboard and record every step
//! - `replay`: run a headless session from a scripted key string
//! - `info`: print the action catalog and key bindings

mod display;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use waymark_actions::ActionSpaceExtender;
use waymark_core::config::{PoseLayout, SessionConfig};
use waymark_core::traits::InputSource;
use waymark_sim::{Outcome, SessionSummary, kinematic_session, session_bindings};
use waymark_teleop::{InputActionMapper, ScriptedInput, TerminalKeys};

use crate::display::StatusLine;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Interactive session recorder for an embodied agent.
#[derive(Parser)]
#[command(name = "waymark", version, about)]
struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the agent from the keyboard and record every step.
    Record {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Run a session from a scripted key string.
    Replay {
        /// Keys to send; `^ v < >` are the arrow keys.
        #[arg(short, long)]
        keys: String,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Print the action catalog and key bindings.
    Info {
        /// Session config file (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct SessionArgs {
    /// Session config file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (frames go to `<output>/poses/`).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pose record layout.
    #[arg(short, long, value_enum)]
    layout: Option<LayoutArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// One 4x4 extrinsic matrix file per frame.
    Extrinsic,
    /// A single CSV of positions and view directions.
    DirectionCsv,
}

impl From<LayoutArg> for PoseLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Extrinsic => Self::Extrinsic,
            LayoutArg::DirectionCsv => Self::DirectionCsv,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

impl SessionArgs {
    fn resolve(&self) -> Result<SessionConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(output) = &self.output {
            config.output_dir.clone_from(output);
        }
        if let Some(layout) = self.layout {
            config.pose_layout = layout.into();
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_record(args: &SessionArgs) -> Result<()> {
    let config = args.resolve()?;
    println!("w/s forward/back, a/d turn, arrows look, f finish, esc quit");
    let keys = TerminalKeys::open().context("failed to put terminal in raw mode")?;
    let summary = run_session(&config, keys)?;
    report(&summary);
    Ok(())
}

fn run_replay(keys: &str, args: &SessionArgs) -> Result<()> {
    let config = args.resolve()?;
    let summary = run_session(&config, ScriptedInput::parse(keys))?;
    report(&summary);
    Ok(())
}

fn run_session(config: &SessionConfig, input: impl InputSource) -> Result<SessionSummary> {
    let mut session =
        kinematic_session(config, input, StatusLine).context("failed to start session")?;
    session.run().context("session failed")
}

fn report(summary: &SessionSummary) {
    println!(
        "recorded {} frame(s) to {}",
        summary.steps,
        summary.output_dir.display()
    );
    match summary.outcome {
        Outcome::Success => println!("episode succeeded"),
        Outcome::Failure => println!(
            "episode failed (distance to goal {:.2} m)",
            summary.goal_distance.unwrap_or(f32::NAN)
        ),
        Outcome::NotApplicable => {}
    }
}

fn run_info(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let space = ActionSpaceExtender::from_config(&config.actions).build()?;
    let bindings = session_bindings(&config, &space.catalog)?;
    let mapper = InputActionMapper::new(&space.catalog, &bindings)?;

    println!("waymark v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("actions:");
    for action in space.catalog.iter() {
        let spec = &space.actuation[action.name()];
        let kind = if action.is_builtin() { "builtin" } else { "custom" };
        let target = if spec.body_action { "body" } else { "sensor" };
        println!(
            "  {:>2}  {:<14} {:<8} {:<7} {}",
            action.id().0,
            action.name(),
            kind,
            target,
            spec.amount
        );
    }
    println!();
    println!("bindings:");
    for (code, action) in mapper.bindings() {
        println!("  {:<6} {}", code.to_string(), action.name());
    }
    println!();
    println!("output:  {}", config.output_dir.display());
    println!("layout:  {}", config.pose_layout);
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let raw_terminal = matches!(cli.command, Commands::Record { .. });
    logging::init(cli.verbose, raw_terminal);

    match &cli.command {
        Commands::Record { session } => run_record(session),
        Commands::Replay { keys, session } => run_replay(keys, session),
        Commands::Info { config } => run_info(config.as_deref()),
    }
}
