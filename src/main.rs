//! Replays recorded head pose and eye landmark traces through the gesture pipeline.

use anyhow::{bail, Context, Result};
use blink_pilot::{
    config::{Config, EXAMPLE_CONFIG},
    cursor_control::DryRunActuator,
    cursor_smoother::ScreenSize,
    interfaces::{ClickKind, CursorActuator},
    orchestrator::GestureOrchestrator,
    trace::{Trace, TraceProvider},
    tuning::TuningHandle,
};
use clap::Parser;
use log::{info, warn};
use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded trace to replay (YAML)
    #[arg(short, long, required_unless_present = "print_config")]
    trace: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Log actions instead of moving the pointer
    #[arg(long)]
    dry_run: bool,

    /// Replay at recorded speed instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Override pointer sensitivity
    #[arg(short, long)]
    sensitivity: Option<f64>,

    /// Override pointer deadzone
    #[arg(long)]
    deadzone: Option<f64>,

    /// Override blink click interval, in seconds
    #[arg(long)]
    click_interval: Option<f64>,

    /// Screen size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_screen)]
    screen: Option<ScreenSize>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn parse_screen(value: &str) -> std::result::Result<ScreenSize, String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width = w.trim().parse::<u32>().map_err(|e| format!("invalid width: {e}"))?;
    let height = h.trim().parse::<u32>().map_err(|e| format!("invalid height: {e}"))?;
    if width == 0 || height == 0 {
        return Err("screen size must be non-zero".to_string());
    }
    Ok(ScreenSize::new(width, height))
}

#[cfg(feature = "x11")]
fn connect_x11() -> Option<Box<dyn CursorActuator>> {
    match blink_pilot::cursor_control::CursorController::new() {
        Ok(controller) => {
            info!("X11 cursor control initialized");
            Some(Box::new(controller))
        }
        Err(e) => {
            warn!("Failed to initialize cursor control: {}. Falling back to dry run.", e);
            None
        }
    }
}

#[cfg(not(feature = "x11"))]
fn connect_x11() -> Option<Box<dyn CursorActuator>> {
    warn!("Built without X11 support, falling back to dry run");
    None
}

fn create_actuator(dry_run: bool, screen: Option<ScreenSize>) -> Box<dyn CursorActuator> {
    let live = if dry_run { None } else { connect_x11() };
    match live {
        Some(actuator) => actuator,
        None => Box::new(DryRunActuator::new(screen)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(sensitivity) = args.sensitivity {
        config.pointer.sensitivity = sensitivity;
    }
    if let Some(deadzone) = args.deadzone {
        config.pointer.deadzone = deadzone;
    }
    if let Some(interval) = args.click_interval {
        config.clicks.interval_secs = interval;
    }
    if args.screen.is_some() {
        config.screen = args.screen;
    }

    let tuning = TuningHandle::new(config.to_tuning().context("invalid configuration")?);

    let Some(trace_path) = args.trace else {
        bail!("no trace given");
    };
    let trace = Trace::from_file(&trace_path).with_context(|| format!("loading {}", trace_path.display()))?;

    let actuator = create_actuator(args.dry_run, config.screen);
    let mut pipeline = match config.screen {
        Some(screen) => GestureOrchestrator::with_screen(TraceProvider::new(), actuator, tuning, screen),
        None => GestureOrchestrator::new(TraceProvider::new(), actuator, tuning),
    };

    info!("Replaying {} frames ({:.1}s)", trace.frames.len(), trace.duration().as_secs_f64());

    let start = Instant::now();
    let mut clicks: Vec<ClickKind> = Vec::new();
    let mut blink_frames = 0usize;

    for frame in &trace.frames {
        let now = frame.at(start)?;
        if args.realtime {
            let wait = now.saturating_duration_since(Instant::now());
            if wait > Duration::ZERO {
                thread::sleep(wait);
            }
        }

        let outcome = pipeline.process_frame(frame, now)?;
        if outcome.blinked {
            blink_frames += 1;
        }
        clicks.extend(outcome.click);
    }

    let count = |kind: ClickKind| clicks.iter().filter(|&&c| c == kind).count();
    info!(
        "Done: {} blink frames, clicks: {} primary, {} secondary, {} double",
        blink_frames,
        count(ClickKind::Primary),
        count(ClickKind::Secondary),
        count(ClickKind::Double),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_screen() {
        assert_eq!(parse_screen("2560x1440"), Ok(ScreenSize::new(2560, 1440)));
        assert_eq!(parse_screen("800X600"), Ok(ScreenSize::new(800, 600)));
        assert!(parse_screen("1920").is_err());
        assert!(parse_screen("0x1080").is_err());
        assert!(parse_screen("wide x tall").is_err());
    }

    #[test]
    fn test_args_require_trace() {
        assert!(Args::try_parse_from(["blink-pilot"]).is_err());
        assert!(Args::try_parse_from(["blink-pilot", "--print-config"]).is_ok());

        let args = Args::try_parse_from(["blink-pilot", "-t", "run.yaml", "--dry-run", "--screen", "1280x720"]).unwrap();
        assert!(args.dry_run);
        assert_eq!(args.screen, Some(ScreenSize::new(1280, 720)));
    }
}
