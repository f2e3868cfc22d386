#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Outbreak headless.

mod autopilot;
mod logging;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result as AnyResult};
use clap::Parser;
use log::info;
use outbreak_driver::{
    AudioAssets, Collaborators, DriverConfig, FrameDriver, FreeLook, SilentAudio, SteppedClock,
};
use outbreak_rendering::HeadlessBackend;
use outbreak_world::query;

use self::autopilot::{Autopilot, HeadlessInput};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the level layout, respawn draws, and autopilot
    #[arg(long, default_value_t = 0x42f0_e1eb_d4a5_3c21)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,

    /// Simulated duration of each tick in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Play with seeded scripted input instead of idling on the title screen
    #[arg(long)]
    autopilot: bool,

    /// Directory holding the sound files
    #[arg(long, default_value = "wav")]
    assets: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Outbreak command-line interface.
fn main() -> AnyResult<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let input = if args.autopilot {
        HeadlessInput::Autopilot(Autopilot::new(args.seed))
    } else {
        HeadlessInput::Idle
    };

    let mut driver = FrameDriver::new(
        DriverConfig::new(args.seed),
        &AudioAssets::new(args.assets),
        Collaborators {
            audio: SilentAudio::new(),
            input,
            locomotion: FreeLook::default(),
            clock: SteppedClock::new(Duration::from_millis(args.frame_ms)),
            renderer: HeadlessBackend::new(),
        },
    )
    .context("failed to start the frame driver")?;

    let ticks = driver
        .run(Some(args.ticks))
        .context("simulation aborted")?;

    let world = driver.world();
    let progress = query::progress(world);
    let player = query::player(world);
    info!(
        "{ticks} ticks: state {:?}, {} kills, score {}, health {}%, {} seconds elapsed",
        query::game_state(world),
        progress.kills,
        progress.score,
        player.health_percentage(),
        progress.elapsed_seconds
    );
    Ok(())
}
