//! Knife Strike entry point
//!
//! Runs the simulation headless with autoplay so a round can be watched in
//! the log. Rendering and input live in a separate front end.
//!
//! Usage: `knife-strike [WIDTH HEIGHT [SEED [FRAMES]]]`
//! Set `KNIFE_STRIKE_TUNING` to a JSON file to override the balance.

use knife_strike::Tuning;
use knife_strike::sim::{RoundController, RoundEvent, RoundPhase, TickInput, tick};

/// Host frame rate
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 60 * 120;

struct Options {
    width: f32,
    height: f32,
    seed: u64,
    frames: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1920.0,
            seed: 42,
            frames: DEFAULT_FRAMES,
        }
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, name: &str, default: T) -> T {
    match args.get(index) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {name} {raw:?}");
            default
        }),
        None => default,
    }
}

fn parse_options() -> Options {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let defaults = Options::default();
    Options {
        width: parse_arg(&args, 0, "width", defaults.width),
        height: parse_arg(&args, 1, "height", defaults.height),
        seed: parse_arg(&args, 2, "seed", defaults.seed),
        frames: parse_arg(&args, 3, "frame count", defaults.frames),
    }
}

fn load_tuning() -> Tuning {
    match std::env::var("KNIFE_STRIKE_TUNING") {
        Ok(path) => Tuning::load(&path).unwrap_or_else(|err| {
            log::warn!("{err}; using default tuning");
            Tuning::default()
        }),
        Err(_) => Tuning::default(),
    }
}

fn main() {
    env_logger::init();
    let options = parse_options();
    log::info!(
        "Knife Strike (headless) {}x{} seed {}",
        options.width,
        options.height,
        options.seed
    );

    let mut round = RoundController::new(load_tuning(), options.width, options.height, options.seed);
    let input = TickInput {
        autoplay: true,
        ..Default::default()
    };

    let mut throws = 0u32;
    for frame in 0..options.frames {
        tick(&mut round, &input, FRAME_DT);

        for event in round.drain_events() {
            match event {
                RoundEvent::KnifeThrown { .. } => throws += 1,
                RoundEvent::KnifeStuck { angle, index } => {
                    log::debug!("frame {frame}: knife #{index} stuck at {angle:.1} deg");
                }
                RoundEvent::LevelCleared { level, score } => {
                    println!("Level {level} cleared, score {score}");
                }
                other => log::debug!("frame {frame}: {other:?}"),
            }
        }

        if round.phase() == RoundPhase::GameOver {
            break;
        }
    }

    println!(
        "Finished at level {} with {} points after {} throws ({:?})",
        round.level(),
        round.score(),
        throws,
        round.phase()
    );
}
