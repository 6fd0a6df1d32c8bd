//! Knife Strike - throw knives at a spinning target without hitting the others
//!
//! Core modules:
//! - `scaling`: Reference resolution to window size conversion
//! - `tuning`: Data-driven geometry and game balance
//! - `sim`: Deterministic simulation (knife flight, collisions, round state)

pub mod scaling;
pub mod sim;
pub mod tuning;

pub use scaling::ScalingContext;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation step (120 Hz so a thrown knife cannot skip the rim)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Largest frame delta accepted by the round controller
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Design-time screen size every reference constant is authored against
    pub const REFERENCE_WIDTH: f32 = 1080.0;
    pub const REFERENCE_HEIGHT: f32 = 1920.0;

    /// Degrees in a full turn
    pub const FULL_TURN: f32 = 360.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(consts::FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= consts::FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, degrees) to a cartesian offset
#[inline]
pub fn polar_to_cartesian(r: f32, degrees: f32) -> Vec2 {
    let theta = degrees.to_radians();
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert a cartesian offset to polar (r, degrees in [0, 360))
#[inline]
pub fn cartesian_to_polar(offset: Vec2) -> (f32, f32) {
    (
        offset.length(),
        normalize_degrees(offset.y.atan2(offset.x).to_degrees()),
    )
}
