//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time comes from the caller, never from a clock
//! - Seeded RNG only
//! - Stuck knives are checked in insertion order
//! - No rendering or platform dependencies

pub mod collision;
pub mod knife;
pub mod state;
pub mod target;
pub mod tick;

pub use collision::{CollisionEngine, CollisionOutcome, angular_distance, arc_separation};
pub use knife::{Knife, KnifePose, KnifeState};
pub use state::{PhaseSignal, RoundController, RoundEvent, RoundPhase, transition};
pub use target::{StuckKnife, Target};
pub use tick::{TickInput, tick};
