//! Round state: phases, events and the controller that owns the target
//!
//! Phase changes go through the pure [`transition`] function; the
//! controller applies the side effects (level resets, scoring, events).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionEngine;
use super::knife::{Knife, KnifePose};
use super::target::Target;
use crate::tuning::CollisionTuning;
use crate::{ScalingContext, Tuning};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for the player to start
    Menu,
    /// Knives can be thrown
    Playing,
    /// A knife clashed with `offender`; the target keeps spinning for
    /// `remaining` seconds before the round is lost
    CollisionPause { remaining: f32, offender: usize },
    /// Every knife of the level landed
    LevelComplete,
    /// Round lost
    GameOver,
}

/// Inputs to the phase machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhaseSignal {
    /// Player acknowledged the current screen
    Advance,
    /// The last knife of the level stuck cleanly
    QuotaExhausted,
    /// A knife landed too close to stuck knife `offender`
    KnifeCollision { offender: usize, pause: f32 },
    /// A knife left the screen without touching the target
    KnifeMissed,
    /// The collision pause ran out
    PauseElapsed,
}

/// Next phase for `signal`. Signals that do not apply leave the phase as is.
pub fn transition(phase: RoundPhase, signal: PhaseSignal) -> RoundPhase {
    use PhaseSignal as S;
    use RoundPhase as P;

    match (phase, signal) {
        (P::Menu, S::Advance) | (P::LevelComplete, S::Advance) => P::Playing,
        (P::GameOver, S::Advance) => P::Menu,
        (P::Playing, S::QuotaExhausted) => P::LevelComplete,
        (P::Playing, S::KnifeCollision { offender, pause }) => P::CollisionPause {
            remaining: pause.max(0.0),
            offender,
        },
        (P::Playing, S::KnifeMissed) => P::GameOver,
        (P::CollisionPause { .. }, S::PauseElapsed) => P::GameOver,
        (phase, _) => phase,
    }
}

/// Things the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    LevelStarted { level: u32 },
    KnifeThrown { knives_left: u32 },
    KnifeStuck { angle: f32, index: usize },
    KnifeCollided { angle: f32, offender: usize, separation: f32 },
    KnifeMissed,
    LevelCleared { level: u32, score: u64 },
    RoundLost { level: u32, score: u64 },
    ReturnedToMenu,
}

/// Owns the target, the knife in hand and the round bookkeeping
#[derive(Debug, Clone)]
pub struct RoundController {
    pub(super) tuning: Tuning,
    /// Latest window size; the target adopts it on the next level reset
    pub(super) scaling: ScalingContext,
    pub(super) engine: CollisionEngine,
    pub(super) target: Target,
    pub(super) knife: Knife,
    pub(super) phase: RoundPhase,
    pub(super) level: u32,
    pub(super) score: u64,
    pub(super) knives_left: u32,
    pub(super) seed: u64,
    pub(super) rng: Pcg32,
    pub(super) events: Vec<RoundEvent>,
}

impl RoundController {
    /// New controller sitting in the menu, with level 1 laid out behind it
    pub fn new(tuning: Tuning, width: f32, height: f32, seed: u64) -> Self {
        let layout = &tuning.layout;
        let scaling = ScalingContext::with_reference(
            layout.reference_width,
            layout.reference_height,
            width,
            height,
        );
        let engine = CollisionEngine::new(CollisionTuning {
            knife_length: layout.knife_length,
            ..tuning.collision
        });
        let target = Target::new(scaling, layout);
        let knife = Knife::ready(&scaling, layout);

        let mut round = Self {
            knives_left: tuning.progression.knives_per_level,
            tuning,
            scaling,
            engine,
            target,
            knife,
            phase: RoundPhase::Menu,
            level: 1,
            score: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        round.init_level();
        round.events.clear();
        round
    }

    #[inline]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn knives_left(&self) -> u32 {
        self.knives_left
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn target(&self) -> &Target {
        &self.target
    }

    #[inline]
    pub fn knife(&self) -> &Knife {
        &self.knife
    }

    #[inline]
    pub fn engine(&self) -> &CollisionEngine {
        &self.engine
    }

    #[inline]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    #[inline]
    pub fn scaling(&self) -> &ScalingContext {
        &self.scaling
    }

    /// Pose of the knife in hand (or the one that just clashed)
    pub fn knife_pose(&self) -> KnifePose {
        KnifePose {
            position: self.knife.position(),
            rotation: self.knife.render_rotation(self.target.rotation()),
        }
    }

    /// Every knife attached to the target this frame, including a knife
    /// that clashed and is shown stuck during the collision pause
    pub fn stuck_poses(&self) -> Vec<KnifePose> {
        let mut poses = self.target.stuck_poses();
        if self.knife.is_stuck() {
            poses.push(self.knife_pose());
        }
        poses
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record a window resize. The geometry switches over at the next level
    /// reset so a level in progress keeps consistent stuck distances.
    pub fn set_dimensions(&mut self, width: f32, height: f32) {
        self.scaling.set_dimensions(width, height);
        log::info!("Window resized to {}x{}", self.scaling.width(), self.scaling.height());
    }

    /// Acknowledge the current screen: start, next level, or back to menu
    pub fn advance(&mut self) {
        let next = transition(self.phase, PhaseSignal::Advance);
        match (self.phase, next) {
            (RoundPhase::Menu, RoundPhase::Playing) => {
                self.level = 1;
                self.score = 0;
                self.init_level();
            }
            (RoundPhase::LevelComplete, RoundPhase::Playing) => {
                self.level += 1;
                self.init_level();
            }
            (RoundPhase::GameOver, RoundPhase::Menu) => {
                self.level = 1;
                self.score = 0;
                self.init_level();
                self.events.push(RoundEvent::ReturnedToMenu);
            }
            _ => return,
        }
        log::info!("{:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Throw the knife in hand. Returns whether a throw happened.
    pub fn throw_knife(&mut self) -> bool {
        if self.phase != RoundPhase::Playing || self.knives_left == 0 {
            return false;
        }
        let speed = self.tuning.layout.knife_speed_ratio * self.target.scaling().height();
        if !self.knife.throw(-speed) {
            return false;
        }
        self.knives_left -= 1;
        self.events.push(RoundEvent::KnifeThrown {
            knives_left: self.knives_left,
        });
        true
    }

    /// Lay out the current level and hand the player a fresh knife
    pub(super) fn init_level(&mut self) {
        self.target.reset(
            self.level,
            self.scaling,
            &self.tuning.progression,
            &self.engine,
            &mut self.rng,
        );
        self.knives_left = self.tuning.progression.knives_per_level;
        self.spawn_knife();
        self.events.push(RoundEvent::LevelStarted { level: self.level });
    }

    pub(super) fn spawn_knife(&mut self) {
        self.knife = Knife::ready(self.target.scaling(), &self.tuning.layout);
    }
}
