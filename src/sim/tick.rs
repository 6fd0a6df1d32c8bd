//! Per-frame simulation step
//!
//! The host hands over an elapsed time once per frame. It is clamped and cut
//! into fixed substeps so a fast knife cannot jump over the rim in one step.

use super::collision::CollisionOutcome;
use super::state::{PhaseSignal, RoundController, RoundEvent, RoundPhase, transition};
use crate::consts::{MAX_FRAME_DT, SIM_DT};

/// Extra degrees of clearance autoplay wants on each side of a throw
const AUTOPLAY_MARGIN: f32 = 4.0;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Throw the knife in hand (click/tap/space)
    pub throw: bool,
    /// Start, continue, or return to the menu
    pub advance: bool,
    /// Idle/demo mode - throws on its own when the landing spot is clear
    pub autoplay: bool,
}

/// Apply one frame of input, then advance the simulation by `dt`
pub fn tick(round: &mut RoundController, input: &TickInput, dt: f32) {
    let mut input = input.clone();
    if input.autoplay {
        match round.phase() {
            RoundPhase::Menu | RoundPhase::LevelComplete => input.advance = true,
            RoundPhase::Playing => input.throw = round.autoplay_wants_throw(),
            _ => {}
        }
    }

    if input.advance {
        round.advance();
    }
    if input.throw {
        round.throw_knife();
    }
    round.update(dt);
}

impl RoundController {
    /// Advance by `dt` seconds of wall time
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        let mut remaining = dt;
        while remaining > f32::EPSILON {
            let step = remaining.min(SIM_DT);
            self.step(step);
            remaining -= step;
        }
    }

    fn step(&mut self, dt: f32) {
        match self.phase {
            RoundPhase::Playing => self.step_playing(dt),
            RoundPhase::CollisionPause { remaining, offender } => {
                self.target.update(dt);
                self.engine.update_stuck_position(&mut self.knife, &self.target);

                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.phase = transition(self.phase, PhaseSignal::PauseElapsed);
                    log::info!("Round lost at level {} with {} points", self.level, self.score);
                    self.events.push(RoundEvent::RoundLost {
                        level: self.level,
                        score: self.score,
                    });
                } else {
                    self.phase = RoundPhase::CollisionPause { remaining, offender };
                }
            }
            RoundPhase::Menu | RoundPhase::LevelComplete | RoundPhase::GameOver => {}
        }
    }

    fn step_playing(&mut self, dt: f32) {
        self.target.update(dt);
        self.knife.update(dt);

        let angle = match self.engine.check_target_contact(&self.knife, &self.target) {
            CollisionOutcome::TargetContact { angle, .. } => angle,
            _ => {
                if self.knife_left_screen() {
                    log::info!("Knife missed the target");
                    self.events.push(RoundEvent::KnifeMissed);
                    self.phase = transition(self.phase, PhaseSignal::KnifeMissed);
                }
                return;
            }
        };

        let clash = self
            .engine
            .check_stuck_collision(angle, self.target.stuck_knives(), &self.target);
        if let CollisionOutcome::KnifeCollision { index, separation } = clash {
            // Stick it anyway so the player sees where it hit
            self.engine.resolve_stick(&mut self.knife, &self.target, angle);
            log::info!(
                "Knife at {angle:.1} deg hit knife {index} ({separation:.1}px apart)"
            );
            self.events.push(RoundEvent::KnifeCollided {
                angle,
                offender: index,
                separation,
            });
            self.phase = transition(
                self.phase,
                PhaseSignal::KnifeCollision {
                    offender: index,
                    pause: self.tuning.progression.collision_pause,
                },
            );
            return;
        }

        self.engine.resolve_stick(&mut self.knife, &self.target, angle);
        let distance = self.knife.distance_from_center().unwrap_or_default();
        self.target.add_stuck_knife(angle, distance);
        self.score += self.tuning.progression.points_per_knife;
        self.events.push(RoundEvent::KnifeStuck {
            angle,
            index: self.target.stuck_knives().len() - 1,
        });
        log::debug!("Knife stuck at {angle:.1} deg, score {}", self.score);
        self.spawn_knife();

        if self.knives_left == 0 {
            self.phase = transition(self.phase, PhaseSignal::QuotaExhausted);
            log::info!("Level {} cleared with {} points", self.level, self.score);
            self.events.push(RoundEvent::LevelCleared {
                level: self.level,
                score: self.score,
            });
        }
    }

    /// The blade has passed the far edge of the window
    fn knife_left_screen(&self) -> bool {
        if !self.knife.is_flying() {
            return false;
        }
        let scaling = self.target.scaling();
        let tip = self.knife.tip(self.engine.half_knife_length(&self.target));
        tip.y < 0.0 || tip.y > scaling.height()
    }

    /// Angle (target frame) the knife in hand would stick at if thrown now
    pub fn predicted_stick_angle(&self) -> Option<f32> {
        if !self.knife.is_ready() {
            return None;
        }
        let target = &self.target;
        let speed = self.tuning.layout.knife_speed_ratio * target.scaling().height();
        let center = target.center();
        let half = self.engine.half_knife_length(target);
        let contact_gap = target.radius()
            + target.scaling().uniform(self.engine.params().contact_threshold);

        // Vertical travel until the tip is within contact range
        let offset = self.knife.position() - center;
        let reach_sq = contact_gap * contact_gap - offset.x * offset.x;
        if reach_sq < 0.0 || speed <= 0.0 {
            return None;
        }
        let travel = (offset.y - half - reach_sq.sqrt()).max(0.0);
        let flight_time = travel / speed;

        let rotation_at_hit = target.rotation() + target.rotation_speed() * flight_time;
        let landing = offset - glam::Vec2::new(0.0, travel);
        let absolute = landing.y.atan2(landing.x).to_degrees();
        Some(crate::normalize_degrees(absolute - rotation_at_hit))
    }

    /// Autoplay throws only when the landing spot and its margin are clear
    pub(super) fn autoplay_wants_throw(&self) -> bool {
        let Some(angle) = self.predicted_stick_angle() else {
            return false;
        };
        let stuck = self.target.stuck_knives();
        [-AUTOPLAY_MARGIN, 0.0, AUTOPLAY_MARGIN].iter().all(|delta| {
            !self
                .engine
                .check_stuck_collision(angle + delta, stuck, &self.target)
                .is_contact()
        })
    }
}
