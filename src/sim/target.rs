//! The rotating target and the knives stuck in it

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::CollisionEngine;
use super::knife::KnifePose;
use crate::ScalingContext;
use crate::consts::FULL_TURN;
use crate::normalize_degrees;
use crate::tuning::{LayoutTuning, ProgressionTuning};

/// Random draws allowed per pre-stuck knife before it is skipped
const PRE_STUCK_ATTEMPTS: u32 = 32;

/// A knife stuck in the target, in the target's rotating frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StuckKnife {
    /// Degrees relative to the target's rotation at stick time
    pub angle: f32,
    /// Fixed distance from the target centre
    pub distance: f32,
}

impl StuckKnife {
    pub fn pose(&self, target: &Target) -> KnifePose {
        target.stuck_pose(self.angle, self.distance)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    scaling: ScalingContext,
    /// Reference-space radius
    base_radius: f32,
    x_ratio: f32,
    y_ratio: f32,
    /// Degrees, always in [0, 360)
    rotation: f32,
    /// Degrees per second; the sign is the direction
    rotation_speed: f32,
    /// Insertion order is never changed
    stuck: Vec<StuckKnife>,
}

impl Target {
    pub fn new(scaling: ScalingContext, layout: &LayoutTuning) -> Self {
        Self {
            scaling,
            base_radius: layout.target_radius,
            x_ratio: layout.target_x_ratio,
            y_ratio: layout.target_y_ratio,
            rotation: 0.0,
            rotation_speed: 0.0,
            stuck: Vec::new(),
        }
    }

    #[inline]
    pub fn scaling(&self) -> &ScalingContext {
        &self.scaling
    }

    /// Centre in window pixels, derived from the current window size
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.scaling.ratio_point(self.x_ratio, self.y_ratio)
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.scaling.uniform(self.base_radius)
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees);
    }

    pub fn set_rotation_speed(&mut self, degrees_per_sec: f32) {
        self.rotation_speed = degrees_per_sec;
    }

    /// Seconds for one full turn, or None when the target is still
    pub fn full_rotation_period(&self) -> Option<f32> {
        (self.rotation_speed != 0.0).then(|| FULL_TURN / self.rotation_speed.abs())
    }

    #[inline]
    pub fn stuck_knives(&self) -> &[StuckKnife] {
        &self.stuck
    }

    pub fn add_stuck_knife(&mut self, angle: f32, distance: f32) {
        self.stuck.push(StuckKnife {
            angle: normalize_degrees(angle),
            distance,
        });
    }

    /// Pose of a knife at (`angle`, `distance`) for the current rotation
    pub fn stuck_pose(&self, angle: f32, distance: f32) -> KnifePose {
        KnifePose::on_target(self.center(), self.rotation, angle, distance)
    }

    /// Poses of every stuck knife, in insertion order
    pub fn stuck_poses(&self) -> Vec<KnifePose> {
        self.stuck.iter().map(|k| k.pose(self)).collect()
    }

    pub fn update(&mut self, dt: f32) {
        self.rotation = normalize_degrees(self.rotation + self.rotation_speed * dt);
    }

    /// Set up the target for `level`: adopt the current window size, pick the
    /// spin, and decorate it with pre-stuck knives on later levels
    pub fn reset<R: Rng>(
        &mut self,
        level: u32,
        scaling: ScalingContext,
        progression: &ProgressionTuning,
        engine: &CollisionEngine,
        rng: &mut R,
    ) {
        self.scaling = scaling;
        self.rotation = 0.0;
        self.rotation_speed =
            progression.base_rotation_speed + level as f32 * progression.rotation_speed_increment;
        if level > progression.reverse_rotation_level && rng.random_bool(0.5) {
            self.rotation_speed = -self.rotation_speed;
        }

        self.stuck.clear();
        let wanted = level.saturating_sub(1).min(progression.max_pre_stuck_knives);
        let distance = engine.stuck_distance(self);
        for _ in 0..wanted {
            let placed = (0..PRE_STUCK_ATTEMPTS)
                .map(|_| rng.random_range(0.0..FULL_TURN))
                .find(|&angle| {
                    !engine
                        .check_stuck_collision(angle, &self.stuck, self)
                        .is_contact()
                });
            match placed {
                Some(angle) => self.add_stuck_knife(angle, distance),
                None => log::warn!("Level {level}: no room for another pre-stuck knife"),
            }
        }

        log::info!(
            "Level {level}: speed={:.1} deg/s, radius={:.1}px, pre-stuck={}",
            self.rotation_speed,
            self.radius(),
            self.stuck.len()
        );
    }
}
