//! The thrown knife
//!
//! A knife is free-moving until it sticks. After that it has no position of
//! its own: the stored polar pair plus the target's current rotation decide
//! where it is drawn.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ScalingContext;
use crate::tuning::LayoutTuning;
use crate::{normalize_degrees, polar_to_cartesian};

/// Screen angle of a blade pointing straight up (y grows downward)
pub const UPRIGHT_ROTATION: f32 = 270.0;

/// Knife lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KnifeState {
    /// Waiting at the spawn point
    Ready,
    /// Thrown, moving along the vertical axis
    Flying { velocity_y: f32 },
    /// Attached to the target at `angle` (relative to target rotation) and
    /// `distance` from its centre
    Stuck { angle: f32, distance: f32 },
}

/// Where to draw a knife this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnifePose {
    pub position: Vec2,
    /// Degrees, direction the handle points
    pub rotation: f32,
}

impl KnifePose {
    /// Pose of a knife stuck at (`angle`, `distance`) on a target centred at
    /// `center` and rotated by `rotation` degrees
    pub fn on_target(center: Vec2, rotation: f32, angle: f32, distance: f32) -> Self {
        let absolute = normalize_degrees(angle + rotation);
        Self {
            position: center + polar_to_cartesian(distance, absolute),
            rotation: absolute,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Knife {
    pos: Vec2,
    state: KnifeState,
}

impl Knife {
    /// A fresh knife at the spawn point for the given window
    pub fn ready(scaling: &ScalingContext, layout: &LayoutTuning) -> Self {
        Self {
            pos: scaling.ratio_point(layout.knife_start_x_ratio, layout.knife_start_y_ratio),
            state: KnifeState::Ready,
        }
    }

    /// A ready knife at an explicit position
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            state: KnifeState::Ready,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn state(&self) -> KnifeState {
        self.state
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, KnifeState::Ready)
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        matches!(self.state, KnifeState::Flying { .. })
    }

    /// Thrown at some point (flying or stuck)
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.is_ready()
    }

    #[inline]
    pub fn is_stuck(&self) -> bool {
        matches!(self.state, KnifeState::Stuck { .. })
    }

    pub fn velocity_y(&self) -> f32 {
        match self.state {
            KnifeState::Flying { velocity_y } => velocity_y,
            _ => 0.0,
        }
    }

    pub fn stuck_angle(&self) -> Option<f32> {
        match self.state {
            KnifeState::Stuck { angle, .. } => Some(angle),
            _ => None,
        }
    }

    pub fn distance_from_center(&self) -> Option<f32> {
        match self.state {
            KnifeState::Stuck { distance, .. } => Some(distance),
            _ => None,
        }
    }

    /// Launch a ready knife. Returns false if it was already thrown.
    pub fn throw(&mut self, velocity_y: f32) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.state = KnifeState::Flying { velocity_y };
        true
    }

    /// Move a flying knife; ready and stuck knives stay put
    pub fn update(&mut self, dt: f32) {
        if let KnifeState::Flying { velocity_y } = self.state {
            self.pos.y += velocity_y * dt;
        }
    }

    /// Unit vector along the direction of travel. A knife that is not moving
    /// is treated as aimed upward.
    pub fn travel_dir(&self) -> Vec2 {
        if self.velocity_y() > 0.0 {
            Vec2::Y
        } else {
            Vec2::NEG_Y
        }
    }

    /// Blade point for a knife whose scaled length is `2 * half_length`
    pub fn tip(&self, half_length: f32) -> Vec2 {
        self.pos + self.travel_dir() * half_length
    }

    /// Handle-facing rotation for drawing
    pub fn render_rotation(&self, target_rotation: f32) -> f32 {
        match self.state {
            KnifeState::Stuck { angle, .. } => normalize_degrees(angle + target_rotation),
            _ if self.velocity_y() > 0.0 => 90.0,
            _ => UPRIGHT_ROTATION,
        }
    }

    pub(super) fn stick(&mut self, angle: f32, distance: f32) {
        self.state = KnifeState::Stuck {
            angle: normalize_degrees(angle),
            distance,
        };
    }

    pub(super) fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}
