//! Game balance and reference-space geometry
//!
//! All lengths here are in reference pixels (see [`crate::ScalingContext`]).
//! Nothing in this module is scaled; consumers convert at the point of use.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::consts::{REFERENCE_HEIGHT, REFERENCE_WIDTH};

#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("could not read tuning file: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(String),
}

/// Where things sit on screen, and how big they are
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    pub reference_width: f32,
    pub reference_height: f32,
    pub target_radius: f32,
    /// Target centre as fractions of the window
    pub target_x_ratio: f32,
    pub target_y_ratio: f32,
    pub knife_length: f32,
    pub knife_width: f32,
    /// Spawn point of a ready knife as fractions of the window
    pub knife_start_x_ratio: f32,
    pub knife_start_y_ratio: f32,
    /// Throw speed in window heights per second
    pub knife_speed_ratio: f32,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            reference_width: REFERENCE_WIDTH,
            reference_height: REFERENCE_HEIGHT,
            target_radius: 280.0,
            target_x_ratio: 0.5,
            target_y_ratio: 0.35,
            knife_length: 180.0,
            knife_width: 24.0,
            knife_start_x_ratio: 0.5,
            knife_start_y_ratio: 0.8,
            knife_speed_ratio: 1.5,
        }
    }
}

/// Collision thresholds in reference pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// Slack between the blade tip and the rim that still counts as contact
    pub contact_threshold: f32,
    /// How deep the blade sinks into the wood once stuck
    pub tip_penetration: f32,
    /// Handles are compared at target radius + this offset
    pub handle_offset: f32,
    /// Minimum arc length between two handles
    pub min_separation: f32,
    /// Full knife length, used for the tip offset and stuck distance
    pub knife_length: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            contact_threshold: 5.0,
            tip_penetration: 20.0,
            handle_offset: 90.0,
            min_separation: 65.0,
            knife_length: LayoutTuning::default().knife_length,
        }
    }
}

/// Level progression and scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub knives_per_level: u32,
    pub points_per_knife: u64,
    /// Degrees per second at level 0
    pub base_rotation_speed: f32,
    /// Extra degrees per second per level
    pub rotation_speed_increment: f32,
    /// Levels strictly above this may spin backwards
    pub reverse_rotation_level: u32,
    pub max_pre_stuck_knives: u32,
    /// Seconds the target keeps spinning after a knife clash
    pub collision_pause: f32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            knives_per_level: 8,
            points_per_knife: 10,
            base_rotation_speed: 30.0,
            rotation_speed_increment: 15.0,
            reverse_rotation_level: 3,
            max_pre_stuck_knives: 4,
            collision_pause: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub layout: LayoutTuning,
    pub collision: CollisionTuning,
    pub progression: ProgressionTuning,
}

impl Tuning {
    /// Parse and validate tuning from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.sync_knife_length();
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let tuning = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The collision section mirrors the layout's knife length
    fn sync_knife_length(&mut self) {
        self.collision.knife_length = self.layout.knife_length;
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let layout = &self.layout;
        let positive = [
            ("layout.reference_width", layout.reference_width),
            ("layout.reference_height", layout.reference_height),
            ("layout.target_radius", layout.target_radius),
            ("layout.knife_length", layout.knife_length),
            ("layout.knife_width", layout.knife_width),
            ("layout.knife_speed_ratio", layout.knife_speed_ratio),
            ("collision.min_separation", self.collision.min_separation),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("collision.contact_threshold", self.collision.contact_threshold),
            ("collision.tip_penetration", self.collision.tip_penetration),
            ("collision.handle_offset", self.collision.handle_offset),
            ("progression.base_rotation_speed", self.progression.base_rotation_speed),
            ("progression.rotation_speed_increment", self.progression.rotation_speed_increment),
            ("progression.collision_pause", self.progression.collision_pause),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid(format!("{name} must not be negative, got {value}")));
            }
        }

        let ratios = [
            ("layout.target_x_ratio", layout.target_x_ratio),
            ("layout.target_y_ratio", layout.target_y_ratio),
            ("layout.knife_start_x_ratio", layout.knife_start_x_ratio),
            ("layout.knife_start_y_ratio", layout.knife_start_y_ratio),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }

        if self.progression.knives_per_level == 0 {
            return Err(TuningError::Invalid(
                "progression.knives_per_level must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
