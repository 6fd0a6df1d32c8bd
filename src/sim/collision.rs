//! Knife collision detection and stick resolution
//!
//! The knife-vs-knife rule works on arc length, not raw degrees: two handles
//! must be at least `min_separation` apart measured along the circle the
//! handles sit on. A wide target therefore fits more knives at the same
//! angular gap than a small one.
//!
//! All thresholds in [`CollisionTuning`] are reference pixels and are scaled
//! through the target's [`crate::ScalingContext`] at the point of use.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::knife::{Knife, KnifeState};
use super::target::{StuckKnife, Target};
use crate::tuning::CollisionTuning;
use crate::{cartesian_to_polar, normalize_degrees, polar_to_cartesian};

/// Result of a single collision check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionOutcome {
    NoContact,
    /// Blade reached the rim. `angle` is in the target's rotating frame.
    TargetContact { point: Vec2, angle: f32 },
    /// Would overlap the stuck knife at `index` (insertion order)
    KnifeCollision { index: usize, separation: f32 },
}

impl CollisionOutcome {
    #[inline]
    pub fn is_contact(&self) -> bool {
        !matches!(self, CollisionOutcome::NoContact)
    }
}

/// Minor-arc difference between two angles in degrees, in [0, 180]
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Arc length subtended by `degrees` on a circle of `radius`
#[inline]
pub fn arc_separation(degrees: f32, radius: f32) -> f32 {
    degrees.to_radians() * radius
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CollisionEngine {
    params: CollisionTuning,
}

impl CollisionEngine {
    pub fn new(params: CollisionTuning) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &CollisionTuning {
        &self.params
    }

    /// Half the knife length in window pixels
    pub fn half_knife_length(&self, target: &Target) -> f32 {
        target.scaling().uniform(self.params.knife_length) / 2.0
    }

    /// Radius at which handles are compared
    pub fn handle_radius(&self, target: &Target) -> f32 {
        target.radius() + target.scaling().uniform(self.params.handle_offset)
    }

    /// Minimum handle separation in window pixels
    pub fn min_separation(&self, target: &Target) -> f32 {
        target.scaling().uniform(self.params.min_separation)
    }

    /// Distance from the target centre to a stuck knife's anchor. The blade
    /// tip sits `tip_penetration` inside the rim.
    pub fn stuck_distance(&self, target: &Target) -> f32 {
        let scaling = target.scaling();
        (target.radius() + self.half_knife_length(target) - scaling.uniform(self.params.tip_penetration))
            .max(0.0)
    }

    /// Check whether a flying knife's blade has reached the target rim
    pub fn check_target_contact(&self, knife: &Knife, target: &Target) -> CollisionOutcome {
        if !knife.is_flying() {
            return CollisionOutcome::NoContact;
        }
        let radius = target.radius();
        if radius <= 0.0 {
            return CollisionOutcome::NoContact;
        }

        let center = target.center();
        let tip = knife.tip(self.half_knife_length(target));
        let threshold = target.scaling().uniform(self.params.contact_threshold);

        if tip.distance(center) > radius + threshold {
            return CollisionOutcome::NoContact;
        }

        let (_, absolute) = cartesian_to_polar(knife.position() - center);
        let angle = normalize_degrees(absolute - target.rotation());
        let point = center + polar_to_cartesian(radius, absolute);
        CollisionOutcome::TargetContact { point, angle }
    }

    /// Check an incoming stick angle against every stuck knife. The first
    /// knife in insertion order that is too close is reported.
    pub fn check_stuck_collision(
        &self,
        incoming_angle: f32,
        stuck: &[StuckKnife],
        target: &Target,
    ) -> CollisionOutcome {
        if stuck.is_empty() {
            return CollisionOutcome::NoContact;
        }

        let handle_radius = self.handle_radius(target);
        let min_separation = self.min_separation(target);

        for (index, other) in stuck.iter().enumerate() {
            let gap = angular_distance(incoming_angle, other.angle);
            let separation = arc_separation(gap, handle_radius);
            log::debug!(
                "knife {index}: angle={:.1} gap={gap:.2}deg separation={separation:.1}px min={min_separation:.1}px",
                other.angle
            );
            if separation < min_separation {
                return CollisionOutcome::KnifeCollision { index, separation };
            }
        }

        CollisionOutcome::NoContact
    }

    /// Attach `knife` to `target` at `angle` (target frame) and place it
    /// for the current frame
    pub fn resolve_stick(&self, knife: &mut Knife, target: &Target, angle: f32) {
        knife.stick(angle, self.stuck_distance(target));
        self.update_stuck_position(knife, target);
    }

    /// Re-derive a stuck knife's position from its polar pair and the
    /// target's current rotation
    pub fn update_stuck_position(&self, knife: &mut Knife, target: &Target) {
        if let KnifeState::Stuck { angle, distance } = knife.state() {
            knife.set_position(target.stuck_pose(angle, distance).position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScalingContext;
    use crate::tuning::LayoutTuning;
    use proptest::prelude::*;

    fn reference_target() -> Target {
        Target::new(ScalingContext::default(), &LayoutTuning::default())
    }

    fn stuck(angles: &[f32]) -> Vec<StuckKnife> {
        angles
            .iter()
            .map(|&angle| StuckKnife { angle, distance: 370.0 })
            .collect()
    }

    /// A knife thrown upward whose tip is exactly `gap` beyond the rim
    fn knife_below(target: &Target, engine: &CollisionEngine, gap: f32) -> Knife {
        let center = target.center();
        let half = engine.half_knife_length(target);
        let mut knife = Knife::at(Vec2::new(center.x, center.y + target.radius() + gap + half));
        knife.throw(-100.0);
        knife
    }

    #[test]
    fn test_angular_distance_wraparound() {
        assert!((angular_distance(359.0, 2.0) - 3.0).abs() < 1e-4);
        assert!((angular_distance(2.0, 359.0) - 3.0).abs() < 1e-4);
        assert!((angular_distance(0.0, 180.0) - 180.0).abs() < 1e-4);
        assert_eq!(angular_distance(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_arc_separation_scales_with_radius() {
        let d = 10.0;
        assert!(arc_separation(d, 100.0) < arc_separation(d, 200.0));
        assert!((arc_separation(180.0, 1.0) - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_empty_stuck_list_never_collides() {
        let engine = CollisionEngine::default();
        let target = reference_target();
        for angle in [0.0, 0.001, 90.0, 180.0, 359.999] {
            assert_eq!(
                engine.check_stuck_collision(angle, &[], &target),
                CollisionOutcome::NoContact
            );
        }
    }

    #[test]
    fn test_separation_boundary() {
        let engine = CollisionEngine::default();
        let target = reference_target();
        let handle_radius = engine.handle_radius(&target);
        let min = engine.min_separation(&target);
        assert!((handle_radius - 370.0).abs() < 1e-3);

        let boundary = (min / handle_radius).to_degrees();
        let knives = stuck(&[0.0]);

        let below = engine.check_stuck_collision(boundary * 0.99, &knives, &target);
        assert!(matches!(below, CollisionOutcome::KnifeCollision { index: 0, .. }));

        let above = engine.check_stuck_collision(boundary * 1.01, &knives, &target);
        assert_eq!(above, CollisionOutcome::NoContact);

        // Same boundary from the other side of 0
        let below_wrapped = engine.check_stuck_collision(360.0 - boundary * 0.99, &knives, &target);
        assert!(below_wrapped.is_contact());
    }

    #[test]
    fn test_neighbours_on_both_sides_of_zero() {
        let engine = CollisionEngine::default();
        let target = reference_target();

        // 10 degrees at r=370 is ~64.6px, inside the 65px minimum
        let left = engine.check_stuck_collision(0.0, &stuck(&[10.0]), &target);
        let right = engine.check_stuck_collision(0.0, &stuck(&[350.0]), &target);
        assert!(matches!(left, CollisionOutcome::KnifeCollision { index: 0, .. }));
        assert!(matches!(right, CollisionOutcome::KnifeCollision { index: 0, .. }));

        // With both present the first inserted one is reported
        let both = engine.check_stuck_collision(0.0, &stuck(&[10.0, 350.0]), &target);
        assert!(matches!(both, CollisionOutcome::KnifeCollision { index: 0, .. }));
        let both = engine.check_stuck_collision(0.0, &stuck(&[180.0, 350.0, 10.0]), &target);
        assert!(matches!(both, CollisionOutcome::KnifeCollision { index: 1, .. }));
    }

    #[test]
    fn test_half_scale_contact() {
        let engine = CollisionEngine::default();
        let target = Target::new(ScalingContext::new(540.0, 960.0), &LayoutTuning::default());
        assert!((target.radius() - 140.0).abs() < 1e-4);

        let threshold = target.scaling().uniform(engine.params().contact_threshold);
        let knife = knife_below(&target, &engine, threshold);
        let outcome = engine.check_target_contact(&knife, &target);
        match outcome {
            CollisionOutcome::TargetContact { angle, point } => {
                // Knife comes from directly below: 90 degrees in screen space
                assert!((angle - 90.0).abs() < 1e-3);
                assert!((point.distance(target.center()) - 140.0).abs() < 1e-3);
            }
            other => panic!("expected contact, got {other:?}"),
        }

        let far = knife_below(&target, &engine, threshold + 1.0);
        assert_eq!(engine.check_target_contact(&far, &target), CollisionOutcome::NoContact);
    }

    #[test]
    fn test_contact_angle_is_in_target_frame() {
        let engine = CollisionEngine::default();
        let mut target = reference_target();
        target.set_rotation(100.0);
        let knife = knife_below(&target, &engine, 0.0);
        match engine.check_target_contact(&knife, &target) {
            CollisionOutcome::TargetContact { angle, .. } => {
                assert!((angle - 350.0).abs() < 1e-3);
            }
            other => panic!("expected contact, got {other:?}"),
        }
    }

    #[test]
    fn test_contact_requires_flying_knife() {
        let engine = CollisionEngine::default();
        let target = reference_target();
        let center = target.center();
        let ready = Knife::at(center);
        assert_eq!(engine.check_target_contact(&ready, &target), CollisionOutcome::NoContact);

        let mut stuck_knife = knife_below(&target, &engine, 0.0);
        engine.resolve_stick(&mut stuck_knife, &target, 90.0);
        assert_eq!(
            engine.check_target_contact(&stuck_knife, &target),
            CollisionOutcome::NoContact
        );
    }

    #[test]
    fn test_resolve_stick_then_update_is_idempotent() {
        let engine = CollisionEngine::default();
        let mut target = reference_target();
        target.set_rotation(37.0);
        let mut knife = knife_below(&target, &engine, 0.0);

        engine.resolve_stick(&mut knife, &target, 123.0);
        let placed = knife.position();
        engine.update_stuck_position(&mut knife, &target);
        assert!(knife.position().distance(placed) < 1e-3);

        let distance = knife.distance_from_center().unwrap();
        assert!((knife.position().distance(target.center()) - distance).abs() < 1e-2);
        assert!((distance - engine.stuck_distance(&target)).abs() < 1e-4);
        assert_eq!(knife.velocity_y(), 0.0);
    }

    #[test]
    fn test_stuck_knife_orbits_with_target() {
        let engine = CollisionEngine::default();
        let mut target = reference_target();
        let mut knife = knife_below(&target, &engine, 0.0);
        engine.resolve_stick(&mut knife, &target, 0.0);
        let start = knife.position();

        target.set_rotation(90.0);
        engine.update_stuck_position(&mut knife, &target);
        let moved = knife.position() - target.center();
        let distance = engine.stuck_distance(&target);
        assert!(moved.x.abs() < 1e-2);
        assert!((moved.y - distance).abs() < 1e-2);
        assert!(knife.position().distance(start) > 1.0);
    }

    #[test]
    fn test_zero_radius_target_never_contacts() {
        let engine = CollisionEngine::default();
        let layout = LayoutTuning {
            target_radius: 0.0,
            ..Default::default()
        };
        let target = Target::new(ScalingContext::default(), &layout);
        let mut knife = Knife::at(target.center());
        knife.throw(-1.0);
        assert_eq!(engine.check_target_contact(&knife, &target), CollisionOutcome::NoContact);
    }

    proptest! {
        #[test]
        fn prop_angular_distance_symmetric_and_bounded(a in 0.0f32..360.0, b in 0.0f32..360.0) {
            let ab = angular_distance(a, b);
            let ba = angular_distance(b, a);
            prop_assert!((ab - ba).abs() < 1e-4);
            prop_assert!((0.0..=180.0).contains(&ab));
        }

        #[test]
        fn prop_angular_distance_to_self_is_zero(a in 0.0f32..360.0) {
            prop_assert_eq!(angular_distance(a, a), 0.0);
        }

        #[test]
        fn prop_arc_separation_monotonic(
            d in 0.1f32..180.0,
            r in 1.0f32..1000.0,
            extra in 0.1f32..100.0,
        ) {
            prop_assert!(arc_separation(d, r) < arc_separation(d, r + extra));
            prop_assert!(arc_separation(d, r) < arc_separation(d + extra.min(10.0), r));
        }

        #[test]
        fn prop_empty_list_is_clear(angle in -720.0f32..720.0) {
            let engine = CollisionEngine::default();
            let target = reference_target();
            prop_assert_eq!(
                engine.check_stuck_collision(angle, &[], &target),
                CollisionOutcome::NoContact
            );
        }

        #[test]
        fn prop_collision_matches_arc_rule(theta in 0.0f32..180.0, width in 540.0f32..2160.0) {
            let engine = CollisionEngine::default();
            let target = Target::new(ScalingContext::new(width, width * 16.0 / 9.0), &LayoutTuning::default());
            let expected = arc_separation(theta, engine.handle_radius(&target)) < engine.min_separation(&target);
            let outcome = engine.check_stuck_collision(theta, &stuck(&[0.0]), &target);
            prop_assert_eq!(outcome.is_contact(), expected);
        }
    }
}
