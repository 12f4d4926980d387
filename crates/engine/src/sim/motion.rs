use std::time::Duration;

use rand::Rng;

use super::Vec2;

const NUDGE_DIVISOR: f32 = 1000.0;

/// Fixed physics constants for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub logo_width: f32,
    pub start_velocity: f32,
    pub max_velocity: f32,
    pub corner_tolerance: f32,
    pub nudge_amount: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            logo_width: 120.0,
            start_velocity: 2.0,
            max_velocity: 3.0,
            corner_tolerance: 5.0,
            nudge_amount: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub corner_hit_count: u64,
    pub elapsed_since_start: Duration,
    pub hit_corner_this_frame: bool,
}

/// Advances the logo one tick at a time inside the viewport.
///
/// The logo height is supplied separately because it is derived from the
/// decoded image's aspect ratio rather than configured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEngine {
    params: MotionParams,
    logo_height: f32,
}

impl MotionEngine {
    pub fn new(params: MotionParams, logo_height: f32) -> Self {
        Self {
            params,
            logo_height,
        }
    }

    /// Largest top-left position that keeps the logo fully inside the viewport.
    pub fn max_position(&self) -> Vec2 {
        Vec2::new(
            self.params.viewport_width - self.params.logo_width,
            self.params.viewport_height - self.logo_height,
        )
    }

    pub fn spawn_state<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationState {
        let max = self.max_position();
        SimulationState {
            position: Vec2::new(random_offset(rng, max.x), random_offset(rng, max.y)),
            velocity: Vec2::new(self.params.start_velocity, self.params.start_velocity),
            ..SimulationState::default()
        }
    }

    /// One Euler step: integrate, bounce off walls, score corners, then apply
    /// the pointer nudge when `nudge_target` is present.
    pub fn advance(&self, state: SimulationState, nudge_target: Option<Vec2>) -> SimulationState {
        let mut next = state;
        next.hit_corner_this_frame = false;

        next.position.x += next.velocity.x;
        next.position.y += next.velocity.y;

        let max = self.max_position();
        bounce_axis(&mut next.position.x, &mut next.velocity.x, max.x);
        bounce_axis(&mut next.position.y, &mut next.velocity.y, max.y);

        // Re-triggers every tick the logo stays inside the band.
        if self.is_in_corner_band(next.position) {
            next.corner_hit_count = next.corner_hit_count.saturating_add(1);
            next.hit_corner_this_frame = true;
        }

        if let Some(target) = nudge_target {
            next.velocity = self.nudged_velocity(next.position, next.velocity, target);
        }

        next
    }

    pub fn is_in_corner_band(&self, position: Vec2) -> bool {
        let tolerance = self.params.corner_tolerance;
        let max = self.max_position();
        let near_vertical_edge = position.x < tolerance || position.x > max.x - tolerance;
        let near_horizontal_edge = position.y < tolerance || position.y > max.y - tolerance;
        near_vertical_edge && near_horizontal_edge
    }

    fn nudged_velocity(&self, position: Vec2, velocity: Vec2, target: Vec2) -> Vec2 {
        let center = Vec2::new(
            position.x + self.params.logo_width / 2.0,
            position.y + self.logo_height / 2.0,
        );
        let factor = self.params.nudge_amount / NUDGE_DIVISOR;
        let max = self.params.max_velocity;
        Vec2::new(
            clamp_magnitude(velocity.x + (target.x - center.x) * factor, max),
            clamp_magnitude(velocity.y + (target.y - center.y) * factor, max),
        )
    }
}

fn bounce_axis(position: &mut f32, velocity: &mut f32, max_position: f32) {
    if *position < 0.0 {
        *position = 0.0;
        *velocity = -*velocity;
    }
    if *position > max_position {
        *position = max_position;
        *velocity = -*velocity;
    }
}

fn clamp_magnitude(value: f32, max: f32) -> f32 {
    if value.abs() > max {
        max.copysign(value)
    } else {
        value
    }
}

fn random_offset<R: Rng + ?Sized>(rng: &mut R, span: f32) -> f32 {
    let whole_pixels = span.floor() as i64;
    if whole_pixels <= 0 {
        return 0.0;
    }
    rng.gen_range(0..whole_pixels) as f32
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const LOGO_HEIGHT: f32 = 54.0;

    fn engine() -> MotionEngine {
        MotionEngine::new(MotionParams::default(), LOGO_HEIGHT)
    }

    fn state_at(x: f32, y: f32, vx: f32, vy: f32) -> SimulationState {
        SimulationState {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            ..SimulationState::default()
        }
    }

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.0001
    }

    #[test]
    fn integrates_velocity_in_open_space() {
        let next = engine().advance(state_at(200.0, 150.0, 2.0, -1.5), None);

        assert_eq!(next.position, Vec2::new(202.0, 148.5));
        assert_eq!(next.velocity, Vec2::new(2.0, -1.5));
        assert!(!next.hit_corner_this_frame);
    }

    #[test]
    fn left_wall_clamps_and_reflects() {
        let next = engine().advance(state_at(0.0, 200.0, -2.0, 0.0), None);

        assert_eq!(next.position.x, 0.0);
        assert_eq!(next.velocity.x, 2.0);
    }

    #[test]
    fn right_and_bottom_walls_clamp_together() {
        let next = engine().advance(state_at(679.0, 545.0, 3.0, 3.0), None);

        assert_eq!(next.position, Vec2::new(680.0, 546.0));
        assert_eq!(next.velocity, Vec2::new(-3.0, -3.0));
    }

    #[test]
    fn top_wall_leaves_horizontal_motion_alone() {
        let next = engine().advance(state_at(300.0, 1.0, 2.0, -2.0), None);

        assert_eq!(next.position, Vec2::new(302.0, 0.0));
        assert_eq!(next.velocity, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn origin_counts_as_corner_hit() {
        let next = engine().advance(state_at(0.0, 0.0, 0.0, 0.0), None);

        assert!(next.hit_corner_this_frame);
        assert_eq!(next.corner_hit_count, 1);
    }

    #[test]
    fn origin_counts_as_corner_hit_for_any_logo_height() {
        for height in [1.0, 54.0, 300.0, 599.0] {
            let engine = MotionEngine::new(MotionParams::default(), height);
            let next = engine.advance(state_at(0.0, 0.0, 0.0, 0.0), None);
            assert!(next.hit_corner_this_frame, "height {height}");
        }
    }

    #[test]
    fn viewport_center_is_not_a_corner() {
        let next = engine().advance(state_at(400.0, 300.0, 0.0, 0.0), None);

        assert!(!next.hit_corner_this_frame);
        assert_eq!(next.corner_hit_count, 0);
    }

    #[test]
    fn edge_without_second_edge_is_not_a_corner() {
        let next = engine().advance(state_at(0.0, 300.0, 0.0, 0.0), None);

        assert!(!next.hit_corner_this_frame);
    }

    #[test]
    fn each_far_corner_is_detected() {
        let engine = engine();
        let max = engine.max_position();
        for (x, y) in [(max.x, 0.0), (0.0, max.y), (max.x, max.y), (max.x - 4.0, 4.0)] {
            assert!(engine.is_in_corner_band(Vec2::new(x, y)), "({x}, {y})");
        }
        assert!(!engine.is_in_corner_band(Vec2::new(max.x - 5.0, 0.0)));
    }

    #[test]
    fn lingering_in_corner_band_scores_every_tick() {
        let engine = engine();
        let mut state = state_at(0.0, 0.0, 0.0, 0.0);
        for _ in 0..3 {
            state = engine.advance(state, None);
        }

        assert_eq!(state.corner_hit_count, 3);
    }

    #[test]
    fn corner_flag_resets_when_leaving_band() {
        let engine = engine();
        let hit = engine.advance(state_at(0.0, 0.0, 0.0, 0.0), None);
        let away = SimulationState {
            position: Vec2::new(200.0, 200.0),
            ..hit
        };
        let moved = engine.advance(away, None);

        assert!(hit.hit_corner_this_frame);
        assert!(!moved.hit_corner_this_frame);
        assert_eq!(moved.corner_hit_count, 1);
    }

    #[test]
    fn zero_velocity_without_pointer_is_idempotent() {
        let engine = engine();
        let state = state_at(250.0, 250.0, 0.0, 0.0);
        let next = engine.advance(state, None);

        assert_eq!(next, state);
    }

    #[test]
    fn nudge_pulls_toward_pointer_from_logo_center() {
        let next = engine().advance(
            state_at(100.0, 100.0, 0.0, 0.0),
            Some(Vec2::new(1160.0, 27.0)),
        );

        // center is (160, 127)
        assert!(approx_eq(next.velocity.x, 0.5));
        assert!(approx_eq(next.velocity.y, -0.05));
        assert_eq!(next.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn nudge_clamps_each_axis_preserving_sign() {
        let engine = engine();
        let right = engine.advance(
            state_at(100.0, 100.0, 2.5, -2.5),
            Some(Vec2::new(10_000.0, 127.0)),
        );
        let left = engine.advance(
            state_at(100.0, 100.0, -2.5, 2.5),
            Some(Vec2::new(-10_000.0, 127.0)),
        );

        assert_eq!(right.velocity.x, 3.0);
        assert_eq!(left.velocity.x, -3.0);
        // The other axis is clamped on its own, not rescaled.
        assert!(approx_eq(right.velocity.y, -2.5 + 2.5 * 0.0005));
        assert!(approx_eq(left.velocity.y, 2.5 - 2.5 * 0.0005));
    }

    #[test]
    fn spawn_state_starts_inside_viewport_with_start_velocity() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let state = engine.spawn_state(&mut rng);
            assert!(state.position.x >= 0.0 && state.position.x < 680.0);
            assert!(state.position.y >= 0.0 && state.position.y < 546.0);
            assert_eq!(state.position.x.fract(), 0.0);
            assert_eq!(state.velocity, Vec2::new(2.0, 2.0));
            assert_eq!(state.corner_hit_count, 0);
        }
    }

    #[test]
    fn spawn_state_pins_oversized_logo_to_origin() {
        let engine = MotionEngine::new(MotionParams::default(), 600.0);
        let state = engine.spawn_state(&mut StdRng::seed_from_u64(1));

        assert_eq!(state.position.y, 0.0);
    }

    proptest! {
        #[test]
        fn ticks_keep_logo_inside_and_velocity_bounded(
            start_x in 0.0f32..=680.0,
            start_y in 0.0f32..=546.0,
            vx in -3.0f32..=3.0,
            vy in -3.0f32..=3.0,
            pointer in proptest::option::of((-200.0f32..1000.0, -200.0f32..800.0)),
            ticks in 1usize..300,
        ) {
            let engine = engine();
            let max = engine.max_position();
            let target = pointer.map(|(x, y)| Vec2::new(x, y));
            let mut state = state_at(start_x, start_y, vx, vy);

            for _ in 0..ticks {
                let next = engine.advance(state, target);

                prop_assert!(next.position.x >= 0.0 && next.position.x <= max.x);
                prop_assert!(next.position.y >= 0.0 && next.position.y <= max.y);
                prop_assert!(next.velocity.x.abs() <= 3.0);
                prop_assert!(next.velocity.y.abs() <= 3.0);
                prop_assert!(next.corner_hit_count >= state.corner_hit_count);
                prop_assert!(next.corner_hit_count - state.corner_hit_count <= 1);
                prop_assert_eq!(
                    next.corner_hit_count - state.corner_hit_count == 1,
                    next.hit_corner_this_frame
                );

                state = next;
            }
        }
    }
}
