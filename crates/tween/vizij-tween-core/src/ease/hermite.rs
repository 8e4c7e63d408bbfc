//! Blendable Hermite eases with configurable end speeds.
//!
//! Speeds are tangents in value change per unit of progress.

use super::{Blendable, Ease, Smootherstep, Smoothstep};

/// Cubic Hermite spline between `start` and `end` with tangents
/// `start_speed` / `end_speed`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CubicHermite {
    pub start_speed: f32,
    pub end_speed: f32,
}

impl CubicHermite {
    pub fn with_start_speed(mut self, speed: f32) -> Self {
        self.start_speed = speed;
        self
    }

    pub fn with_end_speed(mut self, speed: f32) -> Self {
        self.end_speed = speed;
        self
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Ease for CubicHermite {
    fn apply(&self, a: f32, start: f32, end: f32) -> f32 {
        if self.start_speed == 0.0 && self.end_speed == 0.0 {
            return Smoothstep.apply(a, start, end);
        }
        if a <= 0.0 {
            return start;
        }
        if a >= 1.0 {
            return end;
        }
        let a2 = a * a;
        let a3 = a2 * a;
        start * (2.0 * a3 - 3.0 * a2 + 1.0)
            + self.start_speed * (a3 - 2.0 * a2 + a)
            + end * (-2.0 * a3 + 3.0 * a2)
            + self.end_speed * (a3 - a2)
    }

    fn speed(&self, a: f32, start: f32, end: f32) -> f32 {
        if a <= 0.0 {
            return self.start_speed;
        }
        if a >= 1.0 {
            return self.end_speed;
        }
        let a2 = a * a;
        start * (6.0 * a2 - 6.0 * a)
            + self.start_speed * (3.0 * a2 - 4.0 * a + 1.0)
            + end * (-6.0 * a2 + 6.0 * a)
            + self.end_speed * (3.0 * a2 - 2.0 * a)
    }

    fn as_blendable_mut(&mut self) -> Option<&mut dyn Blendable> {
        Some(self)
    }
}

impl Blendable for CubicHermite {
    fn set_start_speed(&mut self, speed: f32) {
        self.start_speed = speed;
    }

    fn start_speed(&self) -> f32 {
        self.start_speed
    }
}

/// Quintic Hermite spline with tangents `start_speed` / `end_speed` and zero
/// acceleration at both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuinticHermite {
    pub start_speed: f32,
    pub end_speed: f32,
}

impl QuinticHermite {
    pub fn with_start_speed(mut self, speed: f32) -> Self {
        self.start_speed = speed;
        self
    }

    pub fn with_end_speed(mut self, speed: f32) -> Self {
        self.end_speed = speed;
        self
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Ease for QuinticHermite {
    fn apply(&self, a: f32, start: f32, end: f32) -> f32 {
        if self.start_speed == 0.0 && self.end_speed == 0.0 {
            return Smootherstep.apply(a, start, end);
        }
        if a <= 0.0 {
            return start;
        }
        if a >= 1.0 {
            return end;
        }
        let a3 = a * a * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        start * (-6.0 * a5 + 15.0 * a4 - 10.0 * a3 + 1.0)
            + self.start_speed * (-3.0 * a5 + 8.0 * a4 - 6.0 * a3 + a)
            + end * (6.0 * a5 - 15.0 * a4 + 10.0 * a3)
            + self.end_speed * (-3.0 * a5 + 7.0 * a4 - 4.0 * a3)
    }

    fn speed(&self, a: f32, start: f32, end: f32) -> f32 {
        if a <= 0.0 {
            return self.start_speed;
        }
        if a >= 1.0 {
            return self.end_speed;
        }
        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a2 * a2;
        30.0 * (end - start) * (a4 - 2.0 * a3 + a2)
            + self.start_speed * (-15.0 * a4 + 32.0 * a3 - 18.0 * a2 + 1.0)
            + self.end_speed * (-15.0 * a4 + 28.0 * a3 - 12.0 * a2)
    }

    fn as_blendable_mut(&mut self) -> Option<&mut dyn Blendable> {
        Some(self)
    }
}

impl Blendable for QuinticHermite {
    fn set_start_speed(&mut self, speed: f32) {
        self.start_speed = speed;
    }

    fn start_speed(&self) -> f32 {
        self.start_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!(
            (a - b).abs() <= eps,
            "approx failed: left={a} right={b} eps={eps}"
        );
    }

    fn numeric_speed(ease: &dyn Ease, a: f32, start: f32, end: f32) -> f32 {
        let h = 1e-3;
        (ease.apply(a + h, start, end) - ease.apply(a - h, start, end)) / (2.0 * h)
    }

    #[test]
    fn zero_speeds_reduce_to_smooth_steps() {
        for a in [0.1_f32, 0.4, 0.9] {
            assert_eq!(
                CubicHermite::default().apply(a, 1.0, 4.0),
                Smoothstep.apply(a, 1.0, 4.0)
            );
            assert_eq!(
                QuinticHermite::default().apply(a, 1.0, 4.0),
                Smootherstep.apply(a, 1.0, 4.0)
            );
        }
    }

    #[test]
    fn tangents_hold_at_endpoints() {
        let cubic = CubicHermite::default()
            .with_start_speed(3.0)
            .with_end_speed(-2.0);
        approx(numeric_speed(&cubic, 1e-3, 0.0, 1.0), 3.0, 1e-2);
        approx(numeric_speed(&cubic, 1.0 - 1e-3, 0.0, 1.0), -2.0, 1e-2);

        let quintic = QuinticHermite::default()
            .with_start_speed(3.0)
            .with_end_speed(-2.0);
        approx(numeric_speed(&quintic, 1e-3, 0.0, 1.0), 3.0, 2e-2);
        approx(numeric_speed(&quintic, 1.0 - 1e-3, 0.0, 1.0), -2.0, 2e-2);
    }

    #[test]
    fn blended_curves_still_reach_endpoints() {
        let cubic = CubicHermite::default().with_start_speed(5.0);
        approx(cubic.apply(1.0 - 1e-6, -2.0, 6.0), 6.0, 1e-3);
        let quintic = QuinticHermite::default().with_start_speed(5.0);
        approx(quintic.apply(1.0 - 1e-6, -2.0, 6.0), 6.0, 1e-3);
    }

    #[test]
    fn speed_is_derivative_of_apply() {
        let cubic = CubicHermite::default()
            .with_start_speed(1.5)
            .with_end_speed(0.5);
        let quintic = QuinticHermite::default()
            .with_start_speed(1.5)
            .with_end_speed(0.5);
        for a in [0.25_f32, 0.5, 0.75] {
            approx(cubic.speed(a, 2.0, -3.0), numeric_speed(&cubic, a, 2.0, -3.0), 1e-2);
            approx(
                quintic.speed(a, 2.0, -3.0),
                numeric_speed(&quintic, a, 2.0, -3.0),
                1e-2,
            );
        }
    }

    #[test]
    fn blendable_round_trip() {
        let mut ease = QuinticHermite::default();
        let blendable = ease.as_blendable_mut().unwrap();
        blendable.set_start_speed(2.5);
        assert_eq!(blendable.start_speed(), 2.5);
        ease.reset();
        assert_eq!(ease.start_speed, 0.0);
    }
}
