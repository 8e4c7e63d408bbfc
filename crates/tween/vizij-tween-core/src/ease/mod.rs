//! Easing functions usable by tweens.
//!
//! An [`Ease`] maps normalized progress `a ∈ [0, 1]` to a value between `start`
//! and `end`, and reports its derivative ([`Ease::speed`]) in value change per
//! unit of progress. Dividing a speed by the tween duration gives the world
//! speed (value change per second).
//!
//! Eases implementing [`Blendable`] accept an explicit start speed, which the
//! manager uses to carry the velocity of an interrupted tween into the one
//! replacing it.

pub mod curve;
pub mod hermite;

use std::fmt;

pub use curve::Curve;
pub use hermite::{CubicHermite, QuinticHermite};

/// Curve contract consumed by the tween state machine.
pub trait Ease: fmt::Debug {
    /// Interpolated value at progress `a`.
    fn apply(&self, a: f32, start: f32, end: f32) -> f32;

    /// Derivative of [`Ease::apply`] with respect to `a`.
    fn speed(&self, a: f32, start: f32, end: f32) -> f32;

    /// Blending capability, if this ease supports it.
    fn as_blendable_mut(&mut self) -> Option<&mut dyn Blendable> {
        None
    }

    /// Called once when the chain owning this ease is freed.
    fn free(&mut self) {}
}

/// Eases whose start speed can be injected.
pub trait Blendable {
    /// Start speed in value change per unit of progress.
    fn set_start_speed(&mut self, speed: f32);

    fn start_speed(&self) -> f32;
}

/// Boxed ease as stored on a tween link.
pub type BoxedEase = Box<dyn Ease>;

#[inline]
pub fn lerp(start: f32, end: f32, a: f32) -> f32 {
    start + (end - start) * a
}

/// Straight interpolation at constant speed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Linear;

impl Ease for Linear {
    fn apply(&self, a: f32, start: f32, end: f32) -> f32 {
        if a <= 0.0 {
            return start;
        }
        if a >= 1.0 {
            return end;
        }
        lerp(start, end, a)
    }

    fn speed(&self, _a: f32, start: f32, end: f32) -> f32 {
        end - start
    }
}

/// Cubic Hermite spline with zero speed at both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Smoothstep;

impl Ease for Smoothstep {
    fn apply(&self, a: f32, start: f32, end: f32) -> f32 {
        if a <= 0.0 {
            return start;
        }
        if a >= 1.0 {
            return end;
        }
        a * a * (3.0 - 2.0 * a) * (end - start) + start
    }

    fn speed(&self, a: f32, start: f32, end: f32) -> f32 {
        if a <= 0.0 || a >= 1.0 {
            return 0.0;
        }
        a * (6.0 - 6.0 * a) * (end - start)
    }
}

/// Quintic Hermite spline (Perlin) with zero speed and acceleration at both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Smootherstep;

impl Ease for Smootherstep {
    fn apply(&self, a: f32, start: f32, end: f32) -> f32 {
        if a <= 0.0 {
            return start;
        }
        if a >= 1.0 {
            return end;
        }
        a * a * a * (a * (a * 6.0 - 15.0) + 10.0) * (end - start) + start
    }

    fn speed(&self, a: f32, start: f32, end: f32) -> f32 {
        if a <= 0.0 || a >= 1.0 {
            return 0.0;
        }
        a * a * (a * (a * 30.0 - 60.0) + 30.0) * (end - start)
    }
}

pub fn linear() -> BoxedEase {
    Box::new(Linear)
}

pub fn smoothstep() -> BoxedEase {
    Box::new(Smoothstep)
}

pub fn smootherstep() -> BoxedEase {
    Box::new(Smootherstep)
}

/// Blendable cubic ease; equivalent to [`Smoothstep`] until a speed is set.
pub fn cubic() -> CubicHermite {
    CubicHermite::default()
}

/// Blendable quintic ease; equivalent to [`Smootherstep`] until a speed is set.
pub fn quintic() -> QuinticHermite {
    QuinticHermite::default()
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
    fn endpoints_are_exact() {
        for ease in [linear(), smoothstep(), smootherstep()] {
            assert_eq!(ease.apply(0.0, 2.0, 7.0), 2.0);
            assert_eq!(ease.apply(1.0, 2.0, 7.0), 7.0);
            assert_eq!(ease.apply(-0.5, 2.0, 7.0), 2.0);
            assert_eq!(ease.apply(1.5, 2.0, 7.0), 7.0);
        }
    }

    #[test]
    fn speeds_match_numeric_derivative() {
        for ease in [linear(), smoothstep(), smootherstep()] {
            for a in [0.2_f32, 0.5, 0.8] {
                approx(
                    ease.speed(a, -1.0, 3.0),
                    numeric_speed(ease.as_ref(), a, -1.0, 3.0),
                    1e-2,
                );
            }
        }
    }

    #[test]
    fn smooth_eases_are_symmetric_at_midpoint() {
        approx(Smoothstep.apply(0.5, 0.0, 10.0), 5.0, 1e-5);
        approx(Smootherstep.apply(0.5, 0.0, 10.0), 5.0, 1e-5);
        assert_eq!(Smoothstep.speed(0.0, 0.0, 10.0), 0.0);
        assert_eq!(Smootherstep.speed(1.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn plain_eases_are_not_blendable() {
        assert!(Linear.as_blendable_mut().is_none());
        assert!(Smoothstep.as_blendable_mut().is_none());
        assert!(cubic().as_blendable_mut().is_some());
        assert!(quintic().as_blendable_mut().is_some());
    }
}
