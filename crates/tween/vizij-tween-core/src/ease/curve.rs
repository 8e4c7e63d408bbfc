//! Arbitrary unit curves wrapped as eases.
//!
//! A unit curve maps progress `t ∈ [0, 1]` to a blend factor with
//! `f(0) = 0` and `f(1) = 1`. Speeds are estimated by finite differences over
//! `precision` (a fraction of the total duration).

use super::{lerp, Ease};

const DEFAULT_PRECISION: f32 = 0.001;

#[derive(Clone, Copy, Debug)]
pub struct Curve {
    f: fn(f32) -> f32,
    precision: f32,
}

impl Curve {
    pub fn new(f: fn(f32) -> f32) -> Self {
        Self {
            f,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Step size used when differentiating, as a fraction of total duration.
    pub fn with_precision(mut self, precision: f32) -> Self {
        if precision > 0.0 && precision < 1.0 {
            self.precision = precision;
        }
        self
    }

    pub fn precision(&self) -> f32 {
        self.precision
    }

    pub fn quad_in() -> Self {
        Self::new(|t| t * t)
    }

    pub fn quad_out() -> Self {
        Self::new(|t| 1.0 - (1.0 - t) * (1.0 - t))
    }

    pub fn cubic_in() -> Self {
        Self::new(|t| t * t * t)
    }

    pub fn cubic_out() -> Self {
        Self::new(|t| 1.0 - (1.0 - t).powi(3))
    }

    pub fn cubic_in_out() -> Self {
        Self::new(|t| {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        })
    }

    pub fn quart_out() -> Self {
        Self::new(|t| 1.0 - (1.0 - t).powi(4))
    }

    pub fn sine_in_out() -> Self {
        Self::new(|t| -((std::f32::consts::PI * t).cos() - 1.0) / 2.0)
    }

    pub fn bounce_out() -> Self {
        Self::new(bounce_out)
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

impl Ease for Curve {
    fn apply(&self, a: f32, start: f32, end: f32) -> f32 {
        if a <= 0.0 {
            return start;
        }
        if a >= 1.0 {
            return end;
        }
        lerp(start, end, (self.f)(a))
    }

    fn speed(&self, a: f32, start: f32, end: f32) -> f32 {
        let f = self.f;
        let p = self.precision;
        let half = 0.5 * p;
        let slope = if a <= half {
            (f(p) - f(0.0)) / p
        } else if a >= 1.0 - half {
            (f(1.0) - f(1.0 - p)) / p
        } else {
            (f(a + half) - f(a - half)) / p
        };
        slope * (end - start)
    }
}
