//! Core configuration for vizij-tween-core.

use serde::{Deserialize, Serialize};

use crate::error::TweenError;

/// Configuration for manager sizing and frame handling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capacity hint for the active/deferred maps and per-frame scratch buffers.
    pub initial_capacity: usize,

    /// Maximum number of recycled links the manager-owned pool retains.
    pub pool_capacity: usize,

    /// Upper bound applied to a single frame's delta. `None` keeps exact time
    /// accounting regardless of frame length.
    pub max_delta: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            pool_capacity: 128,
            max_delta: None,
        }
    }
}

impl Config {
    /// Parse a JSON config. Missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, TweenError> {
        let cfg: Config = serde_json::from_str(json)?;
        if let Some(max) = cfg.max_delta {
            if !max.is_finite() || max <= 0.0 {
                return Err(TweenError::InvalidConfig {
                    reason: format!("max_delta must be positive, got {max}"),
                });
            }
        }
        Ok(cfg)
    }

    /// Apply the frame clamp, if any.
    #[inline]
    pub(crate) fn clamp_delta(&self, delta: f32) -> f32 {
        match self.max_delta {
            Some(max) => delta.min(max),
            None => delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg = Config::from_json_str(r#"{ "pool_capacity": 8 }"#).unwrap();
        assert_eq!(cfg.pool_capacity, 8);
        assert_eq!(cfg.initial_capacity, 64);
        assert_eq!(cfg.max_delta, None);
    }

    #[test]
    fn rejects_non_positive_clamp() {
        let err = Config::from_json_str(r#"{ "max_delta": 0.0 }"#).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn clamp_only_when_configured() {
        let mut cfg = Config::default();
        assert_eq!(cfg.clamp_delta(5.0), 5.0);
        cfg.max_delta = Some(0.25);
        assert_eq!(cfg.clamp_delta(5.0), 0.25);
        assert_eq!(cfg.clamp_delta(0.1), 0.1);
    }
}
