//! Error types for tween configuration.

use serde::{Deserialize, Serialize};

/// Configuration errors raised when a tween chain is submitted.
///
/// Runtime edge cases (zero duration, zero loops, interrupting with a
/// non-blendable ease) are policy and never surface here.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TweenError {
    /// The chain was never bound to a target.
    #[error("Tween has no target")]
    MissingTarget,

    /// A chained link was bound to a different target than the chain head.
    #[error("Link {link} is bound to a different target than the chain head")]
    TargetMismatch { link: usize },

    /// End values do not line up with the target's channels.
    #[error("Link {link} has {actual} end values but the target has {expected} channels")]
    ChannelCountMismatch {
        link: usize,
        expected: usize,
        actual: usize,
    },

    /// Negative or non-finite duration.
    #[error("Invalid duration on link {link}: {duration}")]
    InvalidDuration { link: usize, duration: f32 },

    /// Negative or non-finite delay.
    #[error("Invalid delay on link {link}: {delay}")]
    InvalidDelay { link: usize, delay: f32 },

    /// Malformed configuration document.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
}

impl TweenError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingTarget | Self::TargetMismatch { .. } => "target",
            Self::ChannelCountMismatch { .. } => "channels",
            Self::InvalidDuration { .. } | Self::InvalidDelay { .. } => "timing",
            Self::InvalidConfig { .. } => "config",
        }
    }
}

impl From<serde_json::Error> for TweenError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(TweenError::MissingTarget.category(), "target");
        assert_eq!(TweenError::TargetMismatch { link: 1 }.category(), "target");
        assert_eq!(
            TweenError::InvalidDelay {
                link: 0,
                delay: -1.0
            }
            .category(),
            "timing"
        );
    }

    #[test]
    fn test_error_display() {
        let err = TweenError::ChannelCountMismatch {
            link: 2,
            expected: 3,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Link 2 has 1 end values but the target has 3 channels"
        );
    }

    #[test]
    fn test_serialization() {
        let error = TweenError::InvalidDuration {
            link: 0,
            duration: -2.0,
        };
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: TweenError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
