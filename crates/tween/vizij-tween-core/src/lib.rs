//! Vizij Tween Core (engine-agnostic)
//!
//! Per-target tweens with chaining, looping and velocity-matched interruption.
//! A [`TweenManager`] owns at most one running chain per target; starting a new
//! chain on a busy target interrupts the old one, and if the new chain's ease is
//! [`ease::Blendable`] it starts at the interrupted chain's velocity so there is
//! no visible snap.
//!
//! Call [`TweenManager::step`] once per frame from the thread that owns the
//! targets. Nothing here is `Send`; targets are shared as `Rc<RefCell<T>>`.

pub mod chain;
pub mod config;
pub mod ease;
pub mod error;
pub mod manager;
pub mod pool;
pub mod target;
pub mod tween;
pub mod tweens;

// Re-exports for consumers (adapters)
pub use chain::Repeat;
pub use config::Config;
pub use ease::{Blendable, Curve, Ease, Linear, Smootherstep, Smoothstep};
pub use error::TweenError;
pub use manager::TweenManager;
pub use pool::{PoolStats, SharedPool, TweenPool};
pub use target::{shared, Animatable, Color, SharedTarget, TargetKey, Vector2, Vector3};
pub use tween::{Listener, Tween, TweenLink};

/// Tween core result type
pub type Result<T> = core::result::Result<T, TweenError>;
