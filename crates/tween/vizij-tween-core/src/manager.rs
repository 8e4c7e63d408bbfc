//! TweenManager: one running chain per target, with interruption and deferral.
//!
//! Methods:
//! - start (interrupt or defer), step (promote deferred → step active → free → notify),
//!   clear_tween, finish, queries

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use hashbrown::HashMap;
use log::{debug, trace, warn};

use crate::chain::TweenChain;
use crate::config::Config;
use crate::error::TweenError;
use crate::pool::{SharedPool, TweenPool};
use crate::target::{SharedTarget, TargetKey};
use crate::tween::{Listener, Tween};

/// Drives every running tween chain, one chain per target.
///
/// Starting a chain on a target that already has one interrupts it. A
/// blending chain whose head is still in its delay is parked instead, and
/// only interrupts once that delay has run out.
pub struct TweenManager {
    cfg: Config,
    active: HashMap<TargetKey, TweenChain>,
    deferred: HashMap<TargetKey, TweenChain>,
    pool: SharedPool,
    scratch: Vec<TargetKey>,
}

impl fmt::Debug for TweenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenManager")
            .field("cfg", &self.cfg)
            .field("active", &self.active.len())
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

impl Default for TweenManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl TweenManager {
    pub fn new(cfg: Config) -> Self {
        let pool = TweenPool::shared(cfg.pool_capacity);
        Self::with_pool(cfg, pool)
    }

    /// Use an existing pool, e.g. one shared between several managers on the
    /// same thread.
    pub fn with_pool(cfg: Config, pool: SharedPool) -> Self {
        Self {
            active: HashMap::with_capacity(cfg.initial_capacity),
            deferred: HashMap::with_capacity(cfg.initial_capacity),
            scratch: Vec::with_capacity(cfg.initial_capacity),
            pool,
            cfg,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn pool(&self) -> SharedPool {
        self.pool.clone()
    }

    /// A builder whose first link comes from this manager's pool.
    pub fn tween(&self) -> Tween {
        Tween::from_pool(&self.pool)
    }

    /// Submit a chain. Fails if the chain is misconfigured; nothing is
    /// interrupted in that case.
    pub fn start(&mut self, tween: Tween) -> Result<(), TweenError> {
        let chain = tween.into_chain()?;
        self.submit(chain);
        Ok(())
    }

    fn submit(&mut self, mut chain: TweenChain) {
        let key = chain.key();

        if self.active.contains_key(&key) && chain.should_blend() && !chain.is_delay_complete() {
            debug!("tween: deferring chain on {key:?} until its delay elapses");
            if let Some(superseded) = self.deferred.insert(key, chain) {
                trace!("tween: dropping superseded deferred chain on {key:?}");
                superseded.free();
            }
            return;
        }

        if let Some(superseded) = self.deferred.remove(&key) {
            trace!("tween: dropping superseded deferred chain on {key:?}");
            superseded.free();
        }

        let mut listener = None;
        if let Some(mut interrupted) = self.active.remove(&key) {
            let blended = chain.should_blend() && chain.interrupt(&mut interrupted);
            debug!("tween: interrupting chain on {key:?} (blended: {blended})");
            listener = interrupted.take_interruption_listener();
            interrupted.free();
        }

        let target = chain.target().clone();
        self.active.insert(key, chain);
        if let Some(listener) = listener {
            listener(self, &target);
        }
    }

    /// Advance every tween by `delta` seconds. Call exactly once per frame.
    pub fn step(&mut self, delta: f32) {
        if !delta.is_finite() || delta < 0.0 {
            warn!("tween: ignoring invalid frame delta {delta}");
            return;
        }
        let delta = self.cfg.clamp_delta(delta);

        let mut ready = mem::take(&mut self.scratch);
        ready.extend(
            self.deferred
                .iter_mut()
                .filter_map(|(key, chain)| chain.step_delay(delta).then_some(*key)),
        );
        for key in ready.drain(..) {
            if let Some(chain) = self.deferred.remove(&key) {
                debug!("tween: promoting deferred chain on {key:?}");
                self.submit(chain);
            }
        }

        ready.extend(
            self.active
                .iter_mut()
                .filter_map(|(key, chain)| chain.step(delta).then_some(*key)),
        );
        let mut listeners: Vec<(Listener, SharedTarget)> = Vec::new();
        for key in ready.drain(..) {
            if let Some(mut chain) = self.active.remove(&key) {
                trace!("tween: chain on {key:?} complete");
                if let Some(listener) = chain.take_completion_listener() {
                    listeners.push((listener, chain.target().clone()));
                }
                chain.free();
            }
        }
        self.scratch = ready;

        for (listener, target) in listeners {
            listener(self, &target);
        }
    }

    /// Remove any active or deferred chain on `target` without notifying
    /// listeners. Returns whether anything was removed.
    pub fn clear_tween<T: ?Sized>(&mut self, target: &Rc<RefCell<T>>) -> bool {
        let key = TargetKey::of(target);
        let mut removed = false;
        if let Some(chain) = self.deferred.remove(&key) {
            chain.free();
            removed = true;
        }
        if let Some(chain) = self.active.remove(&key) {
            chain.free();
            removed = true;
        }
        removed
    }

    /// Remove every chain without notifying listeners.
    pub fn clear(&mut self) {
        for (_, chain) in self.deferred.drain() {
            chain.free();
        }
        for (_, chain) in self.active.drain() {
            chain.free();
        }
    }

    /// Skip the active chain on `target` to its end. The end values are
    /// written, and the completion listener fired, on the next step.
    pub fn finish<T: ?Sized>(&mut self, target: &Rc<RefCell<T>>) -> bool {
        match self.active.get_mut(&TargetKey::of(target)) {
            Some(chain) => {
                chain.finish();
                true
            }
            None => false,
        }
    }

    /// Current world speed (value per second) of `channel` on `target`'s
    /// active chain.
    pub fn world_speed<T: ?Sized>(
        &mut self,
        target: &Rc<RefCell<T>>,
        channel: usize,
    ) -> Option<f32> {
        let chain = self.active.get_mut(&TargetKey::of(target))?;
        if channel >= chain.target().borrow().channel_count() {
            return None;
        }
        Some(chain.world_speed(channel))
    }

    pub fn is_active<T: ?Sized>(&self, target: &Rc<RefCell<T>>) -> bool {
        self.active.contains_key(&TargetKey::of(target))
    }

    pub fn is_deferred<T: ?Sized>(&self, target: &Rc<RefCell<T>>) -> bool {
        self.deferred.contains_key(&TargetKey::of(target))
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// True when nothing is running or waiting.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty() && self.deferred.is_empty()
    }
}
