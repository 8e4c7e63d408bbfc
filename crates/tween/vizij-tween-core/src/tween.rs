//! Tween links and the chain builder.
//!
//! A [`TweenLink`] is one timed transition: delay, duration, start/end values
//! and an optional ease. A [`Tween`] is the builder for a chain of links bound
//! to one target; submitting it to a [`TweenManager`] validates it into a
//! running chain.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::chain::{Repeat, TweenChain};
use crate::ease::{lerp, BoxedEase, Ease};
use crate::error::TweenError;
use crate::manager::TweenManager;
use crate::pool::SharedPool;
use crate::target::{Animatable, SharedTarget, TargetKey};

/// Callback fired once when a chain completes or is interrupted.
pub type Listener = Box<dyn FnOnce(&mut TweenManager, &SharedTarget)>;

/// Outcome of advancing a single link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum LinkStep {
    /// Still inside the delay.
    Waiting,
    Running,
    /// Transition finished; `leftover` is the unused part of the frame.
    Complete { leftover: f32 },
}

/// One transition in a chain.
#[derive(Debug)]
pub struct TweenLink {
    delay: f32,
    duration: f32,
    delay_time: f32,
    time: f32,
    ease: Option<BoxedEase>,
    should_blend: bool,
    /// Start speeds below override the ease's own start speed until the
    /// chain's second cycle.
    blended: bool,
    original_start_speed: f32,
    /// Per-channel start speeds, in value per unit of progress.
    start_speeds: Vec<f32>,
    /// Per-channel start speeds, in value per second.
    start_world_speeds: Vec<f32>,
    start_values: Vec<f32>,
    end_values: Vec<f32>,
    began: bool,
    complete: bool,
    pool: Option<SharedPool>,
}

impl Default for TweenLink {
    fn default() -> Self {
        Self {
            delay: 0.0,
            duration: 0.0,
            delay_time: 0.0,
            time: 0.0,
            ease: None,
            should_blend: true,
            blended: false,
            original_start_speed: 0.0,
            start_speeds: Vec::new(),
            start_world_speeds: Vec::new(),
            start_values: Vec::new(),
            end_values: Vec::new(),
            began: false,
            complete: false,
            pool: None,
        }
    }
}

impl TweenLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Elapsed transition time in the current cycle.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn end_values(&self) -> &[f32] {
        &self.end_values
    }

    /// Values captured from the target when the delay ran out.
    pub fn start_values(&self) -> &[f32] {
        &self.start_values
    }

    pub fn has_begun(&self) -> bool {
        self.began
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_blended(&self) -> bool {
        self.blended
    }

    pub fn should_blend(&self) -> bool {
        self.should_blend
    }

    pub fn ease(&self) -> Option<&dyn Ease> {
        self.ease.as_deref()
    }

    pub(crate) fn is_delay_complete(&self) -> bool {
        self.delay_time >= self.delay
    }

    pub(crate) fn cycle_length(&self) -> f32 {
        self.delay + self.duration
    }

    /// Size the per-channel buffers once the target is known.
    pub(crate) fn prepare(&mut self, channels: usize) {
        self.start_values.clear();
        self.start_values.resize(channels, 0.0);
        self.start_speeds.clear();
        self.start_speeds.resize(channels, 0.0);
        self.start_world_speeds.clear();
        self.start_world_speeds.resize(channels, 0.0);
    }

    /// Run down the delay of a deferred link. Once it has elapsed, `time` is
    /// seeded so that the next [`TweenLink::advance`] with the same delta
    /// resumes exactly where the delay left off.
    pub(crate) fn step_delay(&mut self, delta: f32) -> bool {
        self.delay_time += delta;
        if self.delay_time >= self.delay {
            self.time = self.delay_time - self.delay - delta;
            return true;
        }
        false
    }

    /// Consume this frame's delta against the delay. Returns the part of the
    /// frame usable by the transition, or `None` while still waiting.
    pub(crate) fn consume_delay(&mut self, delta: f32) -> Option<f32> {
        if self.delay_time < self.delay {
            self.delay_time += delta;
            if self.delay_time < self.delay {
                return None;
            }
            return Some(self.delay_time - self.delay);
        }
        Some(delta)
    }

    /// Capture the target's live values as this cycle's baseline.
    pub(crate) fn begin(&mut self, target: &dyn Animatable) {
        let count = target.channel_count();
        for (i, start) in self.start_values.iter_mut().enumerate().take(count) {
            *start = target.channel(i);
        }
        self.began = true;
    }

    /// Advance the transition by `delta` and write every channel.
    /// Channels the target no longer has (a shrunk `Vec`) are skipped.
    pub(crate) fn advance(&mut self, target: &mut dyn Animatable, delta: f32) -> LinkStep {
        self.time += delta;
        self.complete = self.time >= self.duration;
        let count = target.channel_count();

        if self.complete {
            for (i, end) in self.end_values.iter().enumerate().take(count) {
                target.set_channel(i, *end);
            }
            return LinkStep::Complete {
                leftover: self.time - self.duration,
            };
        }

        let a = self.time / self.duration;
        let channels = self
            .start_values
            .iter()
            .zip(&self.end_values)
            .enumerate()
            .take(count);
        match self.ease.as_mut() {
            Some(ease) => {
                for (i, (start, end)) in channels {
                    if self.blended {
                        // One ease serves every channel, each with its own start speed.
                        if let Some(blendable) = ease.as_blendable_mut() {
                            blendable.set_start_speed(self.start_speeds[i]);
                        }
                    }
                    target.set_channel(i, ease.apply(a, *start, *end));
                }
            }
            None => {
                for (i, (start, end)) in channels {
                    target.set_channel(i, lerp(*start, *end, a));
                }
            }
        }
        LinkStep::Running
    }

    /// Instantaneous rate of change of `channel` in value per second.
    pub(crate) fn world_speed(&mut self, channel: usize) -> f32 {
        if !self.began {
            return 0.0;
        }
        if self.duration == 0.0 {
            if self.blended {
                return self.start_world_speeds[channel];
            }
            return 0.0;
        }
        let a = self.time / self.duration;
        let start = self.start_values[channel];
        let end = self.end_values[channel];
        let speed = match self.ease.as_mut() {
            Some(ease) => {
                if self.blended {
                    if let Some(blendable) = ease.as_blendable_mut() {
                        blendable.set_start_speed(self.start_speeds[channel]);
                    }
                }
                ease.speed(a, start, end)
            }
            None => end - start,
        };
        speed / self.duration
    }

    /// Adopt `world_speeds` as this link's start velocity. No-op unless the
    /// link has a duration, wants blending and its ease is blendable.
    pub(crate) fn blend_from(&mut self, world_speeds: &[f32]) -> bool {
        if self.duration == 0.0 || !self.should_blend {
            return false;
        }
        let Some(blendable) = self.ease.as_mut().and_then(|e| e.as_blendable_mut()) else {
            return false;
        };
        self.original_start_speed = blendable.start_speed();
        for (i, world) in world_speeds.iter().enumerate() {
            self.start_world_speeds[i] = *world;
            self.start_speeds[i] = *world * self.duration;
        }
        self.blended = true;
        true
    }

    /// Drop the blend and hand the ease back its configured start speed.
    pub(crate) fn clear_blend(&mut self) {
        if !self.blended {
            return;
        }
        self.blended = false;
        if let Some(blendable) = self.ease.as_mut().and_then(|e| e.as_blendable_mut()) {
            blendable.set_start_speed(self.original_start_speed);
        }
    }

    /// Skip to the end of the transition; applied on the next step.
    pub(crate) fn finish(&mut self) {
        self.time = self.duration;
    }

    /// Prepare to run the same configuration again.
    pub(crate) fn restart(&mut self) {
        self.time = 0.0;
        self.delay_time = 0.0;
        self.began = false;
        self.complete = false;
    }

    /// Release the ease and return to the link's pool, if any.
    pub(crate) fn free(mut self) {
        if let Some(ease) = self.ease.as_mut() {
            ease.free();
        }
        if let Some(pool) = self.pool.take() {
            pool.borrow_mut().free(self);
        }
    }

    /// Restore defaults so the link can be reused. Buffers keep their capacity.
    pub(crate) fn reset(&mut self) {
        self.restart();
        self.delay = 0.0;
        self.duration = 0.0;
        self.ease = None;
        self.should_blend = true;
        self.blended = false;
        self.original_start_speed = 0.0;
        self.start_speeds.clear();
        self.start_world_speeds.clear();
        self.start_values.clear();
        self.end_values.clear();
        self.pool = None;
    }
}

/// Builder for a chain of tweens on one target.
///
/// Per-link setters (`duration`, `delay`, `ease`, `end`, `should_blend`,
/// `pool`) configure the most recently appended link. Chain-level setters
/// (`target`, listeners, looping) apply to the whole chain.
///
/// ```
/// use vizij_tween_core::{ease, shared, Tween, TweenManager, Vector2};
///
/// let pos = shared(Vector2::new(0.0, 0.0));
/// let mut manager = TweenManager::default();
/// Tween::to(&pos, Vector2::new(10.0, 0.0), 0.5)
///     .ease(ease::quintic())
///     .next(Tween::to(&pos, Vector2::new(10.0, 10.0), 0.5))
///     .loop_times(2)
///     .start(&mut manager)
///     .unwrap();
/// manager.step(2.0);
/// assert_eq!(*pos.borrow(), Vector2::new(10.0, 10.0));
/// ```
pub struct Tween {
    target: Option<SharedTarget>,
    /// First appended link whose target disagreed with the chain's.
    mismatch: Option<usize>,
    links: Vec<TweenLink>,
    repeat: Repeat,
    on_complete: Option<Listener>,
    on_interrupted: Option<Listener>,
}

impl Default for Tween {
    fn default() -> Self {
        Self::from_link(TweenLink::new())
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("target", &self.target.as_ref().map(TargetKey::of))
            .field("links", &self.links)
            .field("repeat", &self.repeat)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_interrupted", &self.on_interrupted.is_some())
            .finish()
    }
}

impl Tween {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a chain with a link obtained from `pool`; the link returns there
    /// when the chain is freed.
    pub fn from_pool(pool: &SharedPool) -> Self {
        let mut link = pool.borrow_mut().obtain();
        link.pool = Some(pool.clone());
        Self::from_link(link)
    }

    fn from_link(link: TweenLink) -> Self {
        Self {
            target: None,
            mismatch: None,
            links: vec![link],
            repeat: Repeat::Once,
            on_complete: None,
            on_interrupted: None,
        }
    }

    /// Tween `target` to `end` over `duration` seconds.
    pub fn to<T: Animatable + 'static>(target: &Rc<RefCell<T>>, end: T, duration: f32) -> Self {
        Self::new().target(target).end_from(&end).duration(duration)
    }

    pub fn target<T: Animatable + 'static>(self, target: &Rc<RefCell<T>>) -> Self {
        let shared: SharedTarget = target.clone();
        self.target_shared(shared)
    }

    /// Bind the whole chain to an already type-erased target.
    pub fn target_shared(mut self, target: SharedTarget) -> Self {
        self.target = Some(target);
        self.mismatch = None;
        self
    }

    pub fn end(mut self, values: &[f32]) -> Self {
        let link = self.current();
        link.end_values.clear();
        link.end_values.extend_from_slice(values);
        self
    }

    /// Take the end values from another value of the target's type.
    pub fn end_from(mut self, end: &dyn Animatable) -> Self {
        let link = self.current();
        link.end_values.clear();
        link.end_values
            .extend((0..end.channel_count()).map(|i| end.channel(i)));
        self
    }

    pub fn end_channel(mut self, index: usize, value: f32) -> Self {
        let link = self.current();
        if link.end_values.len() <= index {
            link.end_values.resize(index + 1, 0.0);
        }
        link.end_values[index] = value;
        self
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.current().duration = seconds;
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.current().delay = seconds;
        self
    }

    pub fn ease<E: Ease + 'static>(self, ease: E) -> Self {
        self.ease_boxed(Some(Box::new(ease)))
    }

    /// Set or clear the ease; `None` interpolates linearly.
    pub fn ease_boxed(mut self, ease: Option<BoxedEase>) -> Self {
        self.current().ease = ease;
        self
    }

    /// Whether this link should start at the velocity of a tween it interrupts.
    /// A blending link with a delay also defers the interruption until the
    /// delay has run out.
    pub fn should_blend(mut self, should_blend: bool) -> Self {
        self.current().should_blend = should_blend;
        self
    }

    /// Pool the current link returns to when the chain is freed.
    pub fn pool(mut self, pool: Option<SharedPool>) -> Self {
        self.current().pool = pool;
        self
    }

    pub fn on_complete<F>(mut self, listener: F) -> Self
    where
        F: FnOnce(&mut TweenManager, &SharedTarget) + 'static,
    {
        self.on_complete = Some(Box::new(listener));
        self
    }

    pub fn on_interrupted<F>(mut self, listener: F) -> Self
    where
        F: FnOnce(&mut TweenManager, &SharedTarget) + 'static,
    {
        self.on_interrupted = Some(Box::new(listener));
        self
    }

    /// Append `next`'s links. Listeners set on `next` replace the chain's.
    /// Any loop configured so far is cancelled.
    pub fn next(mut self, next: Tween) -> Self {
        let Tween {
            target,
            mismatch,
            links,
            on_complete,
            on_interrupted,
            ..
        } = next;
        let offset = self.links.len();
        if let Some(other) = target {
            let differs = self
                .target
                .as_ref()
                .map(|own| TargetKey::of(own) != TargetKey::of(&other));
            match differs {
                None => self.target = Some(other),
                Some(true) if self.mismatch.is_none() => self.mismatch = Some(offset),
                _ => {}
            }
        }
        if self.mismatch.is_none() {
            self.mismatch = mismatch.map(|link| link + offset);
        }
        self.links.extend(links);
        if on_complete.is_some() {
            self.on_complete = on_complete;
        }
        if on_interrupted.is_some() {
            self.on_interrupted = on_interrupted;
        }
        self.repeat = Repeat::Once;
        self
    }

    /// Repeat the chain indefinitely. The chain never completes on its own.
    pub fn loop_forever(mut self) -> Self {
        self.repeat = Repeat::Forever;
        self
    }

    /// Run the chain `times` full cycles, then complete. Zero completes
    /// immediately without touching the target.
    pub fn loop_times(mut self, times: u32) -> Self {
        self.repeat = Repeat::Times(times);
        self
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn links(&self) -> &[TweenLink] {
        &self.links
    }

    /// Submit the chain to `manager`. See [`TweenManager::start`].
    pub fn start(self, manager: &mut TweenManager) -> Result<(), TweenError> {
        manager.start(self)
    }

    fn current(&mut self) -> &mut TweenLink {
        let last = self.links.len() - 1;
        &mut self.links[last]
    }

    /// Validate the builder into a running chain.
    pub(crate) fn into_chain(self) -> Result<TweenChain, TweenError> {
        let target = self.target.ok_or(TweenError::MissingTarget)?;
        if let Some(link) = self.mismatch {
            return Err(TweenError::TargetMismatch { link });
        }
        let expected = target.borrow().channel_count();
        let mut links = self.links;
        for (i, link) in links.iter_mut().enumerate() {
            if !link.duration.is_finite() || link.duration < 0.0 {
                return Err(TweenError::InvalidDuration {
                    link: i,
                    duration: link.duration,
                });
            }
            if !link.delay.is_finite() || link.delay < 0.0 {
                return Err(TweenError::InvalidDelay {
                    link: i,
                    delay: link.delay,
                });
            }
            if link.end_values.len() != expected {
                return Err(TweenError::ChannelCountMismatch {
                    link: i,
                    expected,
                    actual: link.end_values.len(),
                });
            }
            link.prepare(expected);
        }
        Ok(TweenChain::new(
            target,
            links,
            self.repeat,
            self.on_complete,
            self.on_interrupted,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::{CubicHermite, Linear};
    use crate::target::shared;

    #[test]
    fn delay_overflow_carries_into_first_frame() {
        let mut link = TweenLink::new();
        link.delay = 0.5;
        assert_eq!(link.consume_delay(0.3), None);
        let usable = link.consume_delay(0.3).unwrap();
        assert!((usable - 0.1).abs() < 1e-6);
        assert_eq!(link.consume_delay(0.2), Some(0.2));
    }

    #[test]
    fn deferred_delay_seeds_time() {
        let mut link = TweenLink::new();
        link.delay = 1.0;
        link.duration = 2.0;
        assert!(!link.step_delay(0.75));
        assert!(link.step_delay(0.5));
        // 0.25 of overflow, minus the delta that the next advance adds back.
        assert!((link.time - (0.25 - 0.5)).abs() < 1e-6);
    }

    #[test]
    fn advance_writes_exact_end_values() {
        let mut target = [0.0_f32, 0.0];
        let mut link = TweenLink::new();
        link.duration = 0.3;
        link.end_values = vec![0.1, 0.7];
        link.ease = Some(Box::new(Linear));
        link.prepare(2);
        link.begin(&target);
        assert_eq!(link.advance(&mut target, 0.1), LinkStep::Running);
        match link.advance(&mut target, 0.25) {
            LinkStep::Complete { leftover } => assert!((leftover - 0.05).abs() < 1e-6),
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(target, [0.1, 0.7]);
    }

    #[test]
    fn advance_skips_channels_the_target_lost() {
        let mut target = vec![0.0_f32, 0.0];
        let mut link = TweenLink::new();
        link.duration = 1.0;
        link.end_values = vec![1.0, 2.0];
        link.prepare(2);
        link.begin(&target);
        link.advance(&mut target, 0.25);
        target.truncate(1);
        assert_eq!(link.advance(&mut target, 0.25), LinkStep::Running);
        assert_eq!(target, vec![0.5]);
        link.advance(&mut target, 1.0);
        assert_eq!(target, vec![1.0]);

        link.restart();
        link.begin(&target);
        assert_eq!(link.start_values(), &[1.0, 0.0]);
    }

    #[test]
    fn blend_requires_blendable_ease_and_duration() {
        let mut link = TweenLink::new();
        link.duration = 1.0;
        link.end_values = vec![1.0];
        link.prepare(1);
        assert!(!link.blend_from(&[2.0]));

        link.ease = Some(Box::new(Linear));
        assert!(!link.blend_from(&[2.0]));

        link.ease = Some(Box::new(CubicHermite::default().with_start_speed(0.5)));
        link.should_blend = false;
        assert!(!link.blend_from(&[2.0]));

        link.should_blend = true;
        assert!(link.blend_from(&[2.0]));
        assert_eq!(link.start_speeds, vec![2.0]);

        link.clear_blend();
        assert!(!link.is_blended());
        let restored = link
            .ease
            .as_mut()
            .and_then(|e| e.as_blendable_mut())
            .map(|b| b.start_speed());
        assert_eq!(restored, Some(0.5));
    }

    #[test]
    fn builder_configures_last_link() {
        let value = shared(0.0_f32);
        let tween = Tween::to(&value, 1.0, 1.0)
            .delay(0.5)
            .next(Tween::new().end(&[2.0]).duration(3.0))
            .delay(0.25);
        assert_eq!(tween.link_count(), 2);
        assert_eq!(tween.links()[0].delay(), 0.5);
        assert_eq!(tween.links()[1].delay(), 0.25);
        assert_eq!(tween.links()[1].duration(), 3.0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut link = TweenLink::new();
        link.duration = 2.0;
        link.delay = 1.0;
        link.should_blend = false;
        link.end_values = vec![1.0, 2.0];
        link.began = true;
        link.reset();
        assert_eq!(link.duration(), 0.0);
        assert!(link.should_blend());
        assert!(link.end_values().is_empty());
        assert!(!link.has_begun());
    }
}
