//! Validated, running tween chains.
//!
//! Links run in order. A looping chain wraps from its last link back to the
//! head; the head counts cycles and ends the chain once the configured count
//! is exceeded. Leftover frame time always carries into the next link.

use std::fmt;

use crate::target::{SharedTarget, TargetKey};
use crate::tween::{LinkStep, Listener, TweenLink};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Run through the links once.
    Once,
    /// Run the full chain this many cycles.
    Times(u32),
    Forever,
}

impl Repeat {
    fn is_cyclic(self) -> bool {
        !matches!(self, Repeat::Once)
    }

    fn limit(self) -> Option<u32> {
        match self {
            Repeat::Once => Some(1),
            Repeat::Times(times) => Some(times),
            Repeat::Forever => None,
        }
    }
}

enum ChainStep {
    Link(LinkStep),
    /// The head was about to start a cycle past the loop count.
    Exhausted,
}

pub(crate) struct TweenChain {
    key: TargetKey,
    target: SharedTarget,
    links: Vec<TweenLink>,
    repeat: Repeat,
    cycles: u32,
    /// Link currently governing the target; every link before it is complete.
    cursor: usize,
    on_complete: Option<Listener>,
    on_interrupted: Option<Listener>,
}

impl fmt::Debug for TweenChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenChain")
            .field("key", &self.key)
            .field("links", &self.links.len())
            .field("repeat", &self.repeat)
            .field("cycles", &self.cycles)
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl TweenChain {
    pub(crate) fn new(
        target: SharedTarget,
        links: Vec<TweenLink>,
        repeat: Repeat,
        on_complete: Option<Listener>,
        on_interrupted: Option<Listener>,
    ) -> Self {
        Self {
            key: TargetKey::of(&target),
            target,
            links,
            repeat,
            cycles: 0,
            cursor: 0,
            on_complete,
            on_interrupted,
        }
    }

    pub(crate) fn key(&self) -> TargetKey {
        self.key
    }

    pub(crate) fn target(&self) -> &SharedTarget {
        &self.target
    }

    fn head(&self) -> &TweenLink {
        &self.links[0]
    }

    pub(crate) fn should_blend(&self) -> bool {
        self.head().should_blend()
    }

    pub(crate) fn is_delay_complete(&self) -> bool {
        self.head().is_delay_complete()
    }

    pub(crate) fn take_completion_listener(&mut self) -> Option<Listener> {
        self.on_complete.take()
    }

    pub(crate) fn take_interruption_listener(&mut self) -> Option<Listener> {
        self.on_interrupted.take()
    }

    fn next_index(&self, index: usize) -> Option<usize> {
        if index + 1 < self.links.len() {
            Some(index + 1)
        } else if self.repeat.is_cyclic() {
            Some(0)
        } else {
            None
        }
    }

    fn cycle_length(&self) -> f32 {
        self.links.iter().map(TweenLink::cycle_length).sum()
    }

    /// Run down the head's delay while deferred. True once ready to promote.
    pub(crate) fn step_delay(&mut self, delta: f32) -> bool {
        self.links[0].step_delay(delta)
    }

    /// Advance the chain by one frame. True once the whole chain is done.
    pub(crate) fn step(&mut self, delta: f32) -> bool {
        let mut delta = delta;
        let mut last_wrap: Option<f32> = None;
        loop {
            let index = self.cursor;
            let leftover = match self.step_link(index, delta) {
                ChainStep::Exhausted => return true,
                ChainStep::Link(LinkStep::Complete { leftover }) => leftover,
                ChainStep::Link(_) => return false,
            };
            let Some(next) = self.next_index(index) else {
                return true;
            };
            if self.links[next].is_complete() {
                self.links[next].restart();
            }
            self.cursor = next;
            delta = leftover;
            if next == 0 && self.repeat == Repeat::Forever {
                delta = self.wrap_forever(leftover);
                // Time that stops shrinking across a wrap (zero-length cycles,
                // or links shorter than the frame's rounding) would spin forever.
                if last_wrap.is_some_and(|prev| delta >= prev) {
                    return false;
                }
                last_wrap = Some(delta);
            }
        }
    }

    /// Drop the whole cycles an endless chain would run through in `leftover`;
    /// only the phase inside the last one reaches the target.
    fn wrap_forever(&self, leftover: f32) -> f32 {
        let cycle = self.cycle_length();
        if cycle > 0.0 && leftover >= cycle {
            leftover % cycle
        } else {
            leftover
        }
    }

    fn step_link(&mut self, index: usize, delta: f32) -> ChainStep {
        if self.links[index].is_complete() {
            return ChainStep::Link(LinkStep::Complete { leftover: delta });
        }
        let Some(delta) = self.links[index].consume_delay(delta) else {
            return ChainStep::Link(LinkStep::Waiting);
        };
        if !self.links[index].has_begun() {
            if index == 0 {
                self.cycles += 1;
                if let Some(limit) = self.repeat.limit() {
                    if self.cycles > limit {
                        return ChainStep::Exhausted;
                    }
                }
                if self.cycles == 2 {
                    // Blending only smooths the interruption, not steady repeats.
                    self.links[0].clear_blend();
                }
            }
            let target = self.target.borrow();
            self.links[index].begin(&*target);
        }
        let mut target = self.target.borrow_mut();
        ChainStep::Link(self.links[index].advance(&mut *target, delta))
    }

    /// World speed of whichever link currently governs the target.
    pub(crate) fn world_speed(&mut self, channel: usize) -> f32 {
        let mut index = self.cursor;
        while self.links[index].is_complete() {
            match self.next_index(index) {
                Some(next) if next != 0 => index = next,
                _ => return 0.0,
            }
        }
        self.links[index].world_speed(channel)
    }

    /// Capture `outgoing`'s velocity as this chain's start velocity.
    /// Returns whether a blend was set up.
    pub(crate) fn interrupt(&mut self, outgoing: &mut TweenChain) -> bool {
        let channels = self.head().end_values().len();
        let speeds: Vec<f32> = (0..channels)
            .map(|channel| outgoing.world_speed(channel))
            .collect();
        self.links[0].blend_from(&speeds)
    }

    /// Skip every link to its end; applied on the next step.
    pub(crate) fn finish(&mut self) {
        for link in &mut self.links {
            link.finish();
        }
    }

    /// Release eases, drop listeners and return links to their pools.
    pub(crate) fn free(self) {
        for link in self.links {
            link.free();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::shared;
    use crate::tween::Tween;

    fn chain(tween: Tween) -> TweenChain {
        tween.into_chain().expect("valid chain")
    }

    #[test]
    fn repeat_limits() {
        assert_eq!(Repeat::Once.limit(), Some(1));
        assert_eq!(Repeat::Times(3).limit(), Some(3));
        assert_eq!(Repeat::Forever.limit(), None);
        assert!(!Repeat::Once.is_cyclic());
    }

    #[test]
    fn zero_length_endless_loop_yields() {
        let value = shared(0.0_f32);
        let mut c = chain(
            Tween::to(&value, 1.0, 0.0)
                .next(Tween::to(&value, 2.0, 0.0))
                .loop_forever(),
        );
        assert!(!c.step(0.1));
        assert!(!c.step(0.1));
        assert_eq!(*value.borrow(), 2.0);
    }

    #[test]
    fn huge_frame_skips_whole_endless_cycles() {
        let value = shared(0.0_f32);
        let mut c = chain(
            Tween::to(&value, 1.0, 0.25)
                .next(Tween::to(&value, 0.0, 0.25))
                .loop_forever(),
        );
        // 10.125 s = 20 whole cycles + 0.125 s into the first link.
        assert!(!c.step(10.125));
        assert_eq!(c.cursor, 0);
        assert!((*value.borrow() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn sub_ulp_endless_loop_yields() {
        let value = shared(0.0_f32);
        let mut c = chain(Tween::to(&value, 1.0, 1e-8).loop_forever());
        assert!(!c.step(1.0));
        assert!(!c.step(1.0e6));
        assert_eq!(*value.borrow(), 1.0);
    }

    #[test]
    fn zero_loops_never_touches_target() {
        let value = shared(3.0_f32);
        let mut c = chain(Tween::to(&value, 1.0, 1.0).loop_times(0));
        assert!(c.step(0.5));
        assert_eq!(*value.borrow(), 3.0);
    }

    #[test]
    fn world_speed_follows_cursor() {
        let value = shared(0.0_f32);
        let mut c = chain(
            Tween::to(&value, 2.0, 1.0).next(Tween::to(&value, 0.0, 4.0).delay(1.0)),
        );
        assert_eq!(c.world_speed(0), 0.0);
        c.step(0.5);
        assert!((c.world_speed(0) - 2.0).abs() < 1e-6);
        // Second link is still in its delay.
        c.step(1.0);
        assert_eq!(c.world_speed(0), 0.0);
        c.step(1.0);
        assert!((c.world_speed(0) + 0.5).abs() < 1e-6);
    }
}
