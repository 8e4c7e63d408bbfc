//! Shorthand constructors for common tweens.
//!
//! Pooled variants take the pool explicitly; there is no global registry.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ease::Ease;
use crate::pool::SharedPool;
use crate::target::Animatable;
use crate::tween::Tween;

/// Tween `target` to `end` over `duration` seconds with linear interpolation.
pub fn to<T: Animatable + 'static>(target: &Rc<RefCell<T>>, end: T, duration: f32) -> Tween {
    Tween::to(target, end, duration)
}

/// Tween `target` to `end` over `duration` seconds with `ease`.
pub fn to_with_ease<T, E>(target: &Rc<RefCell<T>>, end: T, duration: f32, ease: E) -> Tween
where
    T: Animatable + 'static,
    E: Ease + 'static,
{
    Tween::to(target, end, duration).ease(ease)
}

/// Like [`to`], with the link drawn from (and later returned to) `pool`.
pub fn pooled_to<T: Animatable + 'static>(
    pool: &SharedPool,
    target: &Rc<RefCell<T>>,
    end: T,
    duration: f32,
) -> Tween {
    Tween::from_pool(pool)
        .target(target)
        .end_from(&end)
        .duration(duration)
}

/// Tween only the last channel of `target` (alpha, for a [`crate::Color`]),
/// holding the others at their current values.
pub fn fade<T: Animatable + 'static>(target: &Rc<RefCell<T>>, alpha: f32, duration: f32) -> Tween {
    let mut end = Vec::new();
    {
        let current = target.borrow();
        end.extend((0..current.channel_count()).map(|i| current.channel(i)));
    }
    if let Some(last) = end.last_mut() {
        *last = alpha;
    }
    Tween::new().target(target).end(&end).duration(duration)
}
