//! Tween targets: anything exposing a fixed set of float channels.
//!
//! Targets are shared as `Rc<RefCell<T>>` so the embedding application keeps
//! reading them while the manager writes into them each frame. Identity is the
//! allocation, not the value: two targets holding equal values are still
//! distinct.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Channel access injected per concrete target type.
pub trait Animatable {
    /// Number of float channels this target exposes.
    fn channel_count(&self) -> usize;

    /// Read channel `index`. Indices are always `< channel_count()`.
    fn channel(&self, index: usize) -> f32;

    /// Write channel `index`. Indices are always `< channel_count()`.
    fn set_channel(&mut self, index: usize, value: f32);
}

/// Type-erased shared target, as stored on running chains and handed to listeners.
pub type SharedTarget = Rc<RefCell<dyn Animatable>>;

/// Wrap a value as a shareable tween target.
pub fn shared<T: Animatable>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

/// Reference identity of a target allocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetKey(usize);

impl TargetKey {
    pub fn of<T: ?Sized>(target: &Rc<RefCell<T>>) -> Self {
        TargetKey(Rc::as_ptr(target) as *const () as usize)
    }
}

impl Animatable for f32 {
    fn channel_count(&self) -> usize {
        1
    }

    fn channel(&self, _index: usize) -> f32 {
        *self
    }

    fn set_channel(&mut self, _index: usize, value: f32) {
        *self = value;
    }
}

impl<const N: usize> Animatable for [f32; N] {
    fn channel_count(&self) -> usize {
        N
    }

    fn channel(&self, index: usize) -> f32 {
        self[index]
    }

    fn set_channel(&mut self, index: usize, value: f32) {
        self[index] = value;
    }
}

impl Animatable for Vec<f32> {
    fn channel_count(&self) -> usize {
        self.len()
    }

    fn channel(&self, index: usize) -> f32 {
        self[index]
    }

    fn set_channel(&mut self, index: usize, value: f32) {
        self[index] = value;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Animatable for Vector2 {
    fn channel_count(&self) -> usize {
        2
    }

    fn channel(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            _ => self.y,
        }
    }

    fn set_channel(&mut self, index: usize, value: f32) {
        match index {
            0 => self.x = value,
            _ => self.y = value,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Animatable for Vector3 {
    fn channel_count(&self) -> usize {
        3
    }

    fn channel(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    fn set_channel(&mut self, index: usize, value: f32) {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            _ => self.z = value,
        }
    }
}

/// Linear RGBA color; all four channels are tweened.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Animatable for Color {
    fn channel_count(&self) -> usize {
        4
    }

    fn channel(&self, index: usize) -> f32 {
        match index {
            0 => self.r,
            1 => self.g,
            2 => self.b,
            _ => self.a,
        }
    }

    fn set_channel(&mut self, index: usize, value: f32) {
        match index {
            0 => self.r = value,
            1 => self.g = value,
            2 => self.b = value,
            _ => self.a = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_identity_not_value() {
        let a = shared(1.0_f32);
        let b = shared(1.0_f32);
        assert_ne!(TargetKey::of(&a), TargetKey::of(&b));
        assert_eq!(TargetKey::of(&a), TargetKey::of(&a.clone()));

        let erased: SharedTarget = a.clone();
        assert_eq!(TargetKey::of(&erased), TargetKey::of(&a));
    }

    #[test]
    fn channels_address_named_fields() {
        let mut c = Color::rgb(0.1, 0.2, 0.3);
        c.set_channel(3, 0.5);
        assert_eq!(c.channel_count(), 4);
        assert_eq!(c.a, 0.5);
        assert_eq!(c.channel(1), 0.2);

        let mut v = Vector3::new(1.0, 2.0, 3.0);
        v.set_channel(2, 9.0);
        assert_eq!(v, Vector3::new(1.0, 2.0, 9.0));

        let mut arr = [0.0_f32; 5];
        arr.set_channel(4, 1.0);
        assert_eq!(arr.channel_count(), 5);
        assert_eq!(arr[4], 1.0);
    }
}
