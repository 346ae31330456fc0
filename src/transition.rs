//! Time-based transitions for the bar.
//!
//! Two independent channels drive the visuals: `expand` carries the
//! container geometry and eases between directions, `fill` carries the fill
//! fraction and normally jumps so the bar tracks the pointer exactly.
//! All methods take an explicit `now` so estimates are deterministic.

use crate::geometry::{self, Geometry};
use crate::state::ProgressState;
use std::time::{Duration, Instant};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(350);

/// Easing curves over t in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

/// Values a transition can blend between.
pub trait Interpolate: Copy {
    fn interpolate(self, to: Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(self, to: Self, t: f64) -> Self {
        geometry::lerp(self, to, t)
    }
}

impl Interpolate for Geometry {
    fn interpolate(self, to: Self, t: f64) -> Self {
        self.lerp(to, t)
    }
}

/// A single animated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<T> {
    from: T,
    to: T,
    started: Option<Instant>,
    duration: Duration,
    easing: Easing,
}

impl<T: Interpolate + PartialEq> Transition<T> {
    pub fn new(value: T, duration: Duration, easing: Easing) -> Self {
        Self {
            from: value,
            to: value,
            started: None,
            duration,
            easing,
        }
    }

    /// Displayed value at `now`.
    pub fn value_at(&self, now: Instant) -> T {
        let Some(started) = self.started else {
            return self.to;
        };
        let total = self.duration.as_secs_f64();
        if total <= 0.0 {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(started).as_secs_f64();
        let t = self.easing.apply(elapsed / total);
        self.from.interpolate(self.to, t)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        match self.started {
            Some(started) => now.saturating_duration_since(started) < self.duration,
            None => false,
        }
    }

    /// Ease from the currently displayed value towards `target`.
    /// Retargeting to the same value keeps a running animation untouched.
    pub fn animate_to(&mut self, target: T, now: Instant) {
        if target == self.to {
            return;
        }
        self.from = self.value_at(now);
        self.to = target;
        self.started = if self.duration.is_zero() { None } else { Some(now) };
    }

    /// Jump straight to `target`, cancelling any running animation.
    pub fn jump_to(&mut self, target: T) {
        self.from = target;
        self.to = target;
        self.started = None;
    }
}

/// How a state change should reach the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    /// Live drag: geometry eases, fill jumps.
    Tracking,
    /// Both channels ease.
    Animated,
}

/// The expand and fill channels of one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionChannels {
    pub expand: Transition<Geometry>,
    pub fill: Transition<f64>,
}

impl TransitionChannels {
    pub fn new(state: &ProgressState, duration: Duration) -> Self {
        Self {
            expand: Transition::new(geometry::resolve(state.direction), duration, Easing::EaseInOut),
            fill: Transition::new(state.current, duration, Easing::Linear),
        }
    }

    /// Retarget both channels to reflect `state`.
    pub fn apply(&mut self, state: &ProgressState, animation: Animation, now: Instant) {
        self.expand.animate_to(geometry::resolve(state.direction), now);
        match animation {
            Animation::Tracking => self.fill.jump_to(state.current),
            Animation::Animated => self.fill.animate_to(state.current, now),
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.expand.is_animating(now) || self.fill.is_animating(now)
    }

    /// Snapshot of what to draw at `now`.
    pub fn frame_at(&self, now: Instant) -> (Geometry, f64) {
        (self.expand.value_at(now), self.fill.value_at(now).clamp(0.0, 1.0))
    }
}
