//! Easing curves, transitions and retargetable animated values.
//!
//! Time is measured in milliseconds and advanced explicitly by the host,
//! which keeps every animation deterministic under test.

use crate::color::Color;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Easing Functions - TESTS FIRST
// =============================================================================

/// Easing curves for transitions.
///
/// Curves read from configuration use CSS timing-function syntax:
///
/// ```
/// use cascade_core::Easing;
///
/// let main: Easing = "cubic-bezier(0.23, 1, 0.32, 1)".parse().unwrap();
/// assert_eq!(main, Easing::CubicBezier(0.23, 1.0, 0.32, 1.0));
/// assert!(main.apply(0.5) > 0.9);
/// assert_eq!("linear".parse::<Easing>().unwrap(), Easing::Linear);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Quadratic ease in (slow start)
    EaseIn,
    /// Quadratic ease out (slow end)
    EaseOut,
    /// Quadratic ease in and out
    EaseInOut,
    /// Cubic ease out
    CubicOut,
    /// CSS cubic bezier with control points (x1, y1, x2, y2)
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// CSS `ease`.
    pub const CSS_EASE: Self = Self::CubicBezier(0.25, 0.1, 0.25, 1.0);
    /// CSS `ease-in`.
    pub const CSS_EASE_IN: Self = Self::CubicBezier(0.42, 0.0, 1.0, 1.0);
    /// CSS `ease-out`.
    pub const CSS_EASE_OUT: Self = Self::CubicBezier(0.0, 0.0, 0.58, 1.0);
    /// CSS `ease-in-out`.
    pub const CSS_EASE_IN_OUT: Self = Self::CubicBezier(0.42, 0.0, 0.58, 1.0);

    /// Apply the easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => (1.0 - t).mul_add(-(1.0 - t), 1.0),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(2) / 2.0
                }
            }
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
        }
    }

    /// CSS timing-function expression for this curve.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Linear => "linear".to_string(),
            Self::EaseIn => "ease-in".to_string(),
            Self::EaseOut => "ease-out".to_string(),
            Self::EaseInOut => "ease-in-out".to_string(),
            Self::CubicOut => "cubic-bezier(0.33, 1, 0.68, 1)".to_string(),
            Self::CubicBezier(x1, y1, x2, y2) => {
                format!("cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

// Newton-Raphson solve for the curve parameter whose x equals `t`.
fn cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }
    let mut u = t;
    for _ in 0..8 {
        let x = bezier_component(u, x1, x2) - t;
        if x.abs() < 1e-7 {
            break;
        }
        let slope = bezier_slope(u, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        u = (u - x / slope).clamp(0.0, 1.0);
    }
    bezier_component(u, y1, y2)
}

fn bezier_component(t: f64, p1: f64, p2: f64) -> f64 {
    let mt = 1.0 - t;
    (3.0 * mt * mt * t).mul_add(p1, (3.0 * mt * t * t).mul_add(p2, t * t * t))
}

fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let mt = 1.0 - t;
    (3.0 * mt * mt).mul_add(p1, (6.0 * mt * t).mul_add(p2 - p1, 3.0 * t * t * (1.0 - p2)))
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Error returned when a timing function string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EasingParseError {
    /// Not a recognized keyword or function
    #[error("unknown timing function `{0}`")]
    Unknown(String),
    /// `cubic-bezier(...)` with bad arguments
    #[error("invalid cubic-bezier arguments `{0}` (expected four numbers, x1 and x2 within 0..=1)")]
    InvalidCubicBezier(String),
}

impl FromStr for Easing {
    type Err = EasingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::CSS_EASE),
            "ease-in" => return Ok(Self::CSS_EASE_IN),
            "ease-out" => return Ok(Self::CSS_EASE_OUT),
            "ease-in-out" => return Ok(Self::CSS_EASE_IN_OUT),
            _ => {}
        }

        let args = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| EasingParseError::Unknown(s.to_string()))?;

        let invalid = || EasingParseError::InvalidCubicBezier(args.to_string());
        let values = args
            .split(',')
            .map(|v| v.trim().parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            &[x1, y1, x2, y2] if (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2) => {
                Ok(Self::CubicBezier(x1, y1, x2, y2))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = EasingParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_css()
    }
}

// =============================================================================
// Transition - duration, delay and curve for one property
// =============================================================================

/// Timing for one animated property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Duration in milliseconds
    pub duration_ms: u32,
    /// Delay before the transition starts, in milliseconds
    #[serde(default)]
    pub delay_ms: u32,
    /// Easing curve
    pub easing: Easing,
}

impl Transition {
    /// A transition with no delay.
    #[must_use]
    pub const fn new(duration_ms: u32, easing: Easing) -> Self {
        Self {
            duration_ms,
            delay_ms: 0,
            easing,
        }
    }

    /// An instantaneous transition.
    #[must_use]
    pub const fn instant() -> Self {
        Self::new(0, Easing::Linear)
    }

    /// Same transition starting after `delay_ms`.
    #[must_use]
    pub const fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Delay plus duration.
    #[must_use]
    pub const fn total_ms(&self) -> u32 {
        self.delay_ms.saturating_add(self.duration_ms)
    }

    /// Eased progress in `[0, 1]` after `elapsed_ms` since the transition was started.
    #[must_use]
    pub fn progress_at(&self, elapsed_ms: f64) -> f64 {
        let active = elapsed_ms - f64::from(self.delay_ms);
        if active <= 0.0 {
            return if self.duration_ms == 0 && elapsed_ms >= f64::from(self.delay_ms) {
                1.0
            } else {
                0.0
            };
        }
        if self.duration_ms == 0 {
            return 1.0;
        }
        self.easing
            .apply(active / f64::from(self.duration_ms))
    }

    /// CSS `transition` shorthand entry for `property`.
    #[must_use]
    pub fn to_css(&self, property: &str) -> String {
        if self.delay_ms == 0 {
            format!("{property} {}ms {}", self.duration_ms, self.easing)
        } else {
            format!(
                "{property} {}ms {} {}ms",
                self.duration_ms, self.easing, self.delay_ms
            )
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::instant()
    }
}

// =============================================================================
// Interpolate - values that can be animated
// =============================================================================

/// Trait for types that can be interpolated.
pub trait Interpolate {
    /// Interpolate between two values.
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        (to - from).mul_add(t, *from)
    }
}

impl Interpolate for f32 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        (*to - *from).mul_add(t as Self, *from)
    }
}

impl Interpolate for Point {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        Self {
            x: f32::interpolate(&from.x, &to.x, t),
            y: f32::interpolate(&from.y, &to.y, t),
        }
    }
}

impl Interpolate for Color {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        from.lerp(to, t as f32)
    }
}

// =============================================================================
// AnimatedValue - a retargetable eased value
// =============================================================================

/// A value that eases toward its target using a [`Transition`].
///
/// Retargeting mid-flight starts the new transition from the currently
/// displayed value, so interrupted animations never jump.
#[derive(Debug, Clone)]
pub struct AnimatedValue<T> {
    from: T,
    to: T,
    transition: Transition,
    elapsed_ms: f64,
}

impl<T: Interpolate + Clone + PartialEq> AnimatedValue<T> {
    /// A value at rest.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            from: value.clone(),
            to: value,
            transition: Transition::instant(),
            elapsed_ms: 0.0,
        }
    }

    /// The value currently displayed.
    #[must_use]
    pub fn value(&self) -> T {
        if self.is_settled() {
            return self.to.clone();
        }
        let t = self.transition.progress_at(self.elapsed_ms);
        T::interpolate(&self.from, &self.to, t)
    }

    /// The value being animated toward.
    #[must_use]
    pub const fn target(&self) -> &T {
        &self.to
    }

    /// Animate toward `target`. A no-op when `target` is already the target.
    pub fn retarget(&mut self, target: T, transition: Transition) {
        if self.to == target {
            return;
        }
        self.from = self.value();
        self.to = target;
        self.transition = transition;
        self.elapsed_ms = 0.0;
    }

    /// Jump straight to `value` with no animation.
    pub fn snap(&mut self, value: T) {
        self.from = value.clone();
        self.to = value;
        self.transition = Transition::instant();
        self.elapsed_ms = 0.0;
    }

    /// Advance the animation clock.
    pub fn advance(&mut self, delta_ms: f64) {
        if !self.is_settled() {
            self.elapsed_ms = (self.elapsed_ms + delta_ms.max(0.0))
                .min(f64::from(self.transition.total_ms()));
        }
    }

    /// Whether the value has reached its target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.elapsed_ms >= f64::from(self.transition.total_ms())
    }
}

impl<T: Interpolate + Clone + PartialEq + Default> Default for AnimatedValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
