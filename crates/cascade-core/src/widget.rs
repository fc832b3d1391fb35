//! Widget trait and related types.
//!
//! This module defines the core `Widget` trait and supporting types for building
//! UI components in Cascade.
//!
//! # Widget Lifecycle
//!
//! Widgets follow a verify-measure-layout-paint cycle:
//!
//! 1. **Verify**: Check all Brick assertions pass
//! 2. **Measure**: Compute intrinsic size given constraints
//! 3. **Layout**: Position self and children within allocated bounds
//! 4. **Paint**: Generate draw commands for rendering (only if verified)
//!
//! # Examples
//!
//! ```
//! use cascade_core::{Point, Transform2D, TypeId, WidgetId};
//!
//! let id = WidgetId::new(42);
//! assert_eq!(id.0, 42);
//!
//! assert_ne!(TypeId::of::<String>(), TypeId::of::<i32>());
//!
//! let t = Transform2D::translate(10.0, 20.0);
//! assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(11.0, 21.0));
//! ```

use crate::brick::Brick;
use crate::color::Color;
use crate::constraints::Constraints;
use crate::event::Event;
use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Unique identifier for a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Create a new widget ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Type identifier for widget types (used for diffing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait that all UI elements implement.
///
/// Widget requires [`Brick`]: every widget carries assertions that define its
/// contract and a render budget, and painting is skipped when verification
/// fails.
pub trait Widget: Brick + Send + Sync {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute intrinsic size constraints.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Position children within allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Generate draw commands for rendering.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle input events.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Get child widgets for tree traversal.
    fn children(&self) -> &[Box<dyn Widget>];

    /// Get mutable child widgets.
    fn children_mut(&mut self) -> &mut [Box<dyn Widget>];

    /// Check if this widget is interactive (can receive focus/events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Check if this widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Canvas trait for paint operations.
///
/// This is a minimal abstraction over the rendering backend.
pub trait Canvas {
    /// Draw a filled rectangle with rounded corners.
    fn fill_rect(&mut self, rect: Rect, radius: f32, color: Color);

    /// Draw a stroked rectangle with rounded corners.
    fn stroke_rect(&mut self, rect: Rect, radius: f32, color: Color, width: f32);

    /// Draw text.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Draw a path (polyline).
    fn draw_path(&mut self, points: &[Point], color: Color, width: f32);

    /// Push a clip region.
    fn push_clip(&mut self, rect: Rect);

    /// Pop the clip region.
    fn pop_clip(&mut self);

    /// Push a transform.
    fn push_transform(&mut self, transform: Transform2D);

    /// Pop the transform.
    fn pop_transform(&mut self);

    /// Push a gaussian blur radius applied to subsequent draws.
    fn push_blur(&mut self, radius: f32);

    /// Pop the blur.
    fn pop_blur(&mut self);
}

/// Text style for rendering.
///
/// ```
/// use cascade_core::{Color, FontWeight, TextStyle};
///
/// let style = TextStyle::default();
/// assert_eq!(style.size, 16.0);
/// assert_eq!(style.weight, FontWeight::Normal);
///
/// let caption = TextStyle {
///     size: 11.0,
///     color: Color::from_hex("#737373").expect("valid hex"),
///     weight: FontWeight::Semibold,
///     ..TextStyle::default()
/// };
/// assert_eq!(caption.family, "Inter");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font family
    pub family: String,
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Font weight
    pub weight: FontWeight,
    /// Letter spacing as a fraction of the font size
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: "Inter".to_string(),
            size: 16.0,
            color: Color::BLACK,
            weight: FontWeight::Normal,
            letter_spacing: 0.0,
        }
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    /// Light (300)
    Light,
    /// Normal (400)
    Normal,
    /// Medium (500)
    Medium,
    /// Semibold (600)
    Semibold,
    /// Bold (700)
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    #[must_use]
    pub const fn numeric(self) -> u16 {
        match self {
            Self::Light => 300,
            Self::Normal => 400,
            Self::Medium => 500,
            Self::Semibold => 600,
            Self::Bold => 700,
        }
    }

    /// Closest weight for a numeric CSS weight.
    #[must_use]
    pub const fn from_numeric(weight: u16) -> Self {
        match weight {
            0..=349 => Self::Light,
            350..=449 => Self::Normal,
            450..=549 => Self::Medium,
            550..=649 => Self::Semibold,
            _ => Self::Bold,
        }
    }
}

/// 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Matrix elements [a, b, c, d, e, f] for:
    /// | a c e |
    /// | b d f |
    /// | 0 0 1 |
    pub matrix: [f32; 6],
}

impl Transform2D {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// Create a translation transform.
    #[must_use]
    pub const fn translate(x: f32, y: f32) -> Self {
        Self {
            matrix: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    /// Create a scale transform.
    #[must_use]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            matrix: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Create a rotation transform (angle in radians).
    #[must_use]
    pub fn rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            matrix: [cos, sin, -sin, cos, 0.0, 0.0],
        }
    }

    /// Rotation about an arbitrary origin (angle in radians).
    #[must_use]
    pub fn rotate_about(origin: Point, angle: f32) -> Self {
        Self::translate(-origin.x, -origin.y)
            .then(&Self::rotate(angle))
            .then(&Self::translate(origin.x, origin.y))
    }

    /// Uniform scale about an arbitrary origin.
    #[must_use]
    pub fn scale_about(origin: Point, factor: f32) -> Self {
        Self::translate(-origin.x, -origin.y)
            .then(&Self::scale(factor, factor))
            .then(&Self::translate(origin.x, origin.y))
    }

    /// Compose: apply `self` first, then `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.matrix;
        let [a2, b2, c2, d2, e2, f2] = next.matrix;
        Self {
            matrix: [
                a2.mul_add(a1, c2 * b1),
                b2.mul_add(a1, d2 * b1),
                a2.mul_add(c1, c2 * d1),
                b2.mul_add(c1, d2 * d1),
                a2.mul_add(e1, c2.mul_add(f1, e2)),
                b2.mul_add(e1, d2.mul_add(f1, f2)),
            ],
        }
    }

    /// Transform a point.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.matrix;
        Point::new(a.mul_add(p.x, c.mul_add(p.y, e)), b.mul_add(p.x, d.mul_add(p.y, f)))
    }

    /// Whether this is the identity transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Image
    Image,
    /// Combo box / dropdown select
    ComboBox,
    /// Popup list of options
    ListBox,
    /// Option inside a list box
    Option,
}

impl AccessibleRole {
    /// ARIA role attribute value.
    #[must_use]
    pub const fn aria(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Image => "img",
            Self::ComboBox => "combobox",
            Self::ListBox => "listbox",
            Self::Option => "option",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_widget_id_eq() {
        assert_eq!(WidgetId::new(1), WidgetId::new(1));
        assert_ne!(WidgetId::new(1), WidgetId::new(2));
    }

    #[test]
    fn test_type_id() {
        assert_eq!(TypeId::of::<u32>(), TypeId::of::<u32>());
        assert_ne!(TypeId::of::<u32>(), TypeId::of::<String>());
    }

    #[test]
    fn test_transform2d_identity() {
        let t = Transform2D::default();
        assert!(t.is_identity());
        assert_eq!(t.apply(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_transform2d_rotate() {
        let t = Transform2D::rotate(std::f32::consts::FRAC_PI_2);
        assert!(approx(t.apply(Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));
    }

    #[test]
    fn test_transform2d_then_order() {
        let t = Transform2D::scale(2.0, 2.0).then(&Transform2D::translate(10.0, 0.0));
        assert!(approx(t.apply(Point::new(1.0, 1.0)), Point::new(12.0, 2.0)));

        let u = Transform2D::translate(10.0, 0.0).then(&Transform2D::scale(2.0, 2.0));
        assert!(approx(u.apply(Point::new(1.0, 1.0)), Point::new(22.0, 2.0)));
    }

    #[test]
    fn test_transform2d_rotate_about_keeps_origin_fixed() {
        let origin = Point::new(336.0, 24.0);
        let t = Transform2D::rotate_about(origin, -0.1);
        assert!(approx(t.apply(origin), origin));
        assert!(!approx(t.apply(Point::new(0.0, 24.0)), Point::new(0.0, 24.0)));
    }

    #[test]
    fn test_transform2d_scale_about() {
        let t = Transform2D::scale_about(Point::new(10.0, 10.0), 0.5);
        assert!(approx(t.apply(Point::new(10.0, 10.0)), Point::new(10.0, 10.0)));
        assert!(approx(t.apply(Point::new(20.0, 10.0)), Point::new(15.0, 10.0)));
    }

    #[test]
    fn test_text_style_default() {
        let style = TextStyle::default();
        assert_eq!(style.size, 16.0);
        assert_eq!(style.weight, FontWeight::Normal);
        assert_eq!(style.color, Color::BLACK);
    }

    #[test]
    fn test_font_weight_numeric() {
        assert_eq!(FontWeight::Semibold.numeric(), 600);
        assert_eq!(FontWeight::from_numeric(600), FontWeight::Semibold);
        assert_eq!(FontWeight::from_numeric(900), FontWeight::Bold);
        assert_eq!(FontWeight::from_numeric(100), FontWeight::Light);
    }

    #[test]
    fn test_accessible_role_aria() {
        assert_eq!(AccessibleRole::default(), AccessibleRole::Generic);
        assert_eq!(AccessibleRole::ComboBox.aria(), "combobox");
        assert_eq!(AccessibleRole::ListBox.aria(), "listbox");
        assert_eq!(AccessibleRole::Option.aria(), "option");
    }
}
