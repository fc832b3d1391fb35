//! Chevron indicator.
//!
//! Two three-point strokes in a 12 x 12 box. Collapsed, they point toward
//! each other; expanded, they point apart. Switching morphs one geometry into
//! the other.

use cascade_core::{Canvas, Color, Easing, Point, Rect, Theme, Transition};

/// One stroke of the chevron.
pub type Stroke = [Point; 3];

const COLLAPSED: [Stroke; 2] = [
    [Point::new(2.5, 1.25), Point::new(6.0, 4.0), Point::new(9.5, 1.25)],
    [Point::new(9.5, 10.75), Point::new(6.0, 8.0), Point::new(2.5, 10.75)],
];

const EXPANDED: [Stroke; 2] = [
    [Point::new(2.5, 3.5), Point::new(6.0, 0.5), Point::new(9.5, 3.5)],
    [Point::new(9.5, 8.5), Point::new(6.0, 11.5), Point::new(2.5, 8.5)],
];

/// Stateless chevron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chevron {
    expanded: bool,
    color: Color,
    morph: Transition,
}

impl Chevron {
    /// Side of the chevron's box.
    pub const SIZE: f32 = 12.0;

    /// Stroke width.
    pub const STROKE_WIDTH: f32 = 1.0;

    /// Chevron in the given state with the default accent and morph.
    #[must_use]
    pub fn new(expanded: bool) -> Self {
        Self {
            expanded,
            color: Color::rgb8(0x10, 0xB9, 0x81),
            morph: Transition::new(400, Easing::CubicBezier(0.23, 1.0, 0.32, 1.0)),
        }
    }

    /// Chevron colored and timed by `theme`.
    #[must_use]
    pub fn themed(expanded: bool, theme: &Theme) -> Self {
        Self {
            expanded,
            color: theme.colors.accent,
            morph: theme.transitions.chevron,
        }
    }

    /// Whether the chevron shows the expanded geometry.
    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Stroke color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Geometry-morph transition declared by the chevron.
    #[must_use]
    pub const fn morph(&self) -> Transition {
        self.morph
    }

    /// Strokes for either state, in the chevron's 12 x 12 box.
    #[must_use]
    pub const fn paths(expanded: bool) -> [Stroke; 2] {
        if expanded {
            EXPANDED
        } else {
            COLLAPSED
        }
    }

    /// Strokes part way through a morph that started at `from_expanded`.
    ///
    /// `progress` is already eased; it is clamped to `[0, 1]`.
    #[must_use]
    pub fn paths_at(from_expanded: bool, progress: f32) -> [Stroke; 2] {
        let p = progress.clamp(0.0, 1.0);
        Self::blend(if from_expanded { 1.0 - p } else { p })
    }

    /// Strokes at `expansion`, where 0 is collapsed and 1 is expanded.
    #[must_use]
    pub fn blend(expansion: f32) -> [Stroke; 2] {
        let t = expansion.clamp(0.0, 1.0);
        let mut out = COLLAPSED;
        for (stroke, target) in out.iter_mut().zip(EXPANDED.iter()) {
            for (point, to) in stroke.iter_mut().zip(target.iter()) {
                *point = point.lerp(to, t);
            }
        }
        out
    }

    /// Paint the settled geometry into `bounds`.
    pub fn paint(&self, canvas: &mut dyn Canvas, bounds: Rect) {
        let expansion = if self.expanded { 1.0 } else { 0.0 };
        self.paint_at(canvas, bounds, expansion);
    }

    /// Paint the geometry at `expansion` into `bounds`.
    pub fn paint_at(&self, canvas: &mut dyn Canvas, bounds: Rect, expansion: f32) {
        let sx = bounds.width / Self::SIZE;
        let sy = bounds.height / Self::SIZE;
        for stroke in Self::blend(expansion) {
            let points =
                stroke.map(|p| Point::new(p.x.mul_add(sx, bounds.x), p.y.mul_add(sy, bounds.y)));
            canvas.draw_path(&points, self.color, Self::STROKE_WIDTH);
        }
    }

    /// Inline SVG markup for the settled geometry.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let d: Vec<String> = Self::paths(self.expanded)
            .iter()
            .map(|s| {
                format!(
                    "M{} {}L{} {}L{} {}",
                    s[0].x, s[0].y, s[1].x, s[1].y, s[2].x, s[2].y
                )
            })
            .collect();
        let color = self.color.to_hex();
        let morph = self.morph.to_css("d");
        format!(
            r#"<svg class="cascade-chevron" width="12" height="12" viewBox="0 0 12 12" fill="none"><path d="{}" stroke="{color}" stroke-linecap="round" stroke-linejoin="round" style="transition: {morph}"/><path d="{}" stroke="{color}" stroke-linecap="round" stroke-linejoin="round" style="transition: {morph}"/></svg>"#,
            d[0], d[1]
        )
    }
}

impl Default for Chevron {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{DrawCommand, RecordingCanvas};

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn test_paths_select_geometry() {
        assert_eq!(Chevron::paths(false)[0][1], Point::new(6.0, 4.0));
        assert_eq!(Chevron::paths(true)[0][1], Point::new(6.0, 0.5));
        assert_eq!(Chevron::paths(true)[1][1], Point::new(6.0, 11.5));
    }

    #[test]
    fn test_paths_at_endpoints() {
        for expanded in [false, true] {
            let start = Chevron::paths_at(expanded, 0.0);
            let end = Chevron::paths_at(expanded, 1.0);
            for (a, b) in start.iter().flatten().zip(Chevron::paths(expanded).iter().flatten()) {
                assert!(approx(*a, *b));
            }
            for (a, b) in end.iter().flatten().zip(Chevron::paths(!expanded).iter().flatten()) {
                assert!(approx(*a, *b));
            }
        }
    }

    #[test]
    fn test_paths_at_midpoint() {
        let mid = Chevron::paths_at(false, 0.5);
        assert!(approx(mid[0][1], Point::new(6.0, 2.25)));
        assert!(approx(mid[1][1], Point::new(6.0, 9.75)));
    }

    #[test]
    fn test_progress_clamped() {
        assert_eq!(Chevron::paths_at(false, 3.0), Chevron::paths_at(false, 1.0));
        assert_eq!(Chevron::paths_at(true, -1.0), Chevron::paths(true));
    }

    #[test]
    fn test_morph_transition() {
        let morph = Chevron::new(false).morph();
        assert_eq!(morph.duration_ms, 400);
        assert_eq!(morph.easing, Easing::CubicBezier(0.23, 1.0, 0.32, 1.0));
        assert_eq!(Chevron::themed(true, &Theme::default()).morph(), morph);
    }

    #[test]
    fn test_paint_scales_into_bounds() {
        let mut canvas = RecordingCanvas::new();
        Chevron::new(true).paint(&mut canvas, Rect::new(100.0, 10.0, 24.0, 24.0));
        assert_eq!(canvas.command_count(), 2);
        match &canvas.ops()[0].command {
            DrawCommand::Path { points, width, .. } => {
                assert!(approx(points[1], Point::new(112.0, 11.0)));
                assert_eq!(*width, 1.0);
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_to_svg() {
        let svg = Chevron::new(false).to_svg();
        assert!(svg.contains(r#"d="M2.5 1.25L6 4L9.5 1.25""#));
        assert!(svg.contains("stroke=\"#10b981\""));
        assert!(svg.contains("d 400ms cubic-bezier(0.23, 1, 0.32, 1)"));
    }
}
