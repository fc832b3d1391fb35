//! Option list renderer.
//!
//! Maps the controller state to per-row visual targets. Closed rows are
//! stacked under the trigger, blurred and nearly transparent. Open rows fan
//! out with a growing tilt. Every transition is staggered by row index so
//! the list cascades open and shut.

use crate::select_state::SelectState;
use cascade_core::{Point, Rect, Theme, Transform2D, Transition};

/// Timing of each animated row property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowTransitions {
    /// Offset, rotation and blur
    pub transform: Transition,
    /// Row opacity
    pub opacity: Transition,
    /// Press scale
    pub scale: Transition,
    /// Checkmark opacity
    pub checkmark: Transition,
}

/// Visual target of one option row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowVisual {
    /// Row index
    pub index: usize,
    /// Horizontal offset from the resting position
    pub offset_x: f32,
    /// Vertical offset from the resting position
    pub offset_y: f32,
    /// Rotation about the row's right-center, in degrees
    pub rotation_deg: f32,
    /// Blur radius
    pub blur: f32,
    /// Row opacity
    pub opacity: f32,
    /// Press scale
    pub scale: f32,
    /// Paint order; higher rows are drawn on top
    pub z_index: i32,
    /// Checkmark icon opacity
    pub checkmark_opacity: f32,
    /// Whether the row accepts pointer input
    pub interactive: bool,
    /// Whether the keyboard focus ring is drawn
    pub focus_ring: bool,
    /// Property timings
    pub transitions: RowTransitions,
}

impl RowVisual {
    /// Transform placing a row whose resting rect is `row` at this visual's
    /// offset, rotation and scale.
    #[must_use]
    pub fn transform(&self, row: Rect) -> Transform2D {
        compose_row_transform(row, self.offset_x, self.offset_y, self.rotation_deg, self.scale)
    }
}

/// Row transform from raw animated properties.
///
/// Scale applies about the row center, rotation about the right-center,
/// then the offset moves the row.
#[must_use]
pub fn compose_row_transform(
    row: Rect,
    offset_x: f32,
    offset_y: f32,
    rotation_deg: f32,
    scale: f32,
) -> Transform2D {
    Transform2D::scale_about(row.center(), scale)
        .then(&Transform2D::rotate_about(
            row.right_center(),
            rotation_deg.to_radians(),
        ))
        .then(&Transform2D::translate(offset_x, offset_y))
}

/// Resting rect of row `index` for a trigger at `trigger`.
#[must_use]
pub fn row_rect(trigger: Rect, theme: &Theme, index: usize) -> Rect {
    Rect::new(
        trigger.x,
        trigger.y + theme.motion.list_offset + index as f32 * theme.row_pitch(),
        trigger.width,
        theme.height,
    )
}

/// Checkmark opacity for row `index`.
///
/// Selected beats the exiting previous value, which beats hover or keyboard
/// focus on an enabled row.
#[must_use]
pub fn checkmark_opacity(state: &SelectState, index: usize) -> f32 {
    let Some(option) = state.options().get(index) else {
        return 0.0;
    };
    let value = option.value.as_str();
    if state.selected() == Some(value) {
        return 1.0;
    }
    if state.is_transitioning() && state.previous() == Some(value) {
        return 1.0;
    }
    let hinted = state.hovered_index() == Some(index)
        || (state.keyboard_focus_visible() && state.focused_index() == Some(index));
    if hinted && !option.disabled {
        0.25
    } else {
        0.0
    }
}

/// Per-property timings for row `index`.
#[must_use]
pub fn row_transitions(theme: &Theme, index: usize) -> RowTransitions {
    let stagger = theme.motion.row_stagger_ms.saturating_mul(index as u32);
    let opacity = theme.transitions.row_opacity;
    RowTransitions {
        transform: Transition::new(theme.motion.row_transform_ms, theme.transitions.main)
            .with_delay(stagger),
        opacity: opacity.with_delay(
            opacity
                .delay_ms
                .saturating_add(stagger)
                .saturating_add(theme.motion.row_opacity_delay_ms),
        ),
        scale: theme.transitions.row_scale,
        checkmark: theme.transitions.checkmark,
    }
}

/// Visual targets for every row of `state`'s option list.
#[must_use]
pub fn row_visuals(state: &SelectState, theme: &Theme) -> Vec<RowVisual> {
    let open = state.is_open();
    let pitch = theme.row_pitch();
    let top = theme.motion.list_offset;

    state
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let step = i as f32;
            let (offset_x, offset_y, rotation_deg, blur, opacity) = if open {
                let opacity = if option.disabled { 0.5 } else { 1.0 };
                (2.0 * step, 0.0, -(step + 1.0), 0.0, opacity)
            } else {
                (
                    0.0,
                    -step.mul_add(pitch, top),
                    0.0,
                    theme.motion.closed_blur,
                    theme.motion.closed_opacity,
                )
            };
            let pressed = state.pressed_index() == Some(i) && !option.disabled;
            RowVisual {
                index: i,
                offset_x,
                offset_y,
                rotation_deg,
                blur,
                opacity,
                scale: if pressed { 0.99 } else { 1.0 },
                z_index: 99 - i as i32,
                checkmark_opacity: checkmark_opacity(state, i),
                interactive: open,
                focus_ring: open
                    && state.keyboard_focus_visible()
                    && state.focused_index() == Some(i),
                transitions: row_transitions(theme, i),
            }
        })
        .collect()
}

/// Index of the topmost interactive row under `point`, given each row's
/// current transform.
///
/// Rows are hit-tested in paint order reversed, so the highest `z_index`
/// wins where tilted rows overlap.
#[must_use]
pub fn row_at(
    trigger: Rect,
    theme: &Theme,
    rows: &[(RowVisual, Transform2D)],
    point: Point,
) -> Option<usize> {
    let mut order: Vec<&(RowVisual, Transform2D)> = rows.iter().collect();
    order.sort_by_key(|(visual, _)| std::cmp::Reverse(visual.z_index));
    order
        .into_iter()
        .filter(|(visual, _)| visual.interactive)
        .find(|(visual, transform)| {
            let rect = row_rect(trigger, theme, visual.index);
            inverse(transform).is_some_and(|inv| rect.contains_point(&inv.apply(point)))
        })
        .map(|(visual, _)| visual.index)
}

fn inverse(t: &Transform2D) -> Option<Transform2D> {
    let [a, b, c, d, e, f] = t.matrix;
    let det = a.mul_add(d, -(b * c));
    if det.abs() < f32::EPSILON {
        return None;
    }
    let inv = 1.0 / det;
    Some(Transform2D {
        matrix: [
            d * inv,
            -b * inv,
            -c * inv,
            a * inv,
            c.mul_add(f, -(d * e)) * inv,
            b.mul_add(e, -(a * f)) * inv,
        ],
    })
}
