//! Trigger label renderer.
//!
//! The trigger shows either the placeholder or a selection group made of a
//! checkmark, a caption and the selected label. A commit cross-fades between
//! them. Leaving the placeholder slides it right while the group slides in
//! from the left. Changing the selection fades the new label in over the old
//! one.

use crate::select_state::SelectState;
use cascade_core::{Theme, Transition};

/// Blur applied to a label while it is faded out.
pub const LABEL_BLUR: f32 = 1.0;

/// Visual target of one trigger layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    /// Layer opacity
    pub opacity: f32,
    /// Horizontal offset from the resting position
    pub offset_x: f32,
    /// Blur radius
    pub blur: f32,
    /// Timing toward this target
    pub transition: Transition,
}

impl Layer {
    fn shown(transition: Transition) -> Self {
        Self {
            opacity: 1.0,
            offset_x: 0.0,
            blur: 0.0,
            transition,
        }
    }

    fn hidden(offset_x: f32, transition: Transition) -> Self {
        Self {
            opacity: 0.0,
            offset_x,
            blur: LABEL_BLUR,
            transition,
        }
    }

    /// Whether the layer is at full visibility.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.opacity >= 1.0
    }
}

/// A layer carrying text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    /// Text to draw
    pub text: String,
    /// Visual target
    pub layer: Layer,
}

/// Visual target of the whole trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerVisual {
    /// Press scale
    pub scale: f32,
    /// Whole-trigger opacity
    pub opacity: f32,
    /// Whether the keyboard focus ring is drawn
    pub focus_ring: bool,
    /// Timing of the press scale
    pub scale_transition: Transition,
    /// Placeholder text, while shown or exiting
    pub placeholder: Option<TextLayer>,
    /// Checkmark, caption and label slot
    pub selection: Option<Layer>,
    /// Selected label inside the selection group
    pub label: Option<TextLayer>,
    /// Previous label fading out of the same slot
    pub outgoing: Option<TextLayer>,
}

/// Describe the trigger for `state`.
#[must_use]
pub fn trigger_visual(state: &SelectState, theme: &Theme, placeholder: &str) -> TriggerVisual {
    let slide = theme.transitions.slide;
    let delayed = slide.with_delay(theme.motion.label_delay_ms);
    let shift = theme.motion.label_shift;

    let from_placeholder = state.placeholder_exiting();
    let placeholder_layer = match state.selected() {
        None => Some(Layer::shown(slide)),
        Some(_) if from_placeholder => Some(Layer::hidden(shift, slide)),
        Some(_) => None,
    };

    let selection = state.selected().map(|_| {
        if from_placeholder && state.is_transitioning() {
            Layer::hidden(-shift, slide)
        } else if from_placeholder {
            Layer::shown(delayed)
        } else {
            Layer::shown(slide)
        }
    });

    let city_change = state.previous().is_some();
    let label = state.selected().map(|value| TextLayer {
        text: state.label_for(value).to_owned(),
        layer: if city_change && state.is_transitioning() {
            Layer::hidden(0.0, slide)
        } else if city_change {
            Layer::shown(delayed)
        } else {
            Layer::shown(slide)
        },
    });

    let outgoing = state.previous().map(|value| TextLayer {
        text: state.label_for(value).to_owned(),
        layer: Layer::hidden(0.0, slide),
    });

    TriggerVisual {
        scale: if state.is_pressed() && !state.is_disabled() {
            0.99
        } else {
            1.0
        },
        opacity: if state.is_disabled() { 0.6 } else { 1.0 },
        focus_ring: state.keyboard_focus_visible() && state.trigger_focused() && !state.is_open(),
        scale_transition: theme.transitions.scale,
        placeholder: placeholder_layer.map(|layer| TextLayer {
            text: placeholder.to_owned(),
            layer,
        }),
        selection,
        label,
        outgoing,
    }
}
