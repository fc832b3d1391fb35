//! Animated select widget for the Cascade toolkit.
//!
//! The widget is split into a pure controller and pure renderers:
//! - [`SelectState`]: interaction state machine and cross-fade timers
//! - [`row_visuals`]: per-row fan-out targets for the option list
//! - [`trigger_visual`]: placeholder and label layers of the trigger
//! - [`Chevron`]: the morphing open/closed indicator
//! - [`Select`]: the [`cascade_core::Widget`] that drives them all

pub mod chevron;
pub mod option_list;
pub mod select;
pub mod select_state;
pub mod trigger;

pub use chevron::{Chevron, Stroke};
pub use option_list::{
    checkmark_opacity, compose_row_transform, row_at, row_rect, row_transitions, row_visuals,
    RowTransitions, RowVisual,
};
pub use select::{Select, SelectionChanged};
pub use select_state::{default_options, InputModality, SelectMessage, SelectOption, SelectState};
pub use trigger::{trigger_visual, Layer, TextLayer, TriggerVisual, LABEL_BLUR};
