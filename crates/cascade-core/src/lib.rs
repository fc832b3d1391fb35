//! Core types and traits for the Cascade widget toolkit.
//!
//! This crate provides the foundation the widgets are built on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`] with WCAG contrast calculations
//! - Layout constraints: [`Constraints`]
//! - Input: [`Event`], [`Key`], [`MouseButton`]
//! - The [`Widget`] and [`Brick`] traits, the [`Canvas`] abstraction and a
//!   [`RecordingCanvas`] backend
//! - Animation: [`Easing`], [`Transition`], [`AnimatedValue`]
//! - Elm-style [`State`] updates returning timed [`Command`]s, driven by a
//!   virtual-clock [`Scheduler`]
//! - Scoped document-level listeners: [`ListenerRegistry`], [`ListenerGuard`]
//! - The [`Theme`] provider with YAML/JSON overrides
//!
//! No logger is installed here; diagnostics go through the `log` facade.

mod animation;
mod brick;
mod canvas;
mod color;
mod constraints;
mod error;
mod event;
mod geometry;
mod lifecycle;
mod scheduler;
mod state;
pub mod theme;
pub mod widget;

pub use animation::{AnimatedValue, Easing, EasingParseError, Interpolate, Transition};
pub use brick::{
    Brick, BrickAssertion, BrickBudget, BrickError, BrickResult, BrickVerification,
};
pub use canvas::{DrawCommand, DrawOp, RecordingCanvas};
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use error::{CoreError, CoreResult};
pub use event::{Event, Key, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use lifecycle::{ListenerGuard, ListenerId, ListenerKind, ListenerRegistry};
pub use scheduler::{Scheduler, TimerId};
pub use state::{Command, State};
pub use theme::{Motion, Theme, ThemeColors, ThemeFont, ThemeOverride, ThemeTransitions};
pub use widget::{
    AccessibleRole, Canvas, FontWeight, LayoutResult, TextStyle, Transform2D, TypeId, Widget,
    WidgetId,
};
