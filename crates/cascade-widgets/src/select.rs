//! Animated select widget.
//!
//! [`Select`] wires the [`SelectState`] controller to everything around it:
//! the timer queue that ends cross-fades, the document-level listeners it
//! holds while mounted or open, the animated values it paints from and the
//! HTML/CSS it emits for web embedding.
//!
//! Hosts drive time explicitly with [`Select::advance`]:
//!
//! ```
//! use cascade_core::{Event, Key, Widget};
//! use cascade_widgets::Select;
//!
//! let mut select = Select::new().with_accessible_name("Laracon city");
//! select.mount();
//! select.event(&Event::KeyDown { key: Key::Enter });
//! select.event(&Event::KeyDown { key: Key::Down });
//! let changed = select.event(&Event::KeyDown { key: Key::Enter });
//!
//! assert!(changed.is_some());
//! assert_eq!(select.selected_value(), Some("Brisbane, Australia"));
//! select.advance(400);
//! assert!(select.state().previous().is_none());
//! ```

use crate::chevron::Chevron;
use crate::option_list::{compose_row_transform, row_at, row_rect, row_visuals, RowVisual};
use crate::select_state::{default_options, InputModality, SelectMessage, SelectOption, SelectState};
use crate::trigger::{trigger_visual, Layer, TextLayer, TriggerVisual};
use cascade_core::{
    widget::{AccessibleRole, LayoutResult},
    AnimatedValue, Brick, BrickAssertion, BrickBudget, BrickResult, BrickVerification, Canvas,
    Color, Constraints, CoreResult, Event, ListenerGuard, ListenerKind, ListenerRegistry,
    MouseButton, Point, Rect, Scheduler, Size, State, Theme, ThemeOverride, Transform2D,
    Transition, TypeId, Widget, WidgetId,
};
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

const DEFAULT_PLACEHOLDER: &str = "Select a Laracon";
const DEFAULT_CAPTION: &str = "Laracon";

// trigger and row content geometry
const INSET: f32 = 16.0;
const LABEL_RIGHT: f32 = 60.0;
const ICON: f32 = 12.0;
const ICON_GAP: f32 = 12.0;
const FOCUS_RING_WIDTH: f32 = 2.0;
const CHECKMARK: [Point; 3] = [
    Point::new(2.0, 6.5),
    Point::new(4.75, 9.0),
    Point::new(10.0, 3.0),
];
const CHECKMARK_WIDTH: f32 = 1.5;

/// Message emitted when a commit succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    /// The committed value
    pub value: String,
    /// The full option record
    pub option: SelectOption,
    /// Index of the option in the list
    pub index: usize,
}

type ChangeCallback = Box<dyn FnMut(&str, &SelectOption) + Send + Sync>;

// =============================================================================
// Animated visuals
// =============================================================================

#[derive(Debug, Clone)]
struct RowAnimation {
    offset_x: AnimatedValue<f32>,
    offset_y: AnimatedValue<f32>,
    rotation: AnimatedValue<f32>,
    blur: AnimatedValue<f32>,
    opacity: AnimatedValue<f32>,
    scale: AnimatedValue<f32>,
    checkmark: AnimatedValue<f32>,
}

impl RowAnimation {
    fn at(visual: &RowVisual) -> Self {
        Self {
            offset_x: AnimatedValue::new(visual.offset_x),
            offset_y: AnimatedValue::new(visual.offset_y),
            rotation: AnimatedValue::new(visual.rotation_deg),
            blur: AnimatedValue::new(visual.blur),
            opacity: AnimatedValue::new(visual.opacity),
            scale: AnimatedValue::new(visual.scale),
            checkmark: AnimatedValue::new(visual.checkmark_opacity),
        }
    }

    fn retarget(&mut self, visual: &RowVisual) {
        let t = visual.transitions;
        self.offset_x.retarget(visual.offset_x, t.transform);
        self.offset_y.retarget(visual.offset_y, t.transform);
        self.rotation.retarget(visual.rotation_deg, t.transform);
        self.blur.retarget(visual.blur, t.transform);
        self.opacity.retarget(visual.opacity, t.opacity);
        self.scale.retarget(visual.scale, t.scale);
        self.checkmark.retarget(visual.checkmark_opacity, t.checkmark);
    }

    fn values_mut(&mut self) -> [&mut AnimatedValue<f32>; 7] {
        [
            &mut self.offset_x,
            &mut self.offset_y,
            &mut self.rotation,
            &mut self.blur,
            &mut self.opacity,
            &mut self.scale,
            &mut self.checkmark,
        ]
    }

    fn advance(&mut self, delta_ms: f64) {
        for value in self.values_mut() {
            value.advance(delta_ms);
        }
    }

    fn is_settled(&self) -> bool {
        [
            &self.offset_x,
            &self.offset_y,
            &self.rotation,
            &self.blur,
            &self.opacity,
            &self.scale,
            &self.checkmark,
        ]
        .iter()
        .all(|v| v.is_settled())
    }

    fn transform(&self, row: Rect) -> Transform2D {
        compose_row_transform(
            row,
            self.offset_x.value(),
            self.offset_y.value(),
            self.rotation.value(),
            self.scale.value(),
        )
    }
}

#[derive(Debug, Clone)]
struct LayerAnimation {
    opacity: AnimatedValue<f32>,
    offset_x: AnimatedValue<f32>,
    blur: AnimatedValue<f32>,
}

impl LayerAnimation {
    fn at(layer: &Layer) -> Self {
        Self {
            opacity: AnimatedValue::new(layer.opacity),
            offset_x: AnimatedValue::new(layer.offset_x),
            blur: AnimatedValue::new(layer.blur),
        }
    }

    fn retarget(&mut self, layer: &Layer) {
        self.opacity.retarget(layer.opacity, layer.transition);
        self.offset_x.retarget(layer.offset_x, layer.transition);
        self.blur.retarget(layer.blur, layer.transition);
    }

    fn advance(&mut self, delta_ms: f64) {
        self.opacity.advance(delta_ms);
        self.offset_x.advance(delta_ms);
        self.blur.advance(delta_ms);
    }

    fn is_settled(&self) -> bool {
        self.opacity.is_settled() && self.offset_x.is_settled() && self.blur.is_settled()
    }
}

fn sync_layer(current: Option<LayerAnimation>, target: Option<&Layer>) -> Option<LayerAnimation> {
    let target = target?;
    Some(match current {
        Some(mut anim) => {
            anim.retarget(target);
            anim
        }
        None => LayerAnimation::at(target),
    })
}

// A new text starts at its target, except an outgoing label which starts
// fully visible and fades from there.
fn sync_text(
    current: Option<(String, LayerAnimation)>,
    target: Option<&TextLayer>,
    enter_visible: bool,
) -> Option<(String, LayerAnimation)> {
    let target = target?;
    match current {
        Some((text, mut anim)) if text == target.text => {
            anim.retarget(&target.layer);
            Some((text, anim))
        }
        _ => {
            let start = if enter_visible {
                Layer {
                    opacity: 1.0,
                    offset_x: 0.0,
                    blur: 0.0,
                    transition: target.layer.transition,
                }
            } else {
                target.layer
            };
            let mut anim = LayerAnimation::at(&start);
            anim.retarget(&target.layer);
            Some((target.text.clone(), anim))
        }
    }
}

#[derive(Debug, Clone)]
struct Animations {
    rows: Vec<RowAnimation>,
    trigger_scale: AnimatedValue<f32>,
    chevron: AnimatedValue<f32>,
    placeholder: Option<LayerAnimation>,
    selection: Option<LayerAnimation>,
    label: Option<(String, LayerAnimation)>,
    outgoing: Option<(String, LayerAnimation)>,
}

impl Animations {
    fn settled(rows: &[RowVisual], trigger: &TriggerVisual, expanded: bool) -> Self {
        Self {
            rows: rows.iter().map(RowAnimation::at).collect(),
            trigger_scale: AnimatedValue::new(trigger.scale),
            chevron: AnimatedValue::new(if expanded { 1.0 } else { 0.0 }),
            placeholder: trigger.placeholder.as_ref().map(|t| LayerAnimation::at(&t.layer)),
            selection: trigger.selection.as_ref().map(LayerAnimation::at),
            label: trigger
                .label
                .as_ref()
                .map(|t| (t.text.clone(), LayerAnimation::at(&t.layer))),
            outgoing: trigger
                .outgoing
                .as_ref()
                .map(|t| (t.text.clone(), LayerAnimation::at(&t.layer))),
        }
    }

    fn sync(&mut self, rows: &[RowVisual], trigger: &TriggerVisual, expanded: bool, morph: Transition) {
        if self.rows.len() == rows.len() {
            for (anim, visual) in self.rows.iter_mut().zip(rows) {
                anim.retarget(visual);
            }
        } else {
            self.rows = rows.iter().map(RowAnimation::at).collect();
        }
        self.trigger_scale
            .retarget(trigger.scale, trigger.scale_transition);
        self.chevron
            .retarget(if expanded { 1.0 } else { 0.0 }, morph);
        self.placeholder = sync_layer(
            self.placeholder.take(),
            trigger.placeholder.as_ref().map(|t| &t.layer),
        );
        self.selection = sync_layer(self.selection.take(), trigger.selection.as_ref());
        self.label = sync_text(self.label.take(), trigger.label.as_ref(), false);
        self.outgoing = sync_text(self.outgoing.take(), trigger.outgoing.as_ref(), true);
    }

    fn advance(&mut self, delta_ms: f64) {
        for row in &mut self.rows {
            row.advance(delta_ms);
        }
        self.trigger_scale.advance(delta_ms);
        self.chevron.advance(delta_ms);
        for layer in [&mut self.placeholder, &mut self.selection].into_iter().flatten() {
            layer.advance(delta_ms);
        }
        for (_, layer) in [&mut self.label, &mut self.outgoing].into_iter().flatten() {
            layer.advance(delta_ms);
        }
    }

    fn is_settled(&self) -> bool {
        self.rows.iter().all(RowAnimation::is_settled)
            && self.trigger_scale.is_settled()
            && self.chevron.is_settled()
            && [&self.placeholder, &self.selection]
                .into_iter()
                .flatten()
                .all(LayerAnimation::is_settled)
            && [&self.label, &self.outgoing]
                .into_iter()
                .flatten()
                .all(|(_, layer)| layer.is_settled())
    }
}

// =============================================================================
// Select
// =============================================================================

/// Animated select/dropdown widget.
pub struct Select {
    widget_id: WidgetId,
    state: SelectState,
    timers: Scheduler<SelectMessage>,
    theme: Theme,
    placeholder: String,
    caption: Option<String>,
    on_change: Option<ChangeCallback>,
    listeners: ListenerRegistry,
    modality_listener: Option<ListenerGuard>,
    outside_listener: Option<ListenerGuard>,
    unmounted: bool,
    auto_focus: bool,
    assertions: Vec<BrickAssertion>,
    anim: Animations,
    bounds: Rect,
    accessible_name_value: Option<String>,
    labelled_by: Option<String>,
    id_value: Option<String>,
    test_id_value: Option<String>,
}

impl fmt::Debug for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("widget_id", &self.widget_id)
            .field("state", &self.state)
            .field("placeholder", &self.placeholder)
            .field("pending_timers", &self.timers.pending_count())
            .field("unmounted", &self.unmounted)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl Select {
    /// Create a select with the default Laracon options.
    #[must_use]
    pub fn new() -> Self {
        let theme = Theme::default();
        let state = SelectState::new(default_options())
            .with_timing(theme.motion.end_transition_ms, theme.motion.clear_previous_ms);
        let rows = row_visuals(&state, &theme);
        let trigger = trigger_visual(&state, &theme, DEFAULT_PLACEHOLDER);
        let anim = Animations::settled(&rows, &trigger, false);
        let bounds = Rect::new(0.0, 0.0, theme.width, theme.height);
        Self {
            widget_id: WidgetId::new(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed)),
            state,
            timers: Scheduler::new(),
            theme,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            caption: Some(DEFAULT_CAPTION.to_string()),
            on_change: None,
            listeners: ListenerRegistry::new(),
            modality_listener: None,
            outside_listener: None,
            unmounted: false,
            auto_focus: false,
            assertions: vec![
                BrickAssertion::TextVisible,
                BrickAssertion::ContrastRatio(4.5),
                BrickAssertion::MaxLatencyMs(16),
            ],
            anim,
            bounds,
            accessible_name_value: None,
            labelled_by: None,
            id_value: None,
            test_id_value: None,
        }
    }

    /// Replace the option list.
    #[must_use]
    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.state.set_options(options.into_iter().collect());
        self.resettle();
        self
    }

    /// Replace the option list with simple string options.
    #[must_use]
    pub fn options_from_strings(self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options(options.into_iter().map(SelectOption::simple))
    }

    /// Initial selected value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.state = self.state.with_value(Some(value.into()));
        self.resettle();
        self
    }

    /// Called once per successful commit with the value and option.
    #[must_use]
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str, &SelectOption) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Text shown while nothing is selected.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self.resettle();
        self
    }

    /// Eyebrow text above the selected label.
    #[must_use]
    pub fn caption(mut self, text: impl Into<String>) -> Self {
        self.caption = Some(text.into());
        self
    }

    /// Drop the eyebrow text.
    #[must_use]
    pub fn without_caption(mut self) -> Self {
        self.caption = None;
        self
    }

    /// Ignore user input.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.state.set_disabled(disabled);
        self.resettle();
        self
    }

    /// Close the list after each commit.
    #[must_use]
    pub fn auto_collapse(mut self, auto_collapse: bool) -> Self {
        self.state = self.state.with_auto_collapse(auto_collapse);
        self
    }

    /// Take keyboard focus on mount.
    #[must_use]
    pub fn auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    /// Use a complete theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.state = self
            .state
            .with_timing(theme.motion.end_transition_ms, theme.motion.clear_previous_ms);
        self.theme = theme;
        self.bounds.height = self.theme.height;
        self.bounds.width = self.theme.width;
        self.resettle();
        self
    }

    /// Merge a partial theme over the current one.
    ///
    /// # Errors
    ///
    /// Returns the first invalid color, easing or value in `patch`.
    pub fn theme_override(self, patch: &ThemeOverride) -> CoreResult<Self> {
        let theme = self.theme.merged(patch)?;
        Ok(self.theme(theme))
    }

    /// Share a listener registry with the host.
    #[must_use]
    pub fn with_listeners(mut self, registry: ListenerRegistry) -> Self {
        self.modality_listener = None;
        self.outside_listener = None;
        self.listeners = registry;
        self
    }

    /// Add a verification assertion.
    #[must_use]
    pub fn with_assertion(mut self, assertion: BrickAssertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Set the accessible name (`aria-label`).
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    /// Set the labelling element (`aria-labelledby`).
    #[must_use]
    pub fn with_labelled_by(mut self, id: impl Into<String>) -> Self {
        self.labelled_by = Some(id.into());
        self
    }

    /// Set the element ID of the trigger.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id_value = Some(id.into());
        self
    }

    /// Set the test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Identity used for listener registrations.
    #[must_use]
    pub const fn widget_id(&self) -> WidgetId {
        self.widget_id
    }

    /// Controller state.
    #[must_use]
    pub const fn state(&self) -> &SelectState {
        &self.state
    }

    /// Active theme.
    #[must_use]
    pub const fn theme_ref(&self) -> &Theme {
        &self.theme
    }

    /// Placeholder text.
    #[must_use]
    pub fn placeholder_text(&self) -> &str {
        &self.placeholder
    }

    /// Eyebrow text.
    #[must_use]
    pub fn caption_text(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Committed value.
    #[must_use]
    pub fn selected_value(&self) -> Option<&str> {
        self.state.selected()
    }

    /// Committed option, if it is in the list.
    #[must_use]
    pub fn selected_option(&self) -> Option<&SelectOption> {
        self.state.selected_option()
    }

    /// Whether the list is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Whether user input is ignored.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.state.is_disabled()
    }

    /// Whether the widget has been unmounted.
    #[must_use]
    pub const fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    /// The listener registry this widget registers with.
    #[must_use]
    pub const fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Timers not yet fired.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    /// Whether any visual property is still moving.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.anim.is_settled()
    }

    /// The trigger's rect.
    #[must_use]
    pub fn trigger_rect(&self) -> Rect {
        Rect::new(self.bounds.x, self.bounds.y, self.bounds.width, self.theme.height)
    }

    /// Resting rect of row `index` when the list is open.
    #[must_use]
    pub fn row_rect(&self, index: usize) -> Rect {
        row_rect(self.trigger_rect(), &self.theme, index)
    }

    /// Area that counts as inside the widget for outside-click detection.
    #[must_use]
    pub fn hit_area(&self) -> Rect {
        let trigger = self.trigger_rect();
        if !self.state.is_open() {
            return trigger;
        }
        (0..self.state.options().len()).fold(trigger, |area, i| area.union(&self.row_rect(i)))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach to the document: start tracking input modality.
    pub fn mount(&mut self) {
        if self.unmounted {
            return;
        }
        if self.modality_listener.is_none() {
            self.modality_listener = Some(
                self.listeners
                    .acquire(self.widget_id, ListenerKind::ModalityTracking),
            );
        }
        if self.auto_focus && !self.state.is_disabled() {
            self.dispatch(SelectMessage::SetTriggerFocus(true));
        }
        log::debug!("select {} mounted", self.widget_id.0);
    }

    /// Detach from the document.
    ///
    /// Pending timers are cancelled and all listeners released. The widget
    /// ignores input and time from here on.
    pub fn unmount(&mut self) {
        self.timers.cancel_all();
        self.outside_listener = None;
        self.modality_listener = None;
        self.unmounted = true;
        log::debug!("select {} unmounted", self.widget_id.0);
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Apply a controller transition.
    ///
    /// Returns the change notification when the transition committed an
    /// option; `on_change` has already been called by then.
    pub fn dispatch(&mut self, msg: SelectMessage) -> Option<SelectionChanged> {
        if self.unmounted {
            log::debug!("select {} ignored {msg:?} after unmount", self.widget_id.0);
            return None;
        }
        let cmd = self.state.update(msg);
        self.timers.enqueue(cmd);
        self.sync_outside_listener();
        self.sync_animations();
        self.emit_commit()
    }

    /// Open the list.
    pub fn open(&mut self) {
        self.dispatch(SelectMessage::Open);
    }

    /// Close the list.
    pub fn close(&mut self) {
        self.dispatch(SelectMessage::Close);
    }

    /// Flip the list open or closed.
    pub fn toggle(&mut self) {
        self.dispatch(SelectMessage::Toggle);
    }

    /// Commit the option at `index`.
    pub fn select(&mut self, index: usize) -> Option<SelectionChanged> {
        self.dispatch(SelectMessage::Select(index))
    }

    /// Follow an externally controlled value. Never fires `on_change`.
    pub fn set_value(&mut self, value: Option<&str>) {
        self.dispatch(SelectMessage::SyncValue(value.map(str::to_owned)));
    }

    /// Enable or disable user input.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.state.set_disabled(disabled);
        self.sync_outside_listener();
        self.sync_animations();
    }

    /// Toggle closing the list after each commit.
    pub fn set_auto_collapse(&mut self, auto_collapse: bool) {
        self.state.set_auto_collapse(auto_collapse);
    }

    /// Replace the option list.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.state.set_options(options);
        self.sync_animations();
    }

    /// Advance timers and animations by `delta_ms`.
    pub fn advance(&mut self, delta_ms: u64) {
        if self.unmounted {
            return;
        }
        let fired = self.timers.advance(delta_ms);
        if !fired.is_empty() {
            for msg in fired {
                let cmd = self.state.update(msg);
                self.timers.enqueue(cmd);
            }
            self.sync_animations();
        }
        self.anim.advance(delta_ms as f64);
    }

    /// Handle an event routed from the document by the host.
    ///
    /// Acts only for the listeners this widget currently holds. Returns
    /// whether the event changed anything.
    pub fn handle_document_event(&mut self, event: &Event) -> bool {
        if self.unmounted {
            return false;
        }
        let mut handled = false;
        if self
            .listeners
            .has_listener(self.widget_id, ListenerKind::ModalityTracking)
        {
            let modality = match event {
                Event::KeyDown { .. } => Some(InputModality::Keyboard),
                Event::MouseDown { .. } => Some(InputModality::Pointer),
                _ => None,
            };
            if let Some(modality) = modality.filter(|&m| m != self.state.modality()) {
                self.dispatch(SelectMessage::SetModality(modality));
                handled = true;
            }
        }
        if let Event::MouseDown { position, .. } = event {
            let listening = self
                .listeners
                .has_listener(self.widget_id, ListenerKind::PointerDownOutside);
            if listening && !self.contains(*position) {
                log::debug!("select {} closed by outside pointer-down", self.widget_id.0);
                self.dispatch(SelectMessage::Close);
                handled = true;
            }
        }
        handled
    }

    fn contains(&self, point: Point) -> bool {
        self.hit_area().contains_point(&point) || self.row_hit(point).is_some()
    }

    fn row_hit(&self, point: Point) -> Option<usize> {
        let trigger = self.trigger_rect();
        let rows: Vec<(RowVisual, Transform2D)> = row_visuals(&self.state, &self.theme)
            .into_iter()
            .zip(&self.anim.rows)
            .map(|(visual, anim)| {
                let transform = anim.transform(row_rect(trigger, &self.theme, visual.index));
                (visual, transform)
            })
            .collect();
        row_at(trigger, &self.theme, &rows, point)
    }

    fn sync_outside_listener(&mut self) {
        if self.state.is_open() && !self.unmounted {
            if self.outside_listener.is_none() {
                self.outside_listener = Some(
                    self.listeners
                        .acquire(self.widget_id, ListenerKind::PointerDownOutside),
                );
            }
        } else {
            self.outside_listener = None;
        }
    }

    fn sync_animations(&mut self) {
        let rows = row_visuals(&self.state, &self.theme);
        let trigger = trigger_visual(&self.state, &self.theme, &self.placeholder);
        self.anim.sync(
            &rows,
            &trigger,
            self.state.is_open(),
            self.theme.transitions.chevron,
        );
    }

    fn resettle(&mut self) {
        let rows = row_visuals(&self.state, &self.theme);
        let trigger = trigger_visual(&self.state, &self.theme, &self.placeholder);
        self.anim = Animations::settled(&rows, &trigger, self.state.is_open());
    }

    fn emit_commit(&mut self) -> Option<SelectionChanged> {
        let index = self.state.take_commit()?;
        let option = self.state.options().get(index)?.clone();
        if let Some(callback) = self.on_change.as_mut() {
            callback(&option.value, &option);
        }
        Some(SelectionChanged {
            value: option.value.clone(),
            option,
            index,
        })
    }

    fn pointer_move(&mut self, position: Point) {
        if self.state.is_pressed() && !self.trigger_rect().contains_point(&position) {
            self.dispatch(SelectMessage::SetPressed(false));
        }
        if !self.state.is_open() {
            return;
        }
        let row = self.row_hit(position);
        if row != self.state.hovered_index() {
            self.dispatch(SelectMessage::SetHoveredOption(row));
        }
        if self.state.pressed_index().is_some() && row != self.state.pressed_index() {
            self.dispatch(SelectMessage::SetPressedOption(None));
        }
    }

    fn pointer_down(&mut self, position: Point) {
        self.handle_document_event(&Event::MouseDown {
            position,
            button: MouseButton::Left,
        });
        if self.trigger_rect().contains_point(&position) {
            self.dispatch(SelectMessage::SetPressed(true));
        } else if let Some(row) = self.row_hit(position) {
            self.dispatch(SelectMessage::SetPressedOption(Some(row)));
        }
    }

    fn pointer_up(&mut self, position: Point) -> Option<SelectionChanged> {
        if self.state.is_pressed() {
            self.dispatch(SelectMessage::SetPressed(false));
            if self.trigger_rect().contains_point(&position) {
                self.dispatch(SelectMessage::Toggle);
            }
            return None;
        }
        let pressed = self.state.pressed_index()?;
        let row = self.row_hit(position);
        self.dispatch(SelectMessage::SetPressedOption(None));
        if row == Some(pressed) {
            self.dispatch(SelectMessage::Select(pressed))
        } else {
            None
        }
    }

    /// Verify, then paint.
    ///
    /// # Errors
    ///
    /// Returns the first failed assertion; nothing is painted in that case.
    pub fn try_paint(&self, canvas: &mut dyn Canvas) -> BrickResult<()> {
        self.verify().into_result()?;
        self.paint(canvas);
        Ok(())
    }

    // =========================================================================
    // Painting
    // =========================================================================

    fn paint_row(&self, canvas: &mut dyn Canvas, trigger: Rect, visual: &RowVisual, anim: &RowAnimation) {
        let Some(option) = self.state.options().get(visual.index) else {
            return;
        };
        let theme = &self.theme;
        let rect = row_rect(trigger, theme, visual.index);
        let opacity = anim.opacity.value();

        canvas.push_transform(anim.transform(rect));
        canvas.push_blur(anim.blur.value());
        canvas.fill_rect(rect, theme.border_radius, theme.row_background.with_opacity(opacity));
        if theme.border_width > 0.0 {
            canvas.stroke_rect(
                rect,
                theme.border_radius,
                theme.border.with_opacity(opacity),
                theme.border_width,
            );
        }

        let check = Point::new(rect.x + INSET, rect.center().y - ICON / 2.0);
        paint_checkmark(
            canvas,
            check,
            theme.colors.accent.with_opacity(opacity * anim.checkmark.value()),
        );

        let color = if option.disabled {
            theme.colors.disabled
        } else {
            theme.colors.text
        };
        let style = theme.label_style(color.with_opacity(opacity));
        let origin = Point::new(check.x + ICON + ICON_GAP, baseline(rect, style.size));
        canvas.draw_text(&option.label, origin, &style);

        if visual.focus_ring {
            canvas.stroke_rect(rect, theme.border_radius, theme.colors.accent, FOCUS_RING_WIDTH);
        }
        canvas.pop_blur();
        canvas.pop_transform();
    }

    fn paint_trigger(&self, canvas: &mut dyn Canvas, trigger: Rect) {
        let theme = &self.theme;
        let visual = trigger_visual(&self.state, theme, &self.placeholder);
        let alpha = visual.opacity;

        canvas.push_transform(Transform2D::scale_about(
            trigger.center(),
            self.anim.trigger_scale.value(),
        ));
        canvas.fill_rect(trigger, theme.border_radius, theme.background.with_opacity(alpha));
        if theme.border_width > 0.0 {
            canvas.stroke_rect(
                trigger,
                theme.border_radius,
                theme.border.with_opacity(alpha),
                theme.border_width,
            );
        }
        if visual.focus_ring {
            canvas.stroke_rect(trigger, theme.border_radius, theme.colors.accent, FOCUS_RING_WIDTH);
        }

        let label_area = Rect::new(
            trigger.x + INSET,
            trigger.y,
            (trigger.width - INSET - LABEL_RIGHT).max(0.0),
            trigger.height,
        );
        canvas.push_clip(label_area);

        if let Some(layer) = &self.anim.placeholder {
            with_layer(canvas, layer, alpha, |canvas, opacity| {
                let style = theme.label_style(theme.colors.placeholder.with_opacity(opacity));
                let origin = Point::new(label_area.x, baseline(trigger, style.size));
                canvas.draw_text(&self.placeholder, origin, &style);
            });
        }

        if let Some(group) = &self.anim.selection {
            with_layer(canvas, group, alpha, |canvas, opacity| {
                let cy = trigger.center().y;
                paint_checkmark(
                    canvas,
                    Point::new(label_area.x, cy - ICON / 2.0),
                    theme.colors.accent.with_opacity(opacity),
                );
                let text_x = label_area.x + ICON + ICON_GAP;
                let label_y = match &self.caption {
                    Some(caption) => {
                        let mut style = theme.caption_style();
                        style.color = style.color.with_opacity(opacity);
                        canvas.draw_text(caption, Point::new(text_x, cy - 3.0), &style);
                        cy + 13.0
                    }
                    None => baseline(trigger, theme.font.size),
                };
                for (text, layer) in [&self.anim.outgoing, &self.anim.label].into_iter().flatten() {
                    with_layer(canvas, layer, opacity, |canvas, opacity| {
                        let style = theme.label_style(theme.colors.text.with_opacity(opacity));
                        canvas.draw_text(text, Point::new(text_x, label_y), &style);
                    });
                }
            });
        }
        canvas.pop_clip();

        let chevron = Rect::new(
            trigger.right() - INSET - Chevron::SIZE,
            trigger.center().y - Chevron::SIZE / 2.0,
            Chevron::SIZE,
            Chevron::SIZE,
        );
        Chevron::themed(self.state.is_open(), theme).paint_at(canvas, chevron, self.anim.chevron.value());
        canvas.pop_transform();
    }

    // =========================================================================
    // Markup
    // =========================================================================

    fn option_html(&self, visual: &RowVisual, option: &SelectOption) -> String {
        let t = visual.transitions;
        let transition = [
            t.scale.to_css("scale"),
            t.transform.to_css("transform"),
            t.opacity.to_css("opacity"),
            t.transform.to_css("filter"),
        ]
        .join(", ");
        let selected = self.state.selected() == Some(option.value.as_str());
        let focused = if visual.focus_ring { " is-focused" } else { "" };
        format!(
            r#"<div class="cascade-select-option{focused}" role="option" aria-selected="{selected}" aria-disabled="{}" tabindex="-1" data-value="{}" style="z-index: {}; transform: translateX({}px) translateY({}px) rotate({}deg); scale: {}; filter: blur({}px); opacity: {}; pointer-events: {}; transition: {transition}"><span class="cascade-select-check" style="opacity: {}; transition: {}"></span><span class="cascade-select-option-label">{}</span></div>"#,
            option.disabled,
            escape(&option.value),
            visual.z_index,
            visual.offset_x,
            visual.offset_y,
            visual.rotation_deg,
            visual.scale,
            visual.blur,
            visual.opacity,
            if visual.interactive { "auto" } else { "none" },
            visual.checkmark_opacity,
            t.checkmark.to_css("opacity"),
            escape(&option.label),
        )
    }

    fn trigger_content_html(&self) -> String {
        match self.state.selected() {
            None => format!(
                r#"<span class="cascade-select-placeholder">{}</span>"#,
                escape(&self.placeholder)
            ),
            Some(value) => {
                let caption = self
                    .caption
                    .as_deref()
                    .map(|c| format!(r#"<span class="cascade-select-caption">{}</span>"#, escape(c)))
                    .unwrap_or_default();
                format!(
                    r#"<div class="cascade-select-value"><span class="cascade-select-check"></span>{caption}<span class="cascade-select-label">{}</span></div>"#,
                    escape(self.state.label_for(value))
                )
            }
        }
    }
}

fn with_layer(
    canvas: &mut dyn Canvas,
    layer: &LayerAnimation,
    opacity: f32,
    draw: impl FnOnce(&mut dyn Canvas, f32),
) {
    canvas.push_transform(Transform2D::translate(layer.offset_x.value(), 0.0));
    canvas.push_blur(layer.blur.value());
    draw(&mut *canvas, opacity * layer.opacity.value());
    canvas.pop_blur();
    canvas.pop_transform();
}

fn paint_checkmark(canvas: &mut dyn Canvas, origin: Point, color: Color) {
    if color.a <= 0.0 {
        return;
    }
    let points = CHECKMARK.map(|p| Point::new(origin.x + p.x, origin.y + p.y));
    canvas.draw_path(&points, color, CHECKMARK_WIDTH);
}

// baseline that vertically centers a single line of `size` text in `rect`
fn baseline(rect: Rect, size: f32) -> f32 {
    size.mul_add(0.35, rect.center().y)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Brick for Select {
    fn brick_name(&self) -> &'static str {
        "Select"
    }

    fn assertions(&self) -> &[BrickAssertion] {
        &self.assertions
    }

    fn budget(&self) -> BrickBudget {
        BrickBudget::uniform(16)
    }

    fn verify(&self) -> BrickVerification {
        BrickVerification::run(&self.assertions, |assertion| match assertion {
            BrickAssertion::TextVisible => {
                if self.theme.colors.text.a > 0.0 && self.theme.font.size > 0.0 {
                    Ok(())
                } else {
                    Err("label text is transparent or has no size".into())
                }
            }
            BrickAssertion::ContrastRatio(min) => {
                let ratio = self.theme.text_contrast();
                if ratio >= *min {
                    Ok(())
                } else {
                    Err(format!("text contrast {ratio:.2}:1 is below {min}:1"))
                }
            }
            BrickAssertion::ElementPresent(selector) => {
                if self.to_html().contains(selector.as_str()) {
                    Ok(())
                } else {
                    Err(format!("{selector} missing from markup"))
                }
            }
            BrickAssertion::Focusable => {
                if self.state.is_disabled() {
                    Err("disabled select is not focusable".into())
                } else {
                    Ok(())
                }
            }
            BrickAssertion::MaxLatencyMs(max) => {
                let frame = self.budget().total_ms;
                if frame <= *max {
                    Ok(())
                } else {
                    Err(format!("frame budget {frame}ms exceeds {max}ms"))
                }
            }
        })
    }

    fn to_html(&self) -> String {
        let test_id = self.test_id_value.as_deref().unwrap_or("select");
        let mut attrs = format!(
            r#"role="{}" aria-expanded="{}" aria-haspopup="listbox""#,
            AccessibleRole::ComboBox.aria(),
            self.state.is_open()
        );
        for (name, value) in [
            ("aria-label", &self.accessible_name_value),
            ("aria-labelledby", &self.labelled_by),
            ("id", &self.id_value),
        ] {
            if let Some(value) = value {
                attrs.push_str(&format!(r#" {name}="{}""#, escape(value)));
            }
        }
        if self.state.is_disabled() {
            attrs.push_str(r#" tabindex="-1" aria-disabled="true""#);
        } else {
            attrs.push_str(r#" tabindex="0""#);
        }

        let visual = trigger_visual(&self.state, &self.theme, &self.placeholder);
        let focused = if visual.focus_ring { " is-focused" } else { "" };
        let rows: String = row_visuals(&self.state, &self.theme)
            .iter()
            .zip(self.state.options())
            .map(|(v, o)| self.option_html(v, o))
            .collect();
        let chevron = Chevron::themed(self.state.is_open(), &self.theme).to_svg();

        format!(
            r#"<div class="cascade-select" data-testid="{}"><div class="cascade-select-trigger{focused}" {attrs} style="transform: scale({})">{}{chevron}</div><div class="cascade-select-list" role="{}">{rows}</div></div>"#,
            escape(test_id),
            visual.scale,
            self.trigger_content_html(),
            AccessibleRole::ListBox.aria(),
        )
    }

    fn to_css(&self) -> String {
        let t = &self.theme;
        let font = format!(
            "font-family: {}; font-weight: {}; font-size: {}px; letter-spacing: {}em;",
            t.font.family, t.font.weight, t.font.size, t.font.letter_spacing
        );
        let border = format!("{}px solid {}", t.border_width, t.border.to_hex());
        [
            format!(".cascade-select {{ position: relative; width: {}px; }}", t.width),
            format!(
                ".cascade-select-trigger {{ width: {}px; height: {}px; display: flex; justify-content: space-between; align-items: center; box-sizing: border-box; padding: 0 {INSET}px; background: linear-gradient(180deg, {}, {}); border: {border}; border-radius: {}px; cursor: pointer; position: relative; z-index: 100; outline: none; transition: {}; }}",
                t.width,
                t.height,
                t.background.to_hex(),
                t.background_end.to_hex(),
                t.border_radius,
                t.transitions.scale.to_css("transform"),
            ),
            ".cascade-select-trigger[aria-disabled=\"true\"] { cursor: not-allowed; opacity: 0.6; }".to_string(),
            format!(
                ".cascade-select-placeholder {{ {font} color: {}; white-space: nowrap; }}",
                t.colors.placeholder.to_css()
            ),
            format!(
                ".cascade-select-caption {{ {font} font-size: {}px; color: {}; }}",
                t.font.caption_size,
                t.colors.disabled.to_css()
            ),
            format!(
                ".cascade-select-label, .cascade-select-option-label {{ {font} color: {}; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }}",
                t.colors.text.to_css()
            ),
            format!(
                ".cascade-select-check {{ display: inline-block; width: {ICON}px; height: {ICON}px; margin-right: {ICON_GAP}px; background: {}; transition: {}; }}",
                t.colors.accent.to_css(),
                t.transitions.checkmark.to_css("opacity"),
            ),
            format!(
                ".cascade-select-list {{ position: absolute; top: {}px; left: 0; }}",
                t.motion.list_offset
            ),
            format!(
                ".cascade-select-option {{ width: {}px; height: {}px; display: flex; align-items: center; box-sizing: border-box; padding-left: {INSET}px; background: {}; border: {border}; border-radius: {}px; margin-top: {}px; position: relative; transform-origin: right center; cursor: pointer; outline: none; }}",
                t.width,
                t.height,
                t.row_background.to_hex(),
                t.border_radius,
                t.motion.row_gap,
            ),
            ".cascade-select-option:first-child { margin-top: 0; }".to_string(),
            format!(
                ".cascade-select-option[aria-disabled=\"true\"] {{ cursor: not-allowed; }} .cascade-select-option[aria-disabled=\"true\"] .cascade-select-option-label {{ color: {}; }}",
                t.colors.disabled.to_css()
            ),
            format!(
                ".cascade-select-trigger.is-focused, .cascade-select-option.is-focused {{ box-shadow: inset 0 0 0 {FOCUS_RING_WIDTH}px {}; }}",
                t.colors.accent.to_hex()
            ),
        ]
        .join("\n")
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }
}

impl Widget for Select {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        constraints.constrain(Size::new(self.theme.width, self.theme.height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let trigger = self.trigger_rect();
        let visuals = row_visuals(&self.state, &self.theme);
        // rows sit under the trigger; lowest z first
        for (visual, anim) in visuals.iter().zip(&self.anim.rows).rev() {
            self.paint_row(canvas, trigger, visual, anim);
        }
        self.paint_trigger(canvas, trigger);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if self.unmounted || self.state.is_disabled() {
            return None;
        }

        let changed = match event {
            Event::MouseMove { position } => {
                self.pointer_move(*position);
                None
            }
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                self.pointer_down(*position);
                None
            }
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } => self.pointer_up(*position),
            Event::MouseLeave => {
                self.dispatch(SelectMessage::SetPressed(false));
                self.dispatch(SelectMessage::ClearInteraction);
                None
            }
            Event::KeyDown { key } => {
                self.handle_document_event(event);
                self.dispatch(SelectMessage::Key(*key))
            }
            Event::FocusIn => {
                self.dispatch(SelectMessage::SetTriggerFocus(true));
                None
            }
            Event::FocusOut => {
                self.dispatch(SelectMessage::SetTriggerFocus(false));
                None
            }
            _ => None,
        };

        changed.map(|c| Box::new(c) as Box<dyn Any + Send>)
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn is_interactive(&self) -> bool {
        !self.state.is_disabled()
    }

    fn is_focusable(&self) -> bool {
        !self.state.is_disabled()
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::ComboBox
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{DrawCommand, Key, RecordingCanvas};
    use std::sync::{Arc, Mutex};

    fn left_down(position: Point) -> Event {
        Event::MouseDown {
            position,
            button: MouseButton::Left,
        }
    }

    fn left_up(position: Point) -> Event {
        Event::MouseUp {
            position,
            button: MouseButton::Left,
        }
    }

    fn click(select: &mut Select, position: Point) -> Option<Box<dyn Any + Send>> {
        select.event(&left_down(position));
        select.event(&left_up(position))
    }

    fn opened() -> Select {
        let mut select = Select::new();
        select.layout(Rect::new(0.0, 0.0, 336.0, 48.0));
        select.open();
        select.advance(1000);
        select
    }

    fn row_center(select: &Select, index: usize) -> Point {
        // the open tilt is small; the rect center stays inside the rotated row
        select.row_rect(index).center()
    }

    // =========================================================================
    // Construction Tests
    // =========================================================================

    #[test]
    fn test_select_defaults() {
        let s = Select::new();
        assert_eq!(s.state().options().len(), 4);
        assert_eq!(s.placeholder_text(), "Select a Laracon");
        assert_eq!(s.caption_text(), Some("Laracon"));
        assert_eq!(s.selected_value(), None);
        assert!(!s.is_open());
        assert!(!s.is_disabled());
        assert!(!s.is_animating());
    }

    #[test]
    fn test_widget_ids_unique() {
        assert_ne!(Select::new().widget_id(), Select::new().widget_id());
    }

    #[test]
    fn test_select_builder() {
        let s = Select::new()
            .options_from_strings(["Red", "Green", "Blue"])
            .value("Green")
            .placeholder("Pick a color")
            .without_caption()
            .with_test_id("color-select")
            .with_accessible_name("Color")
            .with_labelled_by("color-label")
            .with_id("color");

        assert_eq!(s.state().options().len(), 3);
        assert_eq!(s.selected_value(), Some("Green"));
        assert_eq!(s.selected_option().map(|o| o.label.as_str()), Some("Green"));
        assert_eq!(s.caption_text(), None);
        assert_eq!(Widget::test_id(&s), Some("color-select"));
        assert_eq!(s.accessible_name(), Some("Color"));
        assert_eq!(s.accessible_role(), AccessibleRole::ComboBox);
        assert!(!s.state().is_transitioning());
    }

    #[test]
    fn test_theme_override_applies_timing() {
        let patch = ThemeOverride::from_yaml("motion:\n  end_transition_ms: 20\n  clear_previous_ms: 400\n").unwrap();
        let mut s = Select::new().theme_override(&patch).unwrap();
        s.select(0);
        s.advance(19);
        assert!(s.state().is_transitioning());
        s.advance(1);
        assert!(!s.state().is_transitioning());
        s.advance(379);
        assert!(s.state().placeholder_exiting());
        s.advance(1);
        assert!(!s.state().placeholder_exiting());
    }

    #[test]
    fn test_theme_keeps_label_until_transition_ends() {
        let mut theme = Theme::default();
        theme.motion.end_transition_ms = 500;
        theme.motion.clear_previous_ms = 5;
        let mut s = Select::new().theme(theme);
        s.select(0);
        s.advance(10);
        s.select(1);
        s.advance(6);
        assert!(s.state().is_transitioning());
        assert_eq!(s.state().previous(), Some("Denver, USA"));

        s.advance(494);
        assert!(!s.state().is_transitioning());
        assert_eq!(s.state().previous(), None);
        assert_eq!(s.pending_timers(), 0);
    }

    #[test]
    fn test_theme_override_error() {
        let patch = ThemeOverride::from_yaml("colors:\n  accent: \"#zz\"\n").unwrap();
        assert!(Select::new().theme_override(&patch).is_err());
    }

    #[test]
    fn test_measure_and_layout() {
        let mut s = Select::new();
        assert_eq!(s.measure(Constraints::unbounded()), Size::new(336.0, 48.0));
        s.layout(Rect::new(10.0, 20.0, 336.0, 48.0));
        assert_eq!(s.bounds(), Rect::new(10.0, 20.0, 336.0, 48.0));
        assert_eq!(s.trigger_rect(), Rect::new(10.0, 20.0, 336.0, 48.0));
        assert_eq!(s.row_rect(1).y, 20.0 + 60.0 + 60.0);
    }

    // =========================================================================
    // Pointer Tests
    // =========================================================================

    #[test]
    fn test_click_trigger_toggles() {
        let mut s = Select::new();
        let trigger = s.trigger_rect().center();
        s.event(&left_down(trigger));
        assert!(s.state().is_pressed());
        s.event(&left_up(trigger));
        assert!(!s.state().is_pressed());
        assert!(s.is_open());
        click(&mut s, trigger);
        assert!(!s.is_open());
    }

    #[test]
    fn test_drag_off_trigger_cancels_press() {
        let mut s = Select::new();
        s.event(&left_down(s.trigger_rect().center()));
        s.event(&Event::MouseMove {
            position: Point::new(900.0, 900.0),
        });
        assert!(!s.state().is_pressed());
        s.event(&left_up(Point::new(900.0, 900.0)));
        assert!(!s.is_open());
    }

    #[test]
    fn test_click_row_commits_and_notifies() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut s = Select::new().on_change(move |value, option| {
            sink.lock().unwrap().push((value.to_string(), option.label.clone()));
        });
        s.open();
        s.advance(1000);

        let row = row_center(&s, 2);
        let msg = click(&mut s, row).expect("commit message");
        let changed = msg.downcast::<SelectionChanged>().unwrap();
        assert_eq!(changed.value, "Amsterdam, Netherlands");
        assert_eq!(changed.index, 2);
        assert_eq!(s.selected_value(), Some("Amsterdam, Netherlands"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(
                "Amsterdam, Netherlands".to_string(),
                "Amsterdam, Netherlands".to_string()
            )]
        );
        assert!(s.is_open());
    }

    #[test]
    fn test_click_disabled_row_ignored() {
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let mut s = Select::new()
            .options(vec![
                SelectOption::simple("a"),
                SelectOption::simple("b").disabled(true),
            ])
            .on_change(move |_, _| *sink.lock().unwrap() += 1);
        s.open();
        s.advance(1000);
        let row = row_center(&s, 1);
        assert!(click(&mut s, row).is_none());
        assert_eq!(s.selected_value(), None);
        assert_eq!(*count.lock().unwrap(), 0);
    }

    #[test]
    fn test_hover_sets_row_flag() {
        let mut s = opened();
        let p = row_center(&s, 1);
        s.event(&Event::MouseMove { position: p });
        assert_eq!(s.state().hovered_index(), Some(1));
        s.event(&Event::MouseLeave);
        assert_eq!(s.state().hovered_index(), None);
    }

    #[test]
    fn test_outside_click_closes_and_releases_listener() {
        let mut s = opened();
        assert_eq!(s.listeners().count(ListenerKind::PointerDownOutside), 1);
        s.event(&left_down(Point::new(1000.0, 1000.0)));
        assert!(!s.is_open());
        assert_eq!(s.listeners().count(ListenerKind::PointerDownOutside), 0);
    }

    #[test]
    fn test_click_on_row_is_not_outside() {
        let mut s = opened();
        s.event(&left_down(row_center(&s, 3)));
        assert!(s.is_open());
        assert_eq!(s.state().pressed_index(), Some(3));
    }

    #[test]
    fn test_auto_collapse_closes_after_click() {
        let mut s = Select::new().auto_collapse(true);
        s.open();
        s.advance(1000);
        let row = row_center(&s, 0);
        click(&mut s, row);
        assert!(!s.is_open());
        assert!(s.state().trigger_focused());
        assert_eq!(s.listeners().total(), 0);
    }

    #[test]
    fn test_set_auto_collapse_at_runtime() {
        let mut s = Select::new();
        s.open();
        s.advance(1000);
        let row = row_center(&s, 0);
        click(&mut s, row);
        assert!(s.is_open());

        s.set_auto_collapse(true);
        let row = row_center(&s, 1);
        click(&mut s, row);
        assert!(!s.is_open());
        assert_eq!(s.selected_value(), Some("Brisbane, Australia"));
    }

    // =========================================================================
    // Keyboard Tests
    // =========================================================================

    #[test]
    fn test_keyboard_commit() {
        let mut s = Select::new();
        s.event(&Event::KeyDown { key: Key::Down });
        assert!(s.is_open());
        s.event(&Event::KeyDown { key: Key::End });
        let msg = s.event(&Event::KeyDown { key: Key::Enter });
        let changed = msg.unwrap().downcast::<SelectionChanged>().unwrap();
        assert_eq!(changed.value, "Gandhinagar, India");
        s.event(&Event::KeyDown { key: Key::Escape });
        assert!(!s.is_open());
        assert!(s.state().trigger_focused());
    }

    #[test]
    fn test_disabled_ignores_events() {
        let mut s = Select::new().disabled(true);
        let trigger = s.trigger_rect().center();
        click(&mut s, trigger);
        s.event(&Event::KeyDown { key: Key::Enter });
        assert!(!s.is_open());
        assert!(!s.is_interactive());
        assert!(!s.is_focusable());
    }

    // =========================================================================
    // Timer and Lifecycle Tests
    // =========================================================================

    #[test]
    fn test_advance_runs_followups() {
        let mut s = Select::new();
        s.select(0);
        s.advance(16);
        s.select(1);
        assert_eq!(s.state().previous(), Some("Denver, USA"));
        s.advance(10);
        assert!(!s.state().is_transitioning());
        s.advance(300);
        assert_eq!(s.state().previous(), None);
        assert_eq!(s.pending_timers(), 0);
    }

    #[test]
    fn test_unmount_cancels_timers_and_listeners() {
        let registry = ListenerRegistry::new();
        let mut s = Select::new().with_listeners(registry.clone());
        s.mount();
        s.open();
        s.select(1);
        assert_eq!(registry.total(), 2);
        assert_eq!(s.pending_timers(), 2);

        s.unmount();
        assert_eq!(registry.total(), 0);
        assert_eq!(s.pending_timers(), 0);
        s.advance(1000);
        assert!(s.state().is_transitioning());
        assert!(s.state().placeholder_exiting());
        assert!(s.select(2).is_none());
    }

    #[test]
    fn test_drop_releases_listeners() {
        let registry = ListenerRegistry::new();
        {
            let mut s = Select::new().with_listeners(registry.clone());
            s.mount();
            s.open();
            assert_eq!(registry.total(), 2);
        }
        assert_eq!(registry.total(), 0);
    }

    #[test]
    fn test_mount_auto_focus() {
        let mut s = Select::new().auto_focus(true);
        s.mount();
        assert!(s.state().trigger_focused());
        assert!(s.listeners().has_listener(s.widget_id(), ListenerKind::ModalityTracking));
    }

    #[test]
    fn test_document_events_track_modality() {
        let mut s = Select::new();
        s.mount();
        assert!(s.handle_document_event(&Event::KeyDown { key: Key::Tab }));
        assert_eq!(s.state().modality(), InputModality::Keyboard);
        assert!(s.handle_document_event(&left_down(Point::new(-5.0, -5.0))));
        assert_eq!(s.state().modality(), InputModality::Pointer);
    }

    #[test]
    fn test_set_value_does_not_notify() {
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let mut s = Select::new().on_change(move |_, _| *sink.lock().unwrap() += 1);
        s.set_value(Some("Brisbane, Australia"));
        assert_eq!(s.selected_value(), Some("Brisbane, Australia"));
        assert!(s.state().is_transitioning());
        assert_eq!(*count.lock().unwrap(), 0);
    }

    // =========================================================================
    // Paint Tests
    // =========================================================================

    #[test]
    fn test_paint_placeholder_and_rows() {
        let s = Select::new();
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.find_text("Select a Laracon").is_some());
        for city in ["Denver, USA", "Gandhinagar, India"] {
            assert!(canvas.find_text(city).is_some(), "{city}");
        }
        assert_eq!(canvas.transform_depth(), 0);
        assert_eq!(canvas.current_blur(), 0.0);
        assert!(canvas.current_clip().is_none());
    }

    #[test]
    fn test_paint_closed_rows_stacked_and_blurred() {
        let s = Select::new();
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        let op = canvas.find_text("Brisbane, Australia").unwrap();
        assert_eq!(op.blur, 2.0);
        let row = s.row_rect(1);
        let moved = op.transform.apply(row.origin());
        assert!((moved.y - 0.0).abs() < 1e-3);
    }

    #[test]
    fn test_paint_selected_with_caption() {
        let mut s = Select::new().value("Denver, USA");
        s.advance(1000);
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.find_text("Select a Laracon").is_none());
        assert!(canvas.find_text("Laracon").is_some());
        let label = canvas
            .text_ops()
            .filter(|(text, _, _)| *text == "Denver, USA")
            .count();
        // one in the trigger, one in the list
        assert_eq!(label, 2);
    }

    #[test]
    fn test_paint_crossfade_draws_both_labels() {
        let mut s = Select::new().value("Denver, USA");
        s.select(1);
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        let clipped: Vec<&str> = canvas
            .text_ops()
            .filter(|(_, _, op)| op.clip.is_some())
            .map(|(text, _, _)| text)
            .collect();
        assert!(clipped.contains(&"Denver, USA"));
        assert!(clipped.contains(&"Brisbane, Australia"));

        s.advance(1000);
        canvas.clear();
        s.paint(&mut canvas);
        let clipped: Vec<&str> = canvas
            .text_ops()
            .filter(|(_, _, op)| op.clip.is_some())
            .map(|(text, _, _)| text)
            .collect();
        assert!(!clipped.contains(&"Denver, USA"));
    }

    #[test]
    fn test_paint_chevron_paths() {
        let s = Select::new();
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        let paths = canvas
            .commands()
            .filter(|c| matches!(c, DrawCommand::Path { width, .. } if *width == Chevron::STROKE_WIDTH))
            .count();
        assert_eq!(paths, 2);
    }

    #[test]
    fn test_animation_settles() {
        let mut s = Select::new();
        s.open();
        assert!(s.is_animating());
        s.advance(1000);
        assert!(!s.is_animating());
    }

    #[test]
    fn test_paint_with_huge_row_stagger() {
        let patch = ThemeOverride::from_yaml("motion:\n  row_stagger_ms: 2000000000\n").unwrap();
        let mut s = Select::new().theme_override(&patch).unwrap();
        s.open();
        s.advance(16);
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.command_count() > 0);
        assert!(s.is_animating());
    }

    #[test]
    fn test_try_paint_fails_on_low_contrast() {
        let theme = Theme::from_yaml("colors:\n  text: \"#141414\"\n").unwrap();
        let s = Select::new().theme(theme);
        let mut canvas = RecordingCanvas::new();
        assert!(s.try_paint(&mut canvas).is_err());
        assert!(canvas.is_empty());

        let ok = Select::new();
        assert!(ok.try_paint(&mut canvas).is_ok());
        assert!(!canvas.is_empty());
    }

    // =========================================================================
    // Brick Tests
    // =========================================================================

    #[test]
    fn test_brick_verify_defaults() {
        let s = Select::new();
        assert_eq!(s.brick_name(), "Select");
        assert_eq!(s.budget(), BrickBudget::uniform(16));
        let v = s.verify();
        assert!(v.is_valid());
        assert_eq!(v.score(), 1.0);
        assert!(s.can_render());
    }

    #[test]
    fn test_brick_latency_assertion_checks_budget() {
        let tight = Select::new().with_assertion(BrickAssertion::MaxLatencyMs(8));
        let v = tight.verify();
        assert!(!v.is_valid());
        assert_eq!(v.failed.len(), 1);
        assert_eq!(v.failed[0].0, BrickAssertion::MaxLatencyMs(8));

        let loose = Select::new().with_assertion(BrickAssertion::MaxLatencyMs(33));
        assert!(loose.verify().is_valid());
    }

    #[test]
    fn test_brick_focusable_assertion() {
        let s = Select::new()
            .disabled(true)
            .with_assertion(BrickAssertion::Focusable);
        assert!(!s.verify().is_valid());
    }

    #[test]
    fn test_to_html_aria() {
        let mut s = Select::new()
            .with_accessible_name("Laracon city")
            .with_labelled_by("city-label")
            .with_id("city")
            .with_test_id("city-select");
        let html = s.to_html();
        assert!(html.contains(r#"data-testid="city-select""#));
        assert!(html.contains(r#"role="combobox""#));
        assert!(html.contains(r#"aria-expanded="false""#));
        assert!(html.contains(r#"aria-haspopup="listbox""#));
        assert!(html.contains(r#"aria-label="Laracon city""#));
        assert!(html.contains(r#"aria-labelledby="city-label""#));
        assert!(html.contains(r#"id="city""#));
        assert!(html.contains(r#"tabindex="0""#));
        assert!(html.contains(r#"role="listbox""#));
        assert_eq!(html.matches(r#"role="option""#).count(), 4);
        assert!(html.contains("Select a Laracon"));

        s.open();
        s.select(0);
        let html = s.to_html();
        assert!(html.contains(r#"aria-expanded="true""#));
        assert!(html.contains(r#"aria-selected="true""#));
        assert!(html.contains(r#"class="cascade-select-caption">Laracon<"#));
    }

    #[test]
    fn test_to_html_disabled_and_escaped() {
        let s = Select::new()
            .options(vec![SelectOption::new("r&d", "R&D <team>").disabled(true)])
            .disabled(true);
        let html = s.to_html();
        assert!(html.contains(r#"tabindex="-1""#));
        assert!(html.contains(r#"aria-disabled="true""#));
        assert!(html.contains("R&amp;D &lt;team&gt;"));
        assert!(html.contains(r#"data-value="r&amp;d""#));
    }

    #[test]
    fn test_to_html_deterministic() {
        let s = Select::new().with_test_id("a");
        assert_eq!(s.to_html(), s.to_html());
    }

    #[test]
    fn test_to_css_theme_values() {
        let css = Select::new().to_css();
        assert!(css.contains(".cascade-select-trigger"));
        assert!(css.contains("width: 336px"));
        assert!(css.contains("border-radius: 12px"));
        assert!(css.contains("top: 60px"));
        assert!(css.contains("background: #171717"));
        assert!(css.contains("transform-origin: right center"));
        assert!(css.contains("font-family: Inter"));
    }
}
