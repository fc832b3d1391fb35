//! Interaction state machine for the select widget.
//!
//! [`SelectState`] owns everything that changes while the user works the
//! widget: whether the list is open, which row is pressed, hovered or
//! focused, the committed value and the value being cross-faded out. It is
//! only ever mutated through [`SelectMessage`]s. Timed follow-ups (ending the
//! transition, dropping the outgoing value) come back as
//! [`Command::Delay`] effects for the host's scheduler.
//!
//! ```
//! use cascade_core::State;
//! use cascade_widgets::{SelectMessage, SelectOption, SelectState};
//!
//! let mut state = SelectState::new(vec![
//!     SelectOption::simple("Denver, USA"),
//!     SelectOption::simple("Brisbane, Australia"),
//! ]);
//! state.update(SelectMessage::Select(0));
//! let cmd = state.update(SelectMessage::Select(1));
//!
//! assert_eq!(state.selected(), Some("Brisbane, Australia"));
//! assert_eq!(state.previous(), Some("Denver, USA"));
//! assert!(state.is_transitioning());
//! assert_eq!(cmd.delays().len(), 2);
//! ```

use cascade_core::{Command, Key, State};
use serde::{Deserialize, Serialize};

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Unique value for this option
    pub value: String,
    /// Display label
    pub label: String,
    /// Whether this option is disabled
    #[serde(default)]
    pub disabled: bool,
}

impl SelectOption {
    /// Create a new option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Create an option where value equals label.
    #[must_use]
    pub fn simple(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: text,
            disabled: false,
        }
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// The four Laracon cities shown when no options are supplied.
#[must_use]
pub fn default_options() -> Vec<SelectOption> {
    [
        "Denver, USA",
        "Brisbane, Australia",
        "Amsterdam, Netherlands",
        "Gandhinagar, India",
    ]
    .into_iter()
    .map(SelectOption::simple)
    .collect()
}

/// Last input device the user touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputModality {
    /// Mouse, pen or touch
    #[default]
    Pointer,
    /// Keyboard; focus rings and focus hints are shown
    Keyboard,
}

/// Transitions of [`SelectState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectMessage {
    /// Flip open/closed.
    Toggle,
    /// Open the list.
    Open,
    /// Close the list.
    Close,
    /// Trigger pointer-down visual flag.
    SetPressed(bool),
    /// Commit the option at this index.
    Select(usize),
    /// Clear the transition flag of the given commit.
    EndTransition(u64),
    /// Drop the outgoing value of the given commit.
    ClearPrevious(u64),
    /// Row pressed flag.
    SetPressedOption(Option<usize>),
    /// Row hovered flag.
    SetHoveredOption(Option<usize>),
    /// Clear row pressed and hovered flags.
    ClearInteraction,
    /// Keyboard input while the trigger has focus.
    Key(Key),
    /// Adopt an externally controlled value.
    SyncValue(Option<String>),
    /// Trigger gained or lost keyboard focus.
    SetTriggerFocus(bool),
    /// Input modality changed.
    SetModality(InputModality),
}

/// Interaction state of one select widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectState {
    options: Vec<SelectOption>,
    is_open: bool,
    is_pressed: bool,
    selected: Option<String>,
    previous: Option<String>,
    placeholder_exiting: bool,
    is_transitioning: bool,
    pressed_index: Option<usize>,
    hovered_index: Option<usize>,
    focused_index: Option<usize>,
    trigger_focused: bool,
    modality: InputModality,
    auto_collapse: bool,
    disabled: bool,
    end_transition_ms: u32,
    clear_previous_ms: u32,
    commit_seq: u64,
    #[serde(skip)]
    pending_commit: Option<usize>,
}

impl Default for SelectState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SelectState {
    /// Closed state with nothing selected.
    #[must_use]
    pub const fn new(options: Vec<SelectOption>) -> Self {
        Self {
            options,
            is_open: false,
            is_pressed: false,
            selected: None,
            previous: None,
            placeholder_exiting: false,
            is_transitioning: false,
            pressed_index: None,
            hovered_index: None,
            focused_index: None,
            trigger_focused: false,
            modality: InputModality::Pointer,
            auto_collapse: false,
            disabled: false,
            end_transition_ms: 10,
            clear_previous_ms: 310,
            commit_seq: 0,
            pending_commit: None,
        }
    }

    /// Start with `value` selected, without any transition.
    #[must_use]
    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.selected = value;
        self
    }

    /// Close the list after each commit.
    #[must_use]
    pub const fn with_auto_collapse(mut self, auto_collapse: bool) -> Self {
        self.auto_collapse = auto_collapse;
        self
    }

    /// Ignore user input.
    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Delays of the two follow-ups scheduled by a commit.
    ///
    /// The outgoing label is never cleared before the transition ends, so
    /// `clear_previous_ms` is raised to `end_transition_ms` when shorter.
    #[must_use]
    pub const fn with_timing(mut self, end_transition_ms: u32, clear_previous_ms: u32) -> Self {
        self.end_transition_ms = end_transition_ms;
        self.clear_previous_ms = if clear_previous_ms < end_transition_ms {
            end_transition_ms
        } else {
            clear_previous_ms
        };
        self
    }

    /// Toggle closing the list after each commit. Takes effect from the next commit.
    pub fn set_auto_collapse(&mut self, auto_collapse: bool) {
        self.auto_collapse = auto_collapse;
    }

    /// Replace the option list, keeping the focused row in range.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
        let last = self.options.len().checked_sub(1);
        self.focused_index = match (self.is_open, self.focused_index, last) {
            (true, Some(i), Some(last)) => Some(i.min(last)),
            (true, None, Some(_)) => self.focused_index,
            _ => None,
        };
        self.pressed_index = self.pressed_index.filter(|&i| i < self.options.len());
        self.hovered_index = self.hovered_index.filter(|&i| i < self.options.len());
    }

    /// Enable or disable user input. Disabling closes the list.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.is_pressed = false;
            self.close();
        }
    }

    /// Index of the option committed by the last update, if any.
    ///
    /// Each commit is reported once.
    pub fn take_commit(&mut self) -> Option<usize> {
        self.pending_commit.take()
    }

    /// The option list.
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Whether the list is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether the trigger is held down.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    /// Committed value.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Value being cross-faded out.
    #[must_use]
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Whether the placeholder is the element being cross-faded out.
    #[must_use]
    pub const fn placeholder_exiting(&self) -> bool {
        self.placeholder_exiting
    }

    /// Whether a commit transition is in its opening window.
    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }

    /// Pressed row.
    #[must_use]
    pub const fn pressed_index(&self) -> Option<usize> {
        self.pressed_index
    }

    /// Hovered row.
    #[must_use]
    pub const fn hovered_index(&self) -> Option<usize> {
        self.hovered_index
    }

    /// Keyboard-focused row.
    #[must_use]
    pub const fn focused_index(&self) -> Option<usize> {
        self.focused_index
    }

    /// Whether the trigger has keyboard focus.
    #[must_use]
    pub const fn trigger_focused(&self) -> bool {
        self.trigger_focused
    }

    /// Last input modality.
    #[must_use]
    pub const fn modality(&self) -> InputModality {
        self.modality
    }

    /// Whether focus hints should be drawn.
    #[must_use]
    pub fn keyboard_focus_visible(&self) -> bool {
        self.modality == InputModality::Keyboard
    }

    /// Whether commits close the list.
    #[must_use]
    pub const fn auto_collapse(&self) -> bool {
        self.auto_collapse
    }

    /// Whether user input is ignored.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Sequence number of the latest cross-fade.
    #[must_use]
    pub const fn commit_seq(&self) -> u64 {
        self.commit_seq
    }

    /// Index of the committed option, if it is in the list.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.options.iter().position(|o| o.value == selected)
    }

    /// The committed option, if it is in the list.
    #[must_use]
    pub fn selected_option(&self) -> Option<&SelectOption> {
        self.selected_index().map(|i| &self.options[i])
    }

    /// Label for `value`, falling back to the value itself.
    #[must_use]
    pub fn label_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map_or(value, |o| o.label.as_str())
    }

    fn last_index(&self) -> Option<usize> {
        self.options.len().checked_sub(1)
    }

    fn open(&mut self) {
        if !self.is_open {
            log::debug!("select opened");
        }
        self.is_open = true;
        self.focused_index = if self.options.is_empty() { None } else { Some(0) };
    }

    fn close(&mut self) {
        if self.is_open {
            log::debug!("select closed");
        }
        self.is_open = false;
        self.focused_index = None;
        self.pressed_index = None;
        self.hovered_index = None;
    }

    fn clear_interaction(&mut self) {
        self.pressed_index = None;
        self.hovered_index = None;
    }

    fn start_crossfade(&mut self, value: String) -> Command<SelectMessage> {
        match self.selected.take() {
            Some(old) => {
                self.previous = Some(old);
                self.placeholder_exiting = false;
            }
            None => {
                self.previous = None;
                self.placeholder_exiting = true;
            }
        }
        self.selected = Some(value);
        self.is_transitioning = true;
        self.commit_seq += 1;
        Command::batch([
            Command::delay(self.end_transition_ms, SelectMessage::EndTransition(self.commit_seq)),
            Command::delay(self.clear_previous_ms, SelectMessage::ClearPrevious(self.commit_seq)),
        ])
    }

    fn commit(&mut self, index: usize) -> Command<SelectMessage> {
        let Some(option) = self.options.get(index) else {
            return Command::None;
        };
        if option.disabled {
            log::debug!("ignored commit of disabled option {:?}", option.value);
            return Command::None;
        }
        let value = option.value.clone();
        log::debug!("select committed {value:?}");

        let cmd = if self.selected.as_deref() == Some(value.as_str()) {
            Command::None
        } else {
            self.start_crossfade(value)
        };

        self.clear_interaction();
        if self.auto_collapse {
            self.close();
            self.trigger_focused = true;
        }
        self.pending_commit = Some(index);
        cmd
    }

    fn navigate(&mut self, key: Key) -> Command<SelectMessage> {
        if !self.is_open {
            self.open();
            return Command::None;
        }
        let Some(last) = self.last_index() else {
            self.focused_index = None;
            return Command::None;
        };
        self.focused_index = Some(match (key, self.focused_index) {
            (Key::Down, None) | (Key::Home, _) => 0,
            (Key::Down, Some(i)) => (i + 1).min(last),
            (Key::Up, None) | (Key::End, _) => last,
            (Key::Up, Some(i)) => i.saturating_sub(1).min(last),
            (_, current) => current.unwrap_or(0).min(last),
        });
        Command::None
    }

    fn key(&mut self, key: Key) -> Command<SelectMessage> {
        self.modality = InputModality::Keyboard;
        if key.is_navigation() {
            return self.navigate(key);
        }
        if key.is_activation() {
            if !self.is_open {
                self.open();
                return Command::None;
            }
            return match self.focused_index {
                Some(i) => self.commit(i),
                None => Command::None,
            };
        }
        if key == Key::Escape {
            self.close();
            self.trigger_focused = true;
        }
        Command::None
    }

    fn sync_value(&mut self, value: Option<String>) -> Command<SelectMessage> {
        if value == self.selected {
            return Command::None;
        }
        log::debug!("select synced to controlled value {value:?}");
        match value {
            Some(value) => self.start_crossfade(value),
            None => {
                self.selected = None;
                self.previous = None;
                self.placeholder_exiting = false;
                self.is_transitioning = false;
                self.commit_seq += 1;
                Command::None
            }
        }
    }
}

impl State for SelectState {
    type Message = SelectMessage;

    fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
        use SelectMessage as M;

        // user input is dropped while disabled; follow-ups and sync still apply
        if self.disabled
            && matches!(
                msg,
                M::Toggle
                    | M::Open
                    | M::SetPressed(true)
                    | M::Select(_)
                    | M::SetPressedOption(Some(_))
                    | M::SetHoveredOption(Some(_))
                    | M::Key(_)
            )
        {
            return Command::None;
        }

        match msg {
            M::Toggle => {
                if self.is_open {
                    self.close();
                } else {
                    self.open();
                }
                Command::None
            }
            M::Open => {
                self.open();
                Command::None
            }
            M::Close => {
                self.close();
                Command::None
            }
            M::SetPressed(pressed) => {
                self.is_pressed = pressed;
                Command::None
            }
            M::Select(index) => self.commit(index),
            M::EndTransition(seq) => {
                if seq == self.commit_seq {
                    self.is_transitioning = false;
                }
                Command::None
            }
            M::ClearPrevious(seq) => {
                if seq == self.commit_seq {
                    self.previous = None;
                    self.placeholder_exiting = false;
                }
                Command::None
            }
            M::SetPressedOption(index) => {
                self.pressed_index = self.interactive_row(index);
                Command::None
            }
            M::SetHoveredOption(index) => {
                self.hovered_index = self.interactive_row(index);
                Command::None
            }
            M::ClearInteraction => {
                self.clear_interaction();
                Command::None
            }
            M::Key(key) => self.key(key),
            M::SyncValue(value) => self.sync_value(value),
            M::SetTriggerFocus(focused) => {
                self.trigger_focused = focused;
                Command::None
            }
            M::SetModality(modality) => {
                self.modality = modality;
                Command::None
            }
        }
    }
}

impl SelectState {
    // rows only take pointer flags while the list is open and the row is enabled
    fn interactive_row(&self, index: Option<usize>) -> Option<usize> {
        let i = index?;
        let option = self.options.get(i)?;
        (self.is_open && !option.disabled).then_some(i)
    }
}
