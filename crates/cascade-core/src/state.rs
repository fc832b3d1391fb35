//! State management for Cascade widgets.
//!
//! This module implements the Elm Architecture pattern for predictable state
//! management: `State + Message → (State, Command)`.
//!
//! # Examples
//!
//! ```
//! use cascade_core::{Command, State};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Default, Serialize, Deserialize)]
//! struct Flash {
//!     visible: bool,
//! }
//!
//! enum FlashMessage {
//!     Show,
//!     Hide,
//! }
//!
//! impl State for Flash {
//!     type Message = FlashMessage;
//!
//!     fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
//!         match msg {
//!             FlashMessage::Show => {
//!                 self.visible = true;
//!                 Command::delay(1500, FlashMessage::Hide)
//!             }
//!             FlashMessage::Hide => {
//!                 self.visible = false;
//!                 Command::None
//!             }
//!         }
//!     }
//! }
//!
//! let mut flash = Flash::default();
//! let cmd = flash.update(FlashMessage::Show);
//! assert!(flash.visible);
//! assert_eq!(cmd.delays().len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Widget state trait.
///
/// Implements the Elm Architecture: State + Message → (State, Command)
pub trait State: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Message type for state updates
    type Message: Send;

    /// Update state in response to a message.
    ///
    /// Returns a command describing follow-up effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;
}

/// Commands for side effects.
///
/// The only effect a widget needs is a timed follow-up message; the host
/// feeds delays into a [`Scheduler`](crate::Scheduler) and dispatches the
/// messages back into `update` when they come due.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum Command<M> {
    /// No command
    #[default]
    None,
    /// Execute multiple commands
    Batch(Vec<Command<M>>),
    /// Deliver `message` after `after_ms` milliseconds
    Delay {
        /// Delay in milliseconds
        after_ms: u32,
        /// Message to deliver
        message: M,
    },
}

impl<M> Command<M> {
    /// Create a delayed message.
    pub const fn delay(after_ms: u32, message: M) -> Self {
        Self::Delay { after_ms, message }
    }

    /// Create a batch of commands.
    pub fn batch(commands: impl IntoIterator<Item = Self>) -> Self {
        Self::Batch(commands.into_iter().collect())
    }

    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Map the message type using a function.
    pub fn map<N, F>(self, f: F) -> Command<N>
    where
        F: Fn(M) -> N,
    {
        self.map_inner(&f)
    }

    fn map_inner<N, F>(self, f: &F) -> Command<N>
    where
        F: Fn(M) -> N,
    {
        match self {
            Self::None => Command::None,
            Self::Batch(cmds) => Command::Batch(cmds.into_iter().map(|c| c.map_inner(f)).collect()),
            Self::Delay { after_ms, message } => Command::Delay {
                after_ms,
                message: f(message),
            },
        }
    }

    /// Flatten into `(after_ms, message)` pairs in issue order.
    #[must_use]
    pub fn into_delays(self) -> Vec<(u32, M)> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(self, out: &mut Vec<(u32, M)>) {
        match self {
            Self::None => {}
            Self::Batch(cmds) => {
                for cmd in cmds {
                    cmd.collect_into(out);
                }
            }
            Self::Delay { after_ms, message } => out.push((after_ms, message)),
        }
    }

    /// Borrowing view of the delays in issue order.
    #[must_use]
    pub fn delays(&self) -> Vec<(u32, &M)> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(cmds) => cmds.iter().flat_map(Self::delays).collect(),
            Self::Delay { after_ms, message } => vec![(*after_ms, message)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Counter State Tests
    // =========================================================================

    #[derive(Clone, Default, Serialize, Deserialize)]
    struct Blink {
        on: bool,
        blinks: u32,
    }

    #[derive(Debug, PartialEq, Eq)]
    enum BlinkMsg {
        On,
        Off,
    }

    impl State for Blink {
        type Message = BlinkMsg;

        fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
            match msg {
                BlinkMsg::On => {
                    self.on = true;
                    self.blinks += 1;
                    Command::delay(100, BlinkMsg::Off)
                }
                BlinkMsg::Off => {
                    self.on = false;
                    Command::None
                }
            }
        }
    }

    #[test]
    fn test_state_update_returns_delay() {
        let mut state = Blink::default();
        let cmd = state.update(BlinkMsg::On);
        assert!(state.on);
        assert_eq!(cmd, Command::delay(100, BlinkMsg::Off));

        let cmd = state.update(BlinkMsg::Off);
        assert!(!state.on);
        assert!(cmd.is_none());
        assert_eq!(state.blinks, 1);
    }

    // =========================================================================
    // Command Tests
    // =========================================================================

    #[test]
    fn test_command_default_is_none() {
        let cmd: Command<u8> = Command::default();
        assert!(cmd.is_none());
    }

    #[test]
    fn test_command_batch_flatten_preserves_order() {
        let cmd = Command::batch([
            Command::delay(10, 'a'),
            Command::None,
            Command::batch([Command::delay(310, 'b'), Command::delay(5, 'c')]),
        ]);
        assert_eq!(cmd.delays(), vec![(10, &'a'), (310, &'b'), (5, &'c')]);
        assert_eq!(cmd.into_delays(), vec![(10, 'a'), (310, 'b'), (5, 'c')]);
    }

    #[test]
    fn test_command_map() {
        let cmd = Command::batch([Command::delay(10, 1u8), Command::delay(20, 2u8)]);
        let mapped = cmd.map(|n| u32::from(n) * 100);
        assert_eq!(mapped.into_delays(), vec![(10, 100), (20, 200)]);
    }

    #[test]
    fn test_command_map_none() {
        let cmd: Command<u8> = Command::None;
        assert!(cmd.map(|n| n.to_string()).is_none());
    }
}
