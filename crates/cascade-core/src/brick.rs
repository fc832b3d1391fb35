//! Brick contract types.
//!
//! A brick is a widget that can state falsifiable claims about itself
//! (assertions), a render budget, and a deterministic HTML/CSS rendering.
//! Painting is gated on verification: a widget whose assertions fail is not
//! drawn.

use std::time::{Duration, Instant};
use thiserror::Error;

/// Brick assertion that must be verified at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum BrickAssertion {
    /// Text content must be visible (not hidden, not zero-opacity)
    TextVisible,

    /// Minimum contrast ratio between foreground and background (4.5 is WCAG AA)
    ContrastRatio(f32),

    /// Maximum render latency in milliseconds
    MaxLatencyMs(u32),

    /// Element matching the selector must be present in the HTML output
    ElementPresent(String),

    /// Element must be focusable for accessibility
    Focusable,
}

/// Performance budget for a brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickBudget {
    /// Maximum time for measure phase
    pub measure_ms: u32,
    /// Maximum time for layout phase
    pub layout_ms: u32,
    /// Maximum time for paint phase
    pub paint_ms: u32,
    /// Total budget (may be less than sum of phases)
    pub total_ms: u32,
}

impl BrickBudget {
    /// Create a budget with equal distribution across phases
    #[must_use]
    pub const fn uniform(total_ms: u32) -> Self {
        let phase_ms = total_ms / 3;
        Self {
            measure_ms: phase_ms,
            layout_ms: phase_ms,
            paint_ms: phase_ms,
            total_ms,
        }
    }
}

impl Default for BrickBudget {
    fn default() -> Self {
        // one frame at 60fps
        Self::uniform(16)
    }
}

/// Result of verifying brick assertions.
#[derive(Debug, Clone)]
pub struct BrickVerification {
    /// All assertions that passed
    pub passed: Vec<BrickAssertion>,
    /// All assertions that failed with reasons
    pub failed: Vec<(BrickAssertion, String)>,
    /// Time taken to verify
    pub verification_time: Duration,
}

impl BrickVerification {
    /// Run `check` against every assertion and collect the outcome.
    ///
    /// `check` returns `Err(reason)` for a failing assertion.
    pub fn run<F>(assertions: &[BrickAssertion], mut check: F) -> Self
    where
        F: FnMut(&BrickAssertion) -> Result<(), String>,
    {
        let start = Instant::now();
        let mut passed = Vec::new();
        let mut failed = Vec::new();
        for assertion in assertions {
            match check(assertion) {
                Ok(()) => passed.push(assertion.clone()),
                Err(reason) => failed.push((assertion.clone(), reason)),
            }
        }
        Self {
            passed,
            failed,
            verification_time: start.elapsed(),
        }
    }

    /// Check if all assertions passed
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failed.is_empty()
    }

    /// Get the falsification score (passed / total)
    #[must_use]
    pub fn score(&self) -> f32 {
        let total = self.passed.len() + self.failed.len();
        if total == 0 {
            1.0
        } else {
            self.passed.len() as f32 / total as f32
        }
    }

    /// Convert the first failure into an error.
    ///
    /// # Errors
    ///
    /// Returns [`BrickError::AssertionFailed`] if any assertion failed.
    pub fn into_result(self) -> BrickResult<()> {
        match self.failed.into_iter().next() {
            None => Ok(()),
            Some((assertion, reason)) => Err(BrickError::AssertionFailed { assertion, reason }),
        }
    }
}

/// Core Brick trait.
///
/// `Widget` requires `Brick`, so every widget has verifiable assertions and
/// a budget.
pub trait Brick: Send + Sync {
    /// Get the brick's unique type name
    fn brick_name(&self) -> &'static str;

    /// Get all assertions for this brick
    fn assertions(&self) -> &[BrickAssertion];

    /// Get the performance budget
    fn budget(&self) -> BrickBudget;

    /// Verify all assertions against current state
    fn verify(&self) -> BrickVerification;

    /// Generate HTML for this brick.
    ///
    /// Must be deterministic (same state -> same output).
    fn to_html(&self) -> String;

    /// Generate CSS for this brick, scoped to avoid conflicts.
    fn to_css(&self) -> String;

    /// Get the test ID for DOM queries
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Check if this brick can be rendered (all assertions pass)
    fn can_render(&self) -> bool {
        self.verify().is_valid()
    }
}

/// Brick verification and rendering errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrickError {
    /// Assertion failed during verification
    #[error("assertion {assertion:?} failed: {reason}")]
    AssertionFailed {
        /// The assertion that failed
        assertion: BrickAssertion,
        /// Reason for failure
        reason: String,
    },

    /// Budget exceeded during rendering
    #[error("budget exceeded for {brick_name}: {actual:?} > {budget_ms}ms")]
    BudgetExceeded {
        /// Name of the brick that violated its budget
        brick_name: String,
        /// Total budget in milliseconds
        budget_ms: u32,
        /// Actual time taken
        actual: Duration,
    },
}

/// Result type for brick operations
pub type BrickResult<T> = Result<T, BrickError>;
