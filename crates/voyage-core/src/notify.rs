//! Timed notification sequencing.
//!
//! Shows a queue of achievement notifications one at a time: each item stays
//! for a fixed dwell, the last one plays an exit animation, then completion
//! is signalled exactly once. All timing goes through a [`Scheduler`] that
//! the owner advances with presentation time.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scheduler::{Generation, GenerationCounter, Scheduler, TimerHandle};

/// Dwell and exit durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequencerTiming {
    /// How long each item is shown.
    pub dwell_ms: f64,
    /// Length of the exit animation after the last item.
    pub exit_ms: f64,
}

impl Default for SequencerTiming {
    fn default() -> Self {
        Self {
            dwell_ms: 3500.0,
            exit_ms: 400.0,
        }
    }
}

impl SequencerTiming {
    /// The exit animation must fit well inside one dwell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.exit_ms.is_finite() && self.exit_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "notifications.exitMs must be positive, got {}",
                self.exit_ms
            )));
        }
        if !(self.dwell_ms.is_finite() && self.dwell_ms >= 4.0 * self.exit_ms) {
            return Err(ConfigError::Invalid(format!(
                "notifications.dwellMs ({}) must be at least 4x exitMs ({})",
                self.dwell_ms, self.exit_ms
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum SequencerState {
    #[default]
    Idle,
    Showing(usize),
    Exiting,
}

/// Transition produced by [`NotificationSequencer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    Advanced(usize),
    Exiting,
    Completed,
}

/// Data for the index dots under the toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Indicator {
    pub total: usize,
    pub current: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Advance,
    Finish,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationSequencer {
    timing: SequencerTiming,
    items: Vec<String>,
    index: usize,
    state: SequencerState,
    visible: bool,
    generation: GenerationCounter,
    scheduler: Scheduler<(Generation, Step)>,
    pending: Option<TimerHandle>,
}

impl NotificationSequencer {
    pub fn new(timing: SequencerTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    pub fn timing(&self) -> SequencerTiming {
        self.timing
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Identifier on screen, including the last one while it animates out.
    pub fn current(&self) -> Option<&str> {
        match self.state {
            SequencerState::Showing(i) => self.items.get(i).map(String::as_str),
            SequencerState::Exiting => self.items.get(self.index).map(String::as_str),
            SequencerState::Idle => None,
        }
    }

    pub fn indicator(&self) -> Indicator {
        Indicator {
            total: self.items.len(),
            current: self.index,
        }
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending.is_some_and(|h| self.scheduler.is_pending(h))
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Start over with a new list. An empty list goes idle without
    /// signalling completion.
    pub fn replace(&mut self, items: Vec<String>, now_ms: f64) {
        self.cancel_timer();
        let generation = self.generation.bump();
        self.items = items;
        self.index = 0;

        if self.items.is_empty() {
            self.state = SequencerState::Idle;
            self.visible = false;
            return;
        }

        tracing::debug!(count = self.items.len(), "[notify] starting sequence");
        self.state = SequencerState::Showing(0);
        self.visible = true;
        self.pending = Some(self.scheduler.schedule(
            now_ms,
            self.timing.dwell_ms,
            (generation, Step::Advance),
        ));
    }

    /// Stop without signalling completion.
    pub fn cancel(&mut self) {
        self.cancel_timer();
        self.generation.bump();
        self.items.clear();
        self.index = 0;
        self.state = SequencerState::Idle;
        self.visible = false;
    }

    /// Fire every transition due at `now_ms`.
    ///
    /// Each follow-up timer is scheduled from the deadline that fired, so a
    /// long frame replays the transitions it skipped over.
    pub fn tick(&mut self, now_ms: f64) -> Vec<SequencerEvent> {
        let mut events = Vec::new();

        while let Some(fired) = self.scheduler.pop_due(now_ms) {
            let (generation, step) = fired.event;
            if !self.generation.is_current(generation) {
                tracing::debug!(
                    generation = generation.value(),
                    "[notify] dropping timer from an abandoned sequence"
                );
                continue;
            }
            self.pending = None;

            match (self.state, step) {
                (SequencerState::Showing(i), Step::Advance) if i + 1 < self.items.len() => {
                    self.index = i + 1;
                    self.state = SequencerState::Showing(i + 1);
                    self.pending = Some(self.scheduler.schedule_at(
                        fired.deadline_ms + self.timing.dwell_ms,
                        (generation, Step::Advance),
                    ));
                    events.push(SequencerEvent::Advanced(i + 1));
                }
                (SequencerState::Showing(_), Step::Advance) => {
                    self.state = SequencerState::Exiting;
                    self.visible = false;
                    self.pending = Some(self.scheduler.schedule_at(
                        fired.deadline_ms + self.timing.exit_ms,
                        (generation, Step::Finish),
                    ));
                    events.push(SequencerEvent::Exiting);
                }
                (SequencerState::Exiting, Step::Finish) => {
                    tracing::debug!(count = self.items.len(), "[notify] sequence complete");
                    self.items.clear();
                    self.index = 0;
                    self.state = SequencerState::Idle;
                    events.push(SequencerEvent::Completed);
                }
                (state, step) => {
                    tracing::warn!(?state, ?step, "[notify] unexpected timer");
                }
            }
        }

        events
    }
}
