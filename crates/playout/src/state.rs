//! Builder state.
//!
//! The build loop threads a [`PlayoutBuilderState`] through every mode
//! scheduler. State is immutable by replacement: each advance produces a new
//! value via struct update, the old instance is never mutated. Persist the
//! final state and the next build continues from the same clock, guide
//! group, and mode progress.

use chrono::{DateTime, Utc};

/// The evolving state of one playout build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayoutBuilderState {
    /// The build clock; monotonically non-decreasing across schedulers.
    pub current_time: DateTime<Utc>,
    /// Guide group assigned to the next primary item.
    pub next_guide_group: i32,
    /// A flood block is draining (suppresses fixed-start re-anchoring).
    pub in_flood: bool,
    /// Remaining primaries of an in-flight multiple block.
    pub multiple_remaining: Option<u32>,
    /// Absolute finish of an in-flight duration block.
    pub duration_finish: Option<DateTime<Utc>>,
    /// A duration block is in its tail-filler phase.
    pub in_duration_filler: bool,
    /// Cursor into the program schedule's item list.
    pub schedule_item_index: usize,
}

impl PlayoutBuilderState {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current_time: start,
            next_guide_group: 1,
            in_flood: false,
            multiple_remaining: None,
            duration_finish: None,
            in_duration_filler: false,
            schedule_item_index: 0,
        }
    }

    /// Advance the clock.
    pub fn advanced_to(&self, time: DateTime<Utc>) -> Self {
        Self {
            current_time: time,
            ..self.clone()
        }
    }

    /// Consume one guide group for a primary item.
    pub fn bump_guide_group(&self) -> Self {
        Self {
            next_guide_group: self.next_guide_group + 1,
            ..self.clone()
        }
    }

    pub fn with_in_flood(&self, in_flood: bool) -> Self {
        Self {
            in_flood,
            ..self.clone()
        }
    }

    pub fn with_multiple_remaining(&self, remaining: Option<u32>) -> Self {
        Self {
            multiple_remaining: remaining,
            ..self.clone()
        }
    }

    pub fn with_duration_finish(&self, finish: Option<DateTime<Utc>>) -> Self {
        Self {
            duration_finish: finish,
            ..self.clone()
        }
    }

    pub fn with_in_duration_filler(&self, in_duration_filler: bool) -> Self {
        Self {
            in_duration_filler,
            ..self.clone()
        }
    }

    pub fn with_schedule_item_index(&self, index: usize) -> Self {
        Self {
            schedule_item_index: index,
            ..self.clone()
        }
    }

    /// Clear every mode-progress flag.
    pub fn cleared(&self) -> Self {
        Self {
            in_flood: false,
            multiple_remaining: None,
            duration_finish: None,
            in_duration_filler: false,
            ..self.clone()
        }
    }

    /// Whether any schedule item is mid-progress; while true the schedule
    /// cursor must not advance.
    pub fn is_mid_progress(&self) -> bool {
        self.in_flood
            || self.multiple_remaining.is_some()
            || self.duration_finish.is_some()
            || self.in_duration_filler
    }
}
