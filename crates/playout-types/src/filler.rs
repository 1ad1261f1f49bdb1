//! Filler presets.
//!
//! Filler is the secondary content a schedule item wraps around its
//! primaries: pre-roll before, mid-roll (with optional enter/exit framing)
//! between chapters, post-roll after, tail between scheduled spans, and
//! fallback when nothing else fits. A [`FillerPreset`] ties a filler slot to
//! a collection and a fill mode.
//!
//! Presets are validated at construction so that schedule-time code never
//! sees a count-mode preset without a count or a pad preset without a pad
//! interval.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collection::CollectionKey;
use chrono::TimeDelta;

/// Which slot a playout item fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillerKind {
    None,
    PreRoll,
    MidRoll,
    MidRollEnter,
    MidRollExit,
    PostRoll,
    Tail,
    Fallback,
}

impl FillerKind {
    /// Whether this kind participates in the mid-roll family (body or
    /// enter/exit framing).
    #[inline]
    pub fn is_mid_roll_family(self) -> bool {
        matches!(
            self,
            FillerKind::MidRoll | FillerKind::MidRollEnter | FillerKind::MidRollExit
        )
    }
}

/// How a filler slot is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillerMode {
    /// Drain items from the collection while they fit a fixed budget.
    Duration,
    /// Append exactly N items regardless of their durations.
    Count,
    /// Extend the composed block to the next clock multiple of N minutes.
    Pad,
}

/// Invalid preset shapes, rejected at construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresetError {
    #[error("duration-mode filler requires a duration")]
    MissingDuration,
    #[error("count-mode filler requires a count")]
    MissingCount,
    #[error("pad-mode filler requires a pad-to-nearest-minute interval")]
    MissingPadInterval,
    #[error("pad-mode filler is only valid for pre-roll, mid-roll, or post-roll slots")]
    InvalidPadKind,
    #[error("filler duration must not be negative")]
    NegativeDuration,
    #[error("pad interval must divide an hour (1-60)")]
    InvalidPadInterval,
}

/// One filler slot configuration: kind, mode, budget, and source collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillerPreset {
    pub kind: FillerKind,
    pub mode: FillerMode,
    pub duration: Option<TimeDelta>,
    pub count: Option<u32>,
    pub pad_to_nearest_minute: Option<u32>,
    pub allow_watermarks: bool,
    pub collection: CollectionKey,
}

impl FillerPreset {
    /// Duration-mode preset: drain `collection` while items fit `duration`.
    pub fn duration(
        kind: FillerKind,
        collection: CollectionKey,
        duration: TimeDelta,
    ) -> Result<Self, PresetError> {
        if duration < TimeDelta::zero() {
            return Err(PresetError::NegativeDuration);
        }
        Ok(Self {
            kind,
            mode: FillerMode::Duration,
            duration: Some(duration),
            count: None,
            pad_to_nearest_minute: None,
            allow_watermarks: false,
            collection,
        })
    }

    /// Count-mode preset: append exactly `count` items.
    pub fn count(
        kind: FillerKind,
        collection: CollectionKey,
        count: u32,
    ) -> Result<Self, PresetError> {
        Ok(Self {
            kind,
            mode: FillerMode::Count,
            duration: None,
            count: Some(count),
            pad_to_nearest_minute: None,
            allow_watermarks: false,
            collection,
        })
    }

    /// Pad-mode preset: extend the block to the next multiple of `minutes`.
    ///
    /// Only pre-roll, mid-roll, and post-roll slots can pad.
    pub fn pad(
        kind: FillerKind,
        collection: CollectionKey,
        minutes: u32,
    ) -> Result<Self, PresetError> {
        if !matches!(
            kind,
            FillerKind::PreRoll | FillerKind::MidRoll | FillerKind::PostRoll
        ) {
            return Err(PresetError::InvalidPadKind);
        }
        if minutes == 0 || minutes > 60 || 60 % minutes != 0 {
            return Err(PresetError::InvalidPadInterval);
        }
        Ok(Self {
            kind,
            mode: FillerMode::Pad,
            duration: None,
            count: None,
            pad_to_nearest_minute: Some(minutes),
            allow_watermarks: false,
            collection,
        })
    }

    /// Tail preset: drain `collection` up to the next scheduled start.
    ///
    /// The budget is the gap itself, so no duration is configured.
    pub fn tail(collection: CollectionKey) -> Self {
        Self {
            kind: FillerKind::Tail,
            mode: FillerMode::Duration,
            duration: None,
            count: None,
            pad_to_nearest_minute: None,
            allow_watermarks: false,
            collection,
        }
    }

    /// Fallback preset: one item stretched over whatever gap remains.
    pub fn fallback(collection: CollectionKey) -> Self {
        Self {
            kind: FillerKind::Fallback,
            mode: FillerMode::Duration,
            duration: None,
            count: None,
            pad_to_nearest_minute: None,
            allow_watermarks: false,
            collection,
        }
    }

    /// Build from raw parts, enforcing every mode invariant. Used when
    /// hydrating presets from persisted configuration.
    pub fn from_parts(
        kind: FillerKind,
        mode: FillerMode,
        duration: Option<TimeDelta>,
        count: Option<u32>,
        pad_to_nearest_minute: Option<u32>,
        allow_watermarks: bool,
        collection: CollectionKey,
    ) -> Result<Self, PresetError> {
        let relaxed = matches!(kind, FillerKind::Tail | FillerKind::Fallback);
        match mode {
            FillerMode::Duration if !relaxed && duration.is_none() => {
                return Err(PresetError::MissingDuration);
            }
            FillerMode::Count if count.is_none() => return Err(PresetError::MissingCount),
            FillerMode::Pad => {
                let Some(minutes) = pad_to_nearest_minute else {
                    return Err(PresetError::MissingPadInterval);
                };
                return Self::pad(kind, collection, minutes)
                    .map(|p| p.with_allow_watermarks(allow_watermarks));
            }
            _ => {}
        }
        if let Some(d) = duration
            && d < TimeDelta::zero()
        {
            return Err(PresetError::NegativeDuration);
        }
        Ok(Self {
            kind,
            mode,
            duration,
            count,
            pad_to_nearest_minute: None,
            allow_watermarks,
            collection,
        })
    }

    pub fn with_allow_watermarks(mut self, allow: bool) -> Self {
        self.allow_watermarks = allow;
        self
    }

    /// Whether this preset pads to a clock boundary.
    #[inline]
    pub fn is_pad(&self) -> bool {
        self.mode == FillerMode::Pad && self.pad_to_nearest_minute.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> CollectionKey {
        CollectionKey::collection(1)
    }

    #[test]
    fn duration_preset_requires_non_negative_budget() {
        let err = FillerPreset::duration(FillerKind::PreRoll, key(), TimeDelta::seconds(-1));
        assert_eq!(err.unwrap_err(), PresetError::NegativeDuration);
    }

    #[test]
    fn count_preset_carries_count() {
        let preset = FillerPreset::count(FillerKind::MidRollEnter, key(), 1).unwrap();
        assert_eq!(preset.count, Some(1));
        assert_eq!(preset.mode, FillerMode::Count);
    }

    #[test]
    fn from_parts_rejects_count_mode_without_count() {
        let err = FillerPreset::from_parts(
            FillerKind::MidRollEnter,
            FillerMode::Count,
            None,
            None,
            None,
            false,
            key(),
        );
        assert_eq!(err.unwrap_err(), PresetError::MissingCount);
    }

    #[test]
    fn pad_preset_restricted_to_roll_slots() {
        assert_eq!(
            FillerPreset::pad(FillerKind::Tail, key(), 30).unwrap_err(),
            PresetError::InvalidPadKind
        );
        assert!(FillerPreset::pad(FillerKind::PostRoll, key(), 30).is_ok());
    }

    #[test]
    fn pad_interval_must_divide_an_hour() {
        assert_eq!(
            FillerPreset::pad(FillerKind::PostRoll, key(), 0).unwrap_err(),
            PresetError::InvalidPadInterval
        );
        assert_eq!(
            FillerPreset::pad(FillerKind::PostRoll, key(), 90).unwrap_err(),
            PresetError::InvalidPadInterval
        );
        // A non-divisor would land pad boundaries off the interval grid
        // once the hour rolls over.
        assert_eq!(
            FillerPreset::pad(FillerKind::PostRoll, key(), 7).unwrap_err(),
            PresetError::InvalidPadInterval
        );
        for minutes in [1, 5, 10, 15, 20, 30, 60] {
            assert!(FillerPreset::pad(FillerKind::PostRoll, key(), minutes).is_ok());
        }
    }

    #[test]
    fn tail_preset_needs_no_duration() {
        let preset = FillerPreset::tail(key());
        assert_eq!(preset.kind, FillerKind::Tail);
        assert!(preset.duration.is_none());
        assert!(!preset.is_pad());
    }
}
