//! Program schedule model.
//!
//! A program schedule is an ordered list of [`ProgramScheduleItem`]s. Each
//! item names the collection to draw primaries from, how its block starts
//! (dynamic, or fixed to a wall-clock time of day), the playback variant
//! (once / flood / multiple / duration), and up to seven filler slots.

use chrono::{NaiveTime, TimeDelta};
use playout_types::{CollectionKey, FillerPreset};

/// How a schedule item's block anchors in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartType {
    /// Start wherever the previous block left the clock.
    Dynamic,
    /// Anchor to a wall-clock time of day in the channel's zone.
    Fixed,
}

/// What a duration block does with the gap between its last primary and its
/// configured finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailMode {
    /// Leave the gap empty; the channel is off-air until the finish.
    Offline,
    /// Fill the gap with tail filler (and fallback, when configured).
    Filler,
}

/// Playback variant of a schedule item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// One primary.
    Once,
    /// Keep emitting primaries until the next fixed start is due.
    Flood,
    /// Exactly `count` primaries.
    Multiple { count: u32 },
    /// Emit primaries while they fit inside `playout_duration`, then handle
    /// the remainder per `tail_mode`.
    Duration {
        playout_duration: TimeDelta,
        tail_mode: TailMode,
    },
}

/// One rule in a program schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramScheduleItem {
    pub index: u32,
    pub collection: CollectionKey,
    pub start_type: StartType,
    pub start_time: Option<NaiveTime>,
    pub playback: PlaybackMode,
    pub pre_roll_filler: Option<FillerPreset>,
    pub mid_roll_enter_filler: Option<FillerPreset>,
    pub mid_roll_filler: Option<FillerPreset>,
    pub mid_roll_exit_filler: Option<FillerPreset>,
    pub post_roll_filler: Option<FillerPreset>,
    pub tail_filler: Option<FillerPreset>,
    pub fallback_filler: Option<FillerPreset>,
}

impl ProgramScheduleItem {
    pub fn builder(
        index: u32,
        collection: CollectionKey,
        playback: PlaybackMode,
    ) -> ProgramScheduleItemBuilder {
        ProgramScheduleItemBuilder::new(index, collection, playback)
    }

    /// Whether any mid-roll-family filler (body or enter/exit framing) is
    /// configured.
    pub fn has_mid_roll_filler(&self) -> bool {
        self.mid_roll_filler.is_some()
            || self.mid_roll_enter_filler.is_some()
            || self.mid_roll_exit_filler.is_some()
    }

    /// The pre/mid/post/enter/exit slots, in composition order.
    pub fn roll_fillers(&self) -> impl Iterator<Item = &FillerPreset> {
        [
            self.pre_roll_filler.as_ref(),
            self.mid_roll_enter_filler.as_ref(),
            self.mid_roll_filler.as_ref(),
            self.mid_roll_exit_filler.as_ref(),
            self.post_roll_filler.as_ref(),
        ]
        .into_iter()
        .flatten()
    }
}

pub struct ProgramScheduleItemBuilder {
    item: ProgramScheduleItem,
}

impl ProgramScheduleItemBuilder {
    pub fn new(index: u32, collection: CollectionKey, playback: PlaybackMode) -> Self {
        Self {
            item: ProgramScheduleItem {
                index,
                collection,
                start_type: StartType::Dynamic,
                start_time: None,
                playback,
                pre_roll_filler: None,
                mid_roll_enter_filler: None,
                mid_roll_filler: None,
                mid_roll_exit_filler: None,
                post_roll_filler: None,
                tail_filler: None,
                fallback_filler: None,
            },
        }
    }

    /// Anchor the block to a wall-clock time of day.
    pub fn fixed_start(mut self, start_time: NaiveTime) -> Self {
        self.item.start_type = StartType::Fixed;
        self.item.start_time = Some(start_time);
        self
    }

    pub fn pre_roll(mut self, preset: FillerPreset) -> Self {
        self.item.pre_roll_filler = Some(preset);
        self
    }

    pub fn mid_roll_enter(mut self, preset: FillerPreset) -> Self {
        self.item.mid_roll_enter_filler = Some(preset);
        self
    }

    pub fn mid_roll(mut self, preset: FillerPreset) -> Self {
        self.item.mid_roll_filler = Some(preset);
        self
    }

    pub fn mid_roll_exit(mut self, preset: FillerPreset) -> Self {
        self.item.mid_roll_exit_filler = Some(preset);
        self
    }

    pub fn post_roll(mut self, preset: FillerPreset) -> Self {
        self.item.post_roll_filler = Some(preset);
        self
    }

    pub fn tail(mut self, preset: FillerPreset) -> Self {
        self.item.tail_filler = Some(preset);
        self
    }

    pub fn fallback(mut self, preset: FillerPreset) -> Self {
        self.item.fallback_filler = Some(preset);
        self
    }

    pub fn build(self) -> ProgramScheduleItem {
        self.item
    }
}

/// The ordered rule list for one channel.
#[derive(Debug, Clone, Default)]
pub struct ProgramSchedule {
    items: Vec<ProgramScheduleItem>,
}

impl ProgramSchedule {
    /// Build a schedule; items are ordered by their `index`.
    pub fn new(mut items: Vec<ProgramScheduleItem>) -> Self {
        items.sort_by_key(|i| i.index);
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&ProgramScheduleItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[ProgramScheduleItem] {
        &self.items
    }
}
