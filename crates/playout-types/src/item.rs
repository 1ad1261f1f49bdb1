//! The playout output tuple and its persisted row shape.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::filler::FillerKind;
use crate::media::MediaItemId;
use crate::time::{datetime_to_ms, ms_to_datetime, ms_to_timedelta, timedelta_to_ms};

/// One entry in a playout: a single playback of a media item (or filler)
/// between `start` and `finish`.
///
/// `out_point - in_point` is the intended played span of the underlying
/// media. A zero `out_point` is the "play to `finish`" sentinel used by
/// fallback pads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayoutItem {
    pub media_item_id: MediaItemId,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
    pub in_point: TimeDelta,
    pub out_point: TimeDelta,
    pub guide_group: i32,
    pub filler_kind: FillerKind,
    pub disable_watermarks: bool,
}

impl PlayoutItem {
    /// Wall-clock span occupied by this item.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.finish - self.start
    }

    /// Span of the underlying media that is played.
    #[inline]
    pub fn played_span(&self) -> TimeDelta {
        self.out_point - self.in_point
    }

    /// Whether the player should run the media until `finish` regardless of
    /// the media's own duration (fallback-pad sentinel).
    #[inline]
    pub fn plays_to_finish(&self) -> bool {
        self.out_point == TimeDelta::zero()
    }
}

/// Persisted row shape for a playout item.
///
/// Instants and spans are flattened to integer milliseconds so the row
/// round-trips bit-exactly through serialization and the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutItemRow {
    pub id: i64,
    pub media_item_id: i64,
    pub start_utc: i64,
    pub finish_utc: i64,
    pub in_point: i64,
    pub out_point: i64,
    pub guide_group: i32,
    pub filler_kind: FillerKind,
    pub disable_watermarks: bool,
}

impl PlayoutItemRow {
    pub fn from_item(id: i64, item: &PlayoutItem) -> Self {
        Self {
            id,
            media_item_id: item.media_item_id.0,
            start_utc: datetime_to_ms(item.start),
            finish_utc: datetime_to_ms(item.finish),
            in_point: timedelta_to_ms(item.in_point),
            out_point: timedelta_to_ms(item.out_point),
            guide_group: item.guide_group,
            filler_kind: item.filler_kind,
            disable_watermarks: item.disable_watermarks,
        }
    }

    pub fn to_item(&self) -> PlayoutItem {
        PlayoutItem {
            media_item_id: MediaItemId(self.media_item_id),
            start: ms_to_datetime(self.start_utc),
            finish: ms_to_datetime(self.finish_utc),
            in_point: ms_to_timedelta(self.in_point),
            out_point: ms_to_timedelta(self.out_point),
            guide_group: self.guide_group,
            filler_kind: self.filler_kind,
            disable_watermarks: self.disable_watermarks,
        }
    }
}
