//! Mode schedulers.
//!
//! One scheduler per playback variant. Each computes the item's start,
//! drains its collection until the variant's termination condition, hands
//! every primary to the filler composer, and returns the replaced state
//! together with the emitted items.

mod duration;
mod flood;
mod multiple;
mod once;

pub use duration::schedule_duration;
pub use flood::schedule_flood;
pub use multiple::schedule_multiple;
pub use once::schedule_once;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tracing::warn;

use playout_types::{
    CollectionKey, FillerKind, FillerMode, FillerPreset, MediaChapter, MediaItem, PlayoutItem,
};

use crate::composer::pad_remainder;
use crate::context::PlayoutContext;
use crate::enumerator::CollectionEnumerators;
use crate::error::BuildError;
use crate::schedule::ProgramScheduleItem;
use crate::state::PlayoutBuilderState;

/// What one mode scheduler hands back to the build loop.
#[derive(Debug)]
pub struct ScheduleResult {
    pub state: PlayoutBuilderState,
    pub items: Vec<PlayoutItem>,
}

/// Current item of the primary collection, or `CollectionEmpty` so the
/// build loop can skip the schedule item.
pub(crate) fn peek_primary(
    enumerators: &CollectionEnumerators,
    key: &CollectionKey,
) -> Result<MediaItem, BuildError> {
    enumerators
        .peek(key)
        .ok_or_else(|| BuildError::collection_empty(key.clone()))
}

/// Nominal playout item for one primary, before filler composition.
pub(crate) fn primary_playout_item(
    media: &MediaItem,
    start: DateTime<Utc>,
    guide_group: i32,
) -> PlayoutItem {
    PlayoutItem {
        media_item_id: media.id,
        start,
        finish: start + media.duration(),
        in_point: TimeDelta::zero(),
        out_point: media.duration(),
        guide_group,
        filler_kind: FillerKind::None,
        disable_watermarks: false,
    }
}

/// Estimate where a primary's composed block would end, without advancing
/// any enumerator: duration slots contribute their configured budget,
/// count slots their count times the current item's duration (per chapter
/// gap for the mid-roll family), and a pad slot rounds the result up to its
/// boundary.
pub(crate) fn end_time_with_filler<Tz: TimeZone>(
    ctx: &PlayoutContext<Tz>,
    enumerators: &CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    item_start: DateTime<Utc>,
    item_duration: TimeDelta,
    chapters: &[MediaChapter],
) -> DateTime<Utc> {
    let gaps = if schedule_item.has_mid_roll_filler() && chapters.len() > 1 {
        chapters.len() as i32 - 1
    } else {
        0
    };
    let mut total = item_duration;
    for preset in schedule_item.roll_fillers() {
        if preset.is_pad() {
            continue;
        }
        let multiplier = if preset.kind.is_mid_roll_family() {
            gaps
        } else {
            1
        };
        if multiplier == 0 {
            continue;
        }
        match preset.mode {
            FillerMode::Duration => {
                if let Some(budget) = preset.duration {
                    total = total + budget * multiplier;
                }
            }
            FillerMode::Count => {
                if let Some(count) = preset.count
                    && let Some(media) = enumerators.peek(&preset.collection)
                {
                    total = total + media.duration() * (count as i32) * multiplier;
                }
            }
            FillerMode::Pad => {}
        }
    }
    let end = item_start + total;
    match schedule_item
        .roll_fillers()
        .find(|f| f.is_pad())
        .and_then(|f| f.pad_to_nearest_minute)
    {
        Some(minutes) => end + pad_remainder(ctx, end, minutes),
        None => end,
    }
}

/// Append tail filler from `from` towards `limit`, stopping at the first
/// item that would overshoot.
pub(crate) fn add_tail_filler(
    enumerators: &mut CollectionEnumerators,
    preset: &FillerPreset,
    from: DateTime<Utc>,
    limit: DateTime<Utc>,
    guide_group: i32,
) -> Vec<PlayoutItem> {
    let mut out = Vec::new();
    let Some(enumerator) = enumerators.get_mut(&preset.collection) else {
        warn!(collection = ?preset.collection, "no enumerator for tail filler collection");
        return out;
    };
    let mut current = from;
    while let Some(media) = enumerator.current() {
        let duration = media.duration();
        if duration <= TimeDelta::zero() || current + duration > limit {
            break;
        }
        out.push(PlayoutItem {
            media_item_id: media.id,
            start: current,
            finish: current + duration,
            in_point: TimeDelta::zero(),
            out_point: duration,
            guide_group,
            filler_kind: FillerKind::Tail,
            disable_watermarks: !preset.allow_watermarks,
        });
        current += duration;
        enumerator.move_next();
    }
    out
}

/// One fallback item covering exactly `[from, limit)`, playing to finish.
pub(crate) fn fallback_to(
    enumerators: &CollectionEnumerators,
    preset: &FillerPreset,
    from: DateTime<Utc>,
    limit: DateTime<Utc>,
    guide_group: i32,
) -> Option<PlayoutItem> {
    if limit <= from {
        return None;
    }
    let media = enumerators.peek(&preset.collection)?;
    Some(PlayoutItem {
        media_item_id: media.id,
        start: from,
        finish: limit,
        in_point: TimeDelta::zero(),
        out_point: TimeDelta::zero(),
        guide_group,
        filler_kind: FillerKind::Fallback,
        disable_watermarks: !preset.allow_watermarks,
    })
}
