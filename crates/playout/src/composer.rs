//! # Filler composer
//!
//! Composes filler around a single primary playout item:
//!
//! ```text
//! [ pre-roll (non-pad) ]
//! [ primary  |  chapter, (enter, mid-roll, exit), chapter, ... ]
//! [ post-roll (non-pad) ]
//! [ pad adjustments: pre-roll-pad prefix, mid-roll-pad gaps, post-roll-pad suffix ]
//! ```
//!
//! Duration-mode slots drain their collection while items fit the budget;
//! items too long for the remaining gap are skipped, never truncated.
//! Count-mode slots append exactly N items regardless of duration. At most
//! one slot may pad to a clock boundary; the pad pass extends the composed
//! block to the next multiple of N minutes in the channel's zone, covering
//! any shortfall with a single fallback item that plays to its finish.
//!
//! All timestamps assigned while composing are placeholders; the final
//! re-stamping walk assigns contiguous start/finish pairs from the
//! primary's start.

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, TimeZone, Timelike, Utc};
use tracing::{debug, error, warn};

use playout_types::{FillerKind, FillerMode, FillerPreset, MediaChapter, MediaItem, PlayoutItem};

use crate::context::PlayoutContext;
use crate::enumerator::CollectionEnumerators;
use crate::error::BuildError;
use crate::schedule::ProgramScheduleItem;

/// Compose filler around `playout_item` and return the full ordered block.
///
/// The primary's chapters participate only when a mid-roll-family filler is
/// configured and the item has at least two chapters; otherwise the primary
/// is emitted as a single slice.
pub fn add_filler<Tz: TimeZone>(
    ctx: &PlayoutContext<Tz>,
    enumerators: &mut CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    playout_item: &PlayoutItem,
    chapters: &[MediaChapter],
) -> Result<Vec<PlayoutItem>, BuildError> {
    let pad_slots = schedule_item.roll_fillers().filter(|f| f.is_pad()).count();
    if pad_slots > 1 {
        let err =
            BuildError::bad_configuration("multiple pad-to-nearest-minute fillers configured");
        error!(
            channel = %ctx.channel,
            schedule_item = schedule_item.index,
            error = %err,
            "emitting primary alone"
        );
        return Ok(vec![playout_item.clone()]);
    }

    let effective_chapters: &[MediaChapter] =
        if schedule_item.has_mid_roll_filler() && chapters.len() > 1 {
            chapters
        } else {
            &[]
        };

    let mut items: Vec<PlayoutItem> = Vec::new();

    if let Some(pre) = &schedule_item.pre_roll_filler
        && !pre.is_pad()
    {
        let filler = slot_items(enumerators, pre, FillerKind::PreRoll, playout_item);
        items.extend(filler);
    }

    if effective_chapters.is_empty() {
        items.push(playout_item.clone());
    } else {
        interleave_chapters(
            enumerators,
            schedule_item,
            playout_item,
            effective_chapters,
            &mut items,
        );
    }

    if let Some(post) = &schedule_item.post_roll_filler
        && !post.is_pad()
    {
        let filler = slot_items(enumerators, post, FillerKind::PostRoll, playout_item);
        items.extend(filler);
    }

    if let Some(pad) = schedule_item.roll_fillers().find(|f| f.is_pad())
        && let Some(minutes) = pad.pad_to_nearest_minute
    {
        let total = total_duration(&items);
        let end = playout_item.start + total;
        let remaining = pad_remainder(ctx, end, minutes);
        if remaining > TimeDelta::zero() {
            match pad.kind {
                FillerKind::PreRoll => {
                    pad_pre_roll(enumerators, schedule_item, pad, playout_item, remaining, &mut items);
                }
                FillerKind::PostRoll => {
                    pad_post_roll(enumerators, schedule_item, pad, playout_item, remaining, &mut items);
                }
                FillerKind::MidRoll => {
                    pad_mid_roll(
                        enumerators,
                        schedule_item,
                        pad,
                        playout_item,
                        effective_chapters,
                        remaining,
                        &mut items,
                    );
                }
                _ => {}
            }
        }
    }

    restamp(playout_item.start, &mut items)?;
    Ok(items)
}

/// Span still needed to reach the next multiple of `minutes` on the
/// channel's wall clock, measured from `end`. Zero when `end` already sits
/// exactly on a boundary.
pub fn pad_remainder<Tz: TimeZone>(
    ctx: &PlayoutContext<Tz>,
    end: DateTime<Utc>,
    minutes: u32,
) -> TimeDelta {
    let local = end.with_timezone(&ctx.zone);
    let minute = local.minute();
    if minute % minutes == 0 && local.second() == 0 && local.nanosecond() == 0 {
        return TimeDelta::zero();
    }
    let target_minute = (minute / minutes + 1) * minutes;
    let floor = end
        - TimeDelta::seconds(i64::from(local.second()))
        - TimeDelta::nanoseconds(i64::from(local.nanosecond()));
    floor + TimeDelta::minutes(i64::from(target_minute - minute)) - end
}

/// Sum of the intrinsic durations currently in `items`.
fn total_duration(items: &[PlayoutItem]) -> TimeDelta {
    items
        .iter()
        .fold(TimeDelta::zero(), |acc, item| acc + item.duration())
}

/// Fill one slot per its mode. Pad-mode presets contribute nothing here;
/// they are handled by the pad pass.
fn slot_items(
    enumerators: &mut CollectionEnumerators,
    preset: &FillerPreset,
    kind: FillerKind,
    primary: &PlayoutItem,
) -> Vec<PlayoutItem> {
    match preset.mode {
        FillerMode::Duration => match preset.duration {
            Some(budget) => drain_duration(enumerators, preset, budget, kind, primary),
            None => Vec::new(),
        },
        FillerMode::Count => match preset.count {
            Some(count) => drain_count(enumerators, preset, count, kind, primary),
            None => Vec::new(),
        },
        FillerMode::Pad => Vec::new(),
    }
}

/// Drain the preset's collection while items fit `budget`. Items longer
/// than the remaining budget are skipped (the enumerator still advances);
/// the loop ends once the remaining budget drops below the collection's
/// minimum duration.
fn drain_duration(
    enumerators: &mut CollectionEnumerators,
    preset: &FillerPreset,
    budget: TimeDelta,
    kind: FillerKind,
    primary: &PlayoutItem,
) -> Vec<PlayoutItem> {
    let mut out = Vec::new();
    let Some(enumerator) = enumerators.get_mut(&preset.collection) else {
        warn!(collection = ?preset.collection, "no enumerator for filler collection");
        return out;
    };
    let mut remaining = budget;
    loop {
        let Some(minimum) = enumerator.minimum_duration() else {
            break;
        };
        if minimum <= TimeDelta::zero() || remaining < minimum {
            break;
        }
        let Some(media) = enumerator.current() else {
            break;
        };
        let duration = media.duration();
        if duration <= remaining {
            out.push(filler_item(&media, kind, preset, primary));
            remaining -= duration;
        } else {
            debug!(media_item = %media.id, "filler item too long for remaining gap, skipping");
        }
        enumerator.move_next();
    }
    out
}

/// Append exactly `count` items regardless of their durations.
fn drain_count(
    enumerators: &mut CollectionEnumerators,
    preset: &FillerPreset,
    count: u32,
    kind: FillerKind,
    primary: &PlayoutItem,
) -> Vec<PlayoutItem> {
    let mut out = Vec::new();
    let Some(enumerator) = enumerators.get_mut(&preset.collection) else {
        warn!(collection = ?preset.collection, "no enumerator for filler collection");
        return out;
    };
    for _ in 0..count {
        let Some(media) = enumerator.current() else {
            break;
        };
        out.push(filler_item(&media, kind, preset, primary));
        enumerator.move_next();
    }
    out
}

/// Emit chapter slices with enter/mid-roll/exit framing in every gap.
///
/// The enter framing is generated before the body; when the body turns out
/// empty the enter items are rolled back and no exit is emitted. A pad-mode
/// mid-roll leaves the gaps to the pad pass.
fn interleave_chapters(
    enumerators: &mut CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    primary: &PlayoutItem,
    chapters: &[MediaChapter],
    out: &mut Vec<PlayoutItem>,
) {
    let body_preset = schedule_item.mid_roll_filler.as_ref().filter(|p| !p.is_pad());
    let last = chapters.len() - 1;
    for (i, chapter) in chapters.iter().enumerate() {
        out.push(chapter_slice(primary, chapter));
        if i == last {
            break;
        }
        let Some(body_preset) = body_preset else {
            continue;
        };
        let enter = match &schedule_item.mid_roll_enter_filler {
            Some(preset) => slot_items(enumerators, preset, FillerKind::MidRollEnter, primary),
            None => Vec::new(),
        };
        let body = slot_items(enumerators, body_preset, FillerKind::MidRoll, primary);
        if body.is_empty() {
            debug!(
                chapter = i,
                "no mid-roll content for chapter gap, rolling back enter framing"
            );
            continue;
        }
        let exit = match &schedule_item.mid_roll_exit_filler {
            Some(preset) => slot_items(enumerators, preset, FillerKind::MidRollExit, primary),
            None => Vec::new(),
        };
        out.extend(enter);
        out.extend(body);
        out.extend(exit);
    }
}

/// Prefix the block with pad pre-roll; any shortfall becomes a leading
/// fallback item so the boundary is still met.
fn pad_pre_roll(
    enumerators: &mut CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    pad: &FillerPreset,
    primary: &PlayoutItem,
    remaining: TimeDelta,
    out: &mut Vec<PlayoutItem>,
) {
    let filler = drain_duration(enumerators, pad, remaining, FillerKind::PreRoll, primary);
    let shortfall = remaining - total_duration(&filler);
    let mut prefix = Vec::with_capacity(filler.len() + out.len() + 1);
    if shortfall > TimeDelta::zero() {
        match fallback_for_span(enumerators, schedule_item, primary, shortfall) {
            Some(item) => prefix.push(item),
            None => warn!(
                shortfall_ms = shortfall.num_milliseconds(),
                "pad shortfall without usable fallback filler"
            ),
        }
    }
    prefix.extend(filler);
    prefix.extend(out.drain(..));
    *out = prefix;
}

/// Suffix the block with pad post-roll; any shortfall becomes a trailing
/// fallback item ending exactly on the boundary.
fn pad_post_roll(
    enumerators: &mut CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    pad: &FillerPreset,
    primary: &PlayoutItem,
    remaining: TimeDelta,
    out: &mut Vec<PlayoutItem>,
) {
    let filler = drain_duration(enumerators, pad, remaining, FillerKind::PostRoll, primary);
    let shortfall = remaining - total_duration(&filler);
    out.extend(filler);
    if shortfall > TimeDelta::zero() {
        match fallback_for_span(enumerators, schedule_item, primary, shortfall) {
            Some(item) => out.push(item),
            None => warn!(
                shortfall_ms = shortfall.num_milliseconds(),
                "pad shortfall without usable fallback filler"
            ),
        }
    }
}

/// Distribute pad mid-roll across chapter gaps.
///
/// Each gap is capped at `remaining / gap_count`; the whole pass is capped
/// at `remaining`. Body items come from a queue drained up front; when the
/// queue runs dry and no enter/exit framing is configured, a gap is topped
/// up with a fallback chunk. Gaps that end up with framing but no body are
/// rolled back. Any shortfall left after all gaps is covered by a trailing
/// fallback item, after the lifted post-roll is restored.
fn pad_mid_roll(
    enumerators: &mut CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    pad: &FillerPreset,
    primary: &PlayoutItem,
    chapters: &[MediaChapter],
    remaining: TimeDelta,
    out: &mut Vec<PlayoutItem>,
) {
    if chapters.len() <= 1 {
        // No gaps to fill; the whole remainder goes to the post-roll
        // fallback path.
        match fallback_for_span(enumerators, schedule_item, primary, remaining) {
            Some(item) => out.push(item),
            None => warn!(
                shortfall_ms = remaining.num_milliseconds(),
                "mid-roll pad with no chapters and no usable fallback filler"
            ),
        }
        return;
    }

    // Lift the already-added post-roll tail aside; it is restored after the
    // gaps are filled.
    let mut post_roll: Vec<PlayoutItem> = Vec::new();
    while matches!(out.last(), Some(item) if item.filler_kind == FillerKind::PostRoll) {
        if let Some(item) = out.pop() {
            post_roll.push(item);
        }
    }
    post_roll.reverse();

    let gap_count = chapters.len() as i32 - 1;
    let average = remaining / gap_count.max(1);

    let mut queue: VecDeque<PlayoutItem> =
        drain_duration(enumerators, pad, remaining, FillerKind::MidRoll, primary).into();

    let enter_preset = schedule_item.mid_roll_enter_filler.as_ref();
    let exit_preset = schedule_item.mid_roll_exit_filler.as_ref();
    let framed = enter_preset.is_some() || exit_preset.is_some();

    let mut filled = TimeDelta::zero();
    let mut seen_chapters = 0usize;
    let mut rebuilt: Vec<PlayoutItem> = Vec::with_capacity(out.len() + queue.len());

    for item in out.drain(..) {
        let is_chapter_slice = item.filler_kind == FillerKind::None;
        rebuilt.push(item);
        if !is_chapter_slice {
            continue;
        }
        seen_chapters += 1;
        if seen_chapters >= chapters.len() {
            continue;
        }

        let enter = match enter_preset {
            Some(preset) => slot_items(enumerators, preset, FillerKind::MidRollEnter, primary),
            None => Vec::new(),
        };
        let exit = match exit_preset {
            Some(preset) => slot_items(enumerators, preset, FillerKind::MidRollExit, primary),
            None => Vec::new(),
        };
        let framing = total_duration(&enter) + total_duration(&exit);
        if framing > TimeDelta::zero() && filled + framing >= remaining {
            debug!(gap = seen_chapters - 1, "no room for framed mid-roll gap");
            continue;
        }
        let exit_duration = total_duration(&exit);

        let mut gap: Vec<PlayoutItem> = Vec::new();
        let mut current = total_duration(&enter);
        gap.extend(enter);
        let mut placed_body = false;

        loop {
            let Some(front) = queue.front() else {
                break;
            };
            let duration = front.duration();
            if current + duration > average {
                break;
            }
            if filled + current + duration + exit_duration > remaining {
                break;
            }
            if let Some(body_item) = queue.pop_front() {
                gap.push(body_item);
                current += duration;
                placed_body = true;
            }
        }

        if queue.is_empty() && !framed {
            let chunk = (average - current).min(remaining - filled - current);
            if chunk > TimeDelta::zero()
                && let Some(item) = fallback_for_span(enumerators, schedule_item, primary, chunk)
            {
                gap.push(item);
                current += chunk;
                placed_body = true;
            }
        }

        if !placed_body {
            // Nothing but framing landed in this gap; roll it back.
            debug!(gap = seen_chapters - 1, "empty mid-roll gap, rolling back framing");
            continue;
        }

        current += exit_duration;
        gap.extend(exit);
        filled += current;
        rebuilt.append(&mut gap);
    }

    if !queue.is_empty() {
        debug!(dropped = queue.len(), "mid-roll pad queue items did not fit any gap");
    }

    rebuilt.extend(post_roll);

    let leftover = remaining - filled;
    if leftover > TimeDelta::zero() {
        match fallback_for_span(enumerators, schedule_item, primary, leftover) {
            Some(item) => rebuilt.push(item),
            None => warn!(
                shortfall_ms = leftover.num_milliseconds(),
                "pad shortfall without usable fallback filler"
            ),
        }
    }

    *out = rebuilt;
}

/// A single fallback item spanning exactly `span`, or `None` when no
/// fallback filler is configured or its collection is empty.
///
/// The fallback enumerator is not advanced: fallback is ambient content
/// stretched over whatever gap needs covering, and `out_point` is zero so
/// the player runs it to `finish`.
fn fallback_for_span(
    enumerators: &CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    primary: &PlayoutItem,
    span: TimeDelta,
) -> Option<PlayoutItem> {
    let preset = schedule_item.fallback_filler.as_ref()?;
    let media = enumerators.peek(&preset.collection)?;
    Some(PlayoutItem {
        media_item_id: media.id,
        start: primary.start,
        finish: primary.start + span,
        in_point: TimeDelta::zero(),
        out_point: TimeDelta::zero(),
        guide_group: primary.guide_group,
        filler_kind: FillerKind::Fallback,
        disable_watermarks: !preset.allow_watermarks,
    })
}

fn filler_item(
    media: &MediaItem,
    kind: FillerKind,
    preset: &FillerPreset,
    primary: &PlayoutItem,
) -> PlayoutItem {
    PlayoutItem {
        media_item_id: media.id,
        start: primary.start,
        finish: primary.start + media.duration(),
        in_point: TimeDelta::zero(),
        out_point: media.duration(),
        guide_group: primary.guide_group,
        filler_kind: kind,
        disable_watermarks: !preset.allow_watermarks,
    }
}

fn chapter_slice(primary: &PlayoutItem, chapter: &MediaChapter) -> PlayoutItem {
    PlayoutItem {
        media_item_id: primary.media_item_id,
        start: primary.start,
        finish: primary.start + chapter.duration(),
        in_point: chapter.start_time,
        out_point: chapter.end_time,
        guide_group: primary.guide_group,
        filler_kind: FillerKind::None,
        disable_watermarks: primary.disable_watermarks,
    }
}

/// Assign contiguous timestamps: each item's finish is the next item's
/// start, and every span equals the item's intrinsic duration.
fn restamp(start: DateTime<Utc>, items: &mut [PlayoutItem]) -> Result<(), BuildError> {
    let mut cursor = start;
    for item in items.iter_mut() {
        let duration = item.duration();
        if duration < TimeDelta::zero() {
            return Err(BuildError::fatal(format!(
                "negative duration for media item {}",
                item.media_item_id
            )));
        }
        item.start = cursor;
        item.finish = cursor + duration;
        cursor = item.finish;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerator::OrderedCollectionEnumerator;
    use crate::schedule::{PlaybackMode, ProgramScheduleItem};
    use crate::test_utils::{context_utc, media, media_with_chapters};
    use chrono::TimeZone;
    use playout_types::{CollectionKey, MediaItemId};

    fn primary_key() -> CollectionKey {
        CollectionKey::collection(1)
    }

    fn filler_key() -> CollectionKey {
        CollectionKey::collection(2)
    }

    fn enter_key() -> CollectionKey {
        CollectionKey::collection(3)
    }

    fn exit_key() -> CollectionKey {
        CollectionKey::collection(4)
    }

    fn fallback_key() -> CollectionKey {
        CollectionKey::collection(5)
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap()
    }

    fn primary_item(duration: TimeDelta) -> PlayoutItem {
        PlayoutItem {
            media_item_id: MediaItemId(100),
            start: start(),
            finish: start() + duration,
            in_point: TimeDelta::zero(),
            out_point: duration,
            guide_group: 1,
            filler_kind: FillerKind::None,
            disable_watermarks: false,
        }
    }

    fn enumerators_with(
        entries: Vec<(CollectionKey, Vec<playout_types::MediaItem>)>,
    ) -> CollectionEnumerators {
        let mut enumerators = CollectionEnumerators::new();
        for (key, items) in entries {
            enumerators.insert(key, Box::new(OrderedCollectionEnumerator::new(items)));
        }
        enumerators
    }

    #[test]
    fn primary_alone_when_no_filler_configured() {
        let ctx = context_utc();
        let mut enumerators = enumerators_with(vec![]);
        let item = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Once).build();
        let primary = primary_item(TimeDelta::minutes(30));

        let items = add_filler(&ctx, &mut enumerators, &item, &primary, &[]).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0], primary);
    }

    #[test]
    fn two_pad_slots_recover_by_emitting_primary_alone() {
        let ctx = context_utc();
        let mut enumerators = enumerators_with(vec![]);
        let item = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Once)
            .pre_roll(FillerPreset::pad(FillerKind::PreRoll, filler_key(), 15).unwrap())
            .post_roll(FillerPreset::pad(FillerKind::PostRoll, filler_key(), 30).unwrap())
            .build();
        let primary = primary_item(TimeDelta::minutes(40));

        let items = add_filler(&ctx, &mut enumerators, &item, &primary, &[]).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].filler_kind, FillerKind::None);
    }

    #[test]
    fn post_roll_pad_fills_to_boundary_with_fallback_shortfall() {
        // Primary 40 minutes from 20:00, pad post-roll to the nearest 30:
        // 8-minute filler items fill 16 minutes, the final 4 minutes come
        // from a fallback item ending exactly at 21:00:00.
        let ctx = context_utc();
        let mut enumerators = enumerators_with(vec![
            (filler_key(), vec![media(10, TimeDelta::minutes(8))]),
            (fallback_key(), vec![media(20, TimeDelta::minutes(1))]),
        ]);
        let item = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Once)
            .post_roll(FillerPreset::pad(FillerKind::PostRoll, filler_key(), 30).unwrap())
            .fallback(FillerPreset::fallback(fallback_key()))
            .build();
        let primary = primary_item(TimeDelta::minutes(40));

        let items = add_filler(&ctx, &mut enumerators, &item, &primary, &[]).unwrap();

        assert_eq!(items[0].filler_kind, FillerKind::None);
        let last = items.last().unwrap();
        assert_eq!(last.filler_kind, FillerKind::Fallback);
        assert!(last.plays_to_finish());
        assert_eq!(
            last.finish,
            Utc.with_ymd_and_hms(2024, 3, 10, 21, 0, 0).unwrap()
        );
        // Contiguous timestamps after re-stamping.
        for pair in items.windows(2) {
            assert_eq!(pair[0].finish, pair[1].start);
        }
    }

    #[test]
    fn chapter_interleave_emits_enter_mid_exit_per_gap() {
        let ctx = context_utc();
        let mut enumerators = enumerators_with(vec![
            (filler_key(), vec![media(10, TimeDelta::seconds(60))]),
            (enter_key(), vec![media(30, TimeDelta::seconds(5))]),
            (exit_key(), vec![media(40, TimeDelta::seconds(5))]),
        ]);
        let item = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Once)
            .mid_roll_enter(FillerPreset::count(FillerKind::MidRollEnter, enter_key(), 1).unwrap())
            .mid_roll(FillerPreset::count(FillerKind::MidRoll, filler_key(), 1).unwrap())
            .mid_roll_exit(FillerPreset::count(FillerKind::MidRollExit, exit_key(), 1).unwrap())
            .build();
        let media_item =
            media_with_chapters(100, TimeDelta::minutes(40), &[(0, 10), (10, 25), (25, 40)]);
        let primary = primary_item(TimeDelta::minutes(40));

        let items = add_filler(
            &ctx,
            &mut enumerators,
            &item,
            &primary,
            media_item.chapters(),
        )
        .unwrap();

        let kinds: Vec<FillerKind> = items.iter().map(|i| i.filler_kind).collect();
        assert_eq!(
            kinds,
            vec![
                FillerKind::None,
                FillerKind::MidRollEnter,
                FillerKind::MidRoll,
                FillerKind::MidRollExit,
                FillerKind::None,
                FillerKind::MidRollEnter,
                FillerKind::MidRoll,
                FillerKind::MidRollExit,
                FillerKind::None,
            ]
        );
        assert_eq!(items.len(), 9);
        // Chapter slices carry the chapter in/out points.
        assert_eq!(items[0].in_point, TimeDelta::zero());
        assert_eq!(items[0].out_point, TimeDelta::minutes(10));
        assert_eq!(items[4].in_point, TimeDelta::minutes(10));
        assert_eq!(items[8].out_point, TimeDelta::minutes(40));
    }

    #[test]
    fn empty_mid_roll_rolls_back_enter_and_exit() {
        let ctx = context_utc();
        let mut enumerators = enumerators_with(vec![
            (filler_key(), vec![media(10, TimeDelta::seconds(60))]),
            (enter_key(), vec![media(30, TimeDelta::seconds(5))]),
            (exit_key(), vec![media(40, TimeDelta::seconds(5))]),
        ]);
        let item = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Once)
            .mid_roll_enter(FillerPreset::count(FillerKind::MidRollEnter, enter_key(), 1).unwrap())
            .mid_roll(
                FillerPreset::duration(FillerKind::MidRoll, filler_key(), TimeDelta::zero())
                    .unwrap(),
            )
            .mid_roll_exit(FillerPreset::count(FillerKind::MidRollExit, exit_key(), 1).unwrap())
            .build();
        let media_item =
            media_with_chapters(100, TimeDelta::minutes(40), &[(0, 10), (10, 25), (25, 40)]);
        let primary = primary_item(TimeDelta::minutes(40));

        let items = add_filler(
            &ctx,
            &mut enumerators,
            &item,
            &primary,
            media_item.chapters(),
        )
        .unwrap();

        let kinds: Vec<FillerKind> = items.iter().map(|i| i.filler_kind).collect();
        assert_eq!(kinds, vec![FillerKind::None, FillerKind::None, FillerKind::None]);
    }

    #[test]
    fn duration_filler_skips_items_that_do_not_fit() {
        let ctx = context_utc();
        // 10-minute budget: the 12-minute item is skipped, two 5-minute
        // items fit.
        let mut enumerators = enumerators_with(vec![(
            filler_key(),
            vec![
                media(10, TimeDelta::minutes(12)),
                media(11, TimeDelta::minutes(5)),
                media(12, TimeDelta::minutes(5)),
            ],
        )]);
        let item = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Once)
            .pre_roll(
                FillerPreset::duration(FillerKind::PreRoll, filler_key(), TimeDelta::minutes(10))
                    .unwrap(),
            )
            .build();
        let primary = primary_item(TimeDelta::minutes(30));

        let items = add_filler(&ctx, &mut enumerators, &item, &primary, &[]).unwrap();
        let pre: Vec<_> = items
            .iter()
            .filter(|i| i.filler_kind == FillerKind::PreRoll)
            .collect();
        assert_eq!(pre.len(), 2);
        assert!(pre.iter().all(|i| i.duration() == TimeDelta::minutes(5)));
        assert!(pre.iter().all(|i| i.media_item_id != MediaItemId(10)));
    }

    #[test]
    fn count_filler_appends_exactly_count_items() {
        let ctx = context_utc();
        let mut enumerators = enumerators_with(vec![(
            filler_key(),
            vec![media(10, TimeDelta::minutes(2)), media(11, TimeDelta::minutes(7))],
        )]);
        let item = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Once)
            .post_roll(FillerPreset::count(FillerKind::PostRoll, filler_key(), 3).unwrap())
            .build();
        let primary = primary_item(TimeDelta::minutes(30));

        let items = add_filler(&ctx, &mut enumerators, &item, &primary, &[]).unwrap();
        let post: Vec<_> = items
            .iter()
            .filter(|i| i.filler_kind == FillerKind::PostRoll)
            .collect();
        assert_eq!(post.len(), 3);
    }

    #[test]
    fn pre_roll_pad_prepends_fallback_then_filler() {
        let ctx = context_utc();
        let mut enumerators = enumerators_with(vec![
            (filler_key(), vec![media(10, TimeDelta::minutes(8))]),
            (fallback_key(), vec![media(20, TimeDelta::minutes(1))]),
        ]);
        let item = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Once)
            .pre_roll(FillerPreset::pad(FillerKind::PreRoll, filler_key(), 30).unwrap())
            .fallback(FillerPreset::fallback(fallback_key()))
            .build();
        let primary = primary_item(TimeDelta::minutes(40));

        let items = add_filler(&ctx, &mut enumerators, &item, &primary, &[]).unwrap();
        assert_eq!(items[0].filler_kind, FillerKind::Fallback);
        assert_eq!(items[1].filler_kind, FillerKind::PreRoll);
        assert_eq!(items[0].start, start());
        // The whole block spans exactly to the next half-hour boundary.
        let total = items
            .iter()
            .fold(TimeDelta::zero(), |acc, i| acc + i.duration());
        assert_eq!(total, TimeDelta::minutes(60));
    }

    #[test]
    fn mid_roll_pad_distributes_across_gaps_and_tops_up() {
        let ctx = context_utc();
        // Primary 50 minutes with three chapters (two gaps), pad to 30:
        // 10 minutes to fill, 4-minute body items, no framing. Each gap is
        // capped at 5 minutes, so each takes one body item; the second gap
        // tops up with a 1-minute fallback chunk and the final minute is
        // covered by the trailing fallback.
        let mut enumerators = enumerators_with(vec![
            (filler_key(), vec![media(10, TimeDelta::minutes(4))]),
            (fallback_key(), vec![media(20, TimeDelta::minutes(1))]),
        ]);
        let item = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Once)
            .mid_roll(FillerPreset::pad(FillerKind::MidRoll, filler_key(), 30).unwrap())
            .fallback(FillerPreset::fallback(fallback_key()))
            .build();
        let media_item =
            media_with_chapters(100, TimeDelta::minutes(50), &[(0, 15), (15, 35), (35, 50)]);
        let primary = primary_item(TimeDelta::minutes(50));

        let items = add_filler(
            &ctx,
            &mut enumerators,
            &item,
            &primary,
            media_item.chapters(),
        )
        .unwrap();

        let total = items
            .iter()
            .fold(TimeDelta::zero(), |acc, i| acc + i.duration());
        assert_eq!(total, TimeDelta::minutes(60));
        let last = items.last().unwrap();
        assert_eq!(
            last.finish,
            Utc.with_ymd_and_hms(2024, 3, 10, 21, 0, 0).unwrap()
        );
        // Mid-roll bodies landed between chapter slices, not at the end.
        assert!(items.iter().any(|i| i.filler_kind == FillerKind::MidRoll));
    }

    #[test]
    fn restamp_produces_contiguous_block_from_primary_start() {
        let ctx = context_utc();
        let mut enumerators = enumerators_with(vec![(
            filler_key(),
            vec![media(10, TimeDelta::minutes(2))],
        )]);
        let item = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Once)
            .pre_roll(
                FillerPreset::duration(FillerKind::PreRoll, filler_key(), TimeDelta::minutes(4))
                    .unwrap(),
            )
            .build();
        let primary = primary_item(TimeDelta::minutes(30));

        let items = add_filler(&ctx, &mut enumerators, &item, &primary, &[]).unwrap();
        assert_eq!(items[0].start, start());
        for pair in items.windows(2) {
            assert_eq!(pair[0].finish, pair[1].start);
        }
        let last = items.last().unwrap();
        assert_eq!(
            last.finish - items[0].start,
            TimeDelta::minutes(4 + 30)
        );
    }
}
