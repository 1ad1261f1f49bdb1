//! Flood scheduler: keep emitting primaries until the next fixed start is
//! due, then fill the remainder with tail and fallback filler.

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::composer::add_filler;
use crate::context::PlayoutContext;
use crate::enumerator::CollectionEnumerators;
use crate::error::BuildError;
use crate::schedule::{ProgramScheduleItem, StartType};
use crate::schedulers::{
    ScheduleResult, add_tail_filler, end_time_with_filler, fallback_to, peek_primary,
    primary_playout_item,
};
use crate::start_time::start_time_after;
use crate::state::PlayoutBuilderState;

pub fn schedule_flood<Tz: TimeZone>(
    ctx: &PlayoutContext<Tz>,
    state: &PlayoutBuilderState,
    enumerators: &mut CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    next_item: &ProgramScheduleItem,
    hard_stop: DateTime<Utc>,
) -> Result<ScheduleResult, BuildError> {
    peek_primary(enumerators, &schedule_item.collection)?;

    let mut state = state.clone();
    let mut items = Vec::new();

    // A flood drains until the next item's fixed start; without one the
    // window degenerates to the hard stop.
    let anchored = match (next_item.start_type, next_item.start_time) {
        (StartType::Fixed, Some(_)) => Some(start_time_after(ctx, &state, next_item)),
        _ => None,
    };
    let capped_by_hard_stop = anchored.is_none_or(|a| a > hard_stop);
    let next_start = anchored.unwrap_or(hard_stop).min(hard_stop);

    // `completed` means the flood window itself is over; interruption by
    // the hard stop or cancellation keeps the flood in progress so a
    // resumed build continues from the current clock.
    let mut completed = false;
    loop {
        if ctx.token.is_cancelled() {
            break;
        }
        if state.current_time >= next_start {
            completed = !capped_by_hard_stop;
            break;
        }
        let Some(media) = enumerators.peek(&schedule_item.collection) else {
            warn!(collection = ?schedule_item.collection, "flood collection went empty");
            completed = true;
            break;
        };
        let item_start = start_time_after(ctx, &state, schedule_item);
        let projected_end = end_time_with_filler(
            ctx,
            enumerators,
            schedule_item,
            item_start,
            media.duration(),
            media.chapters(),
        );
        if projected_end > next_start {
            completed = !capped_by_hard_stop;
            break;
        }

        let primary = primary_playout_item(&media, item_start, state.next_guide_group);
        let composed = add_filler(ctx, enumerators, schedule_item, &primary, media.chapters())?;
        enumerators.advance(&schedule_item.collection);

        let end = composed.last().map(|i| i.finish).unwrap_or(item_start);
        items.extend(composed);
        state = state.advanced_to(end).bump_guide_group().with_in_flood(true);
    }

    if completed && !items.is_empty() {
        let guide_group = state.next_guide_group - 1;
        if let Some(tail) = &schedule_item.tail_filler {
            let tail_items =
                add_tail_filler(enumerators, tail, state.current_time, next_start, guide_group);
            if let Some(last) = tail_items.last() {
                state = state.advanced_to(last.finish);
            }
            items.extend(tail_items);
        }
        if state.current_time < next_start
            && let Some(fallback) = &schedule_item.fallback_filler
            && let Some(item) =
                fallback_to(enumerators, fallback, state.current_time, next_start, guide_group)
        {
            state = state.advanced_to(item.finish);
            items.push(item);
        }
    }

    debug!(
        channel = %ctx.channel,
        schedule_item = schedule_item.index,
        emitted = items.len(),
        completed,
        "flood block finished"
    );
    // Only a flood that actually engaged stays in progress; `state.in_flood`
    // is set on the first emitted primary (or carried in from a resumed
    // build).
    Ok(ScheduleResult {
        state: state.with_in_flood(!completed && state.in_flood),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerator::OrderedCollectionEnumerator;
    use crate::schedule::PlaybackMode;
    use crate::test_utils::{context_utc, media};
    use chrono::{NaiveTime, TimeDelta};
    use playout_types::{CollectionKey, FillerKind, FillerPreset};

    fn primary_key() -> CollectionKey {
        CollectionKey::collection(1)
    }

    fn tail_key() -> CollectionKey {
        CollectionKey::collection(2)
    }

    #[test]
    fn flood_fills_until_next_fixed_start_then_tail() {
        // Flood of 25-minute primaries from 20:00; the next item is fixed
        // at 22:00. Four primaries fit (100 minutes), the fifth would cross
        // 22:00. Tail filler then adds 2-minute items until 22:00.
        let ctx = context_utc();
        let mut enumerators = CollectionEnumerators::new();
        enumerators.insert(
            primary_key(),
            Box::new(OrderedCollectionEnumerator::new(vec![media(
                1,
                TimeDelta::minutes(25),
            )])),
        );
        enumerators.insert(
            tail_key(),
            Box::new(OrderedCollectionEnumerator::new(vec![media(
                2,
                TimeDelta::minutes(2),
            )])),
        );
        let flood = ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Flood)
            .fixed_start(NaiveTime::from_hms_opt(20, 0, 0).expect("valid time"))
            .tail(FillerPreset::tail(tail_key()))
            .build();
        let next = ProgramScheduleItem::builder(1, primary_key(), PlaybackMode::Once)
            .fixed_start(NaiveTime::from_hms_opt(22, 0, 0).expect("valid time"))
            .build();
        let state =
            PlayoutBuilderState::new(Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap());
        let hard_stop = Utc.with_ymd_and_hms(2024, 3, 11, 20, 0, 0).unwrap();

        let result =
            schedule_flood(&ctx, &state, &mut enumerators, &flood, &next, hard_stop).unwrap();

        let primaries: Vec<_> = result
            .items
            .iter()
            .filter(|i| i.filler_kind == FillerKind::None)
            .collect();
        assert_eq!(primaries.len(), 4);
        assert_eq!(
            primaries[0].start,
            Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap()
        );
        for pair in result.items.windows(2) {
            assert_eq!(pair[0].finish, pair[1].start);
        }

        let tails: Vec<_> = result
            .items
            .iter()
            .filter(|i| i.filler_kind == FillerKind::Tail)
            .collect();
        // 20 minutes of gap, ten 2-minute tail items.
        assert_eq!(tails.len(), 10);
        assert_eq!(
            result.items.last().unwrap().finish,
            Utc.with_ymd_and_hms(2024, 3, 10, 22, 0, 0).unwrap()
        );
        assert!(!result.state.in_flood);
        // Guide groups are strictly monotonic across primaries.
        let groups: Vec<i32> = primaries.iter().map(|i| i.guide_group).collect();
        assert_eq!(groups, vec![1, 2, 3, 4]);
    }

    #[test]
    fn flood_interrupted_by_hard_stop_stays_in_progress() {
        let ctx = context_utc();
        let mut enumerators = CollectionEnumerators::new();
        enumerators.insert(
            primary_key(),
            Box::new(OrderedCollectionEnumerator::new(vec![media(
                1,
                TimeDelta::minutes(25),
            )])),
        );
        let flood =
            ProgramScheduleItem::builder(0, primary_key(), PlaybackMode::Flood).build();
        // Dynamic next item: the flood window is the hard stop itself.
        let next = ProgramScheduleItem::builder(1, primary_key(), PlaybackMode::Once).build();
        let state =
            PlayoutBuilderState::new(Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap());
        let hard_stop = Utc.with_ymd_and_hms(2024, 3, 10, 21, 0, 0).unwrap();

        let result =
            schedule_flood(&ctx, &state, &mut enumerators, &flood, &next, hard_stop).unwrap();

        // Two 25-minute primaries fit before 21:00.
        assert_eq!(result.items.len(), 2);
        assert!(result.state.in_flood);
        assert!(result.state.is_mid_progress());
    }
}
