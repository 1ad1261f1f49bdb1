//! Duration scheduler: emit primaries while they fit a playout window,
//! then close the window per the item's tail mode.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tracing::debug;

use crate::composer::add_filler;
use crate::context::PlayoutContext;
use crate::enumerator::CollectionEnumerators;
use crate::error::BuildError;
use crate::schedule::{ProgramScheduleItem, TailMode};
use crate::schedulers::{
    ScheduleResult, add_tail_filler, end_time_with_filler, fallback_to, peek_primary,
    primary_playout_item,
};
use crate::start_time::start_time_after;
use crate::state::PlayoutBuilderState;

pub fn schedule_duration<Tz: TimeZone>(
    ctx: &PlayoutContext<Tz>,
    state: &PlayoutBuilderState,
    enumerators: &mut CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    playout_duration: TimeDelta,
    tail_mode: TailMode,
    hard_stop: DateTime<Utc>,
) -> Result<ScheduleResult, BuildError> {
    peek_primary(enumerators, &schedule_item.collection)?;

    let item_start = start_time_after(ctx, state, schedule_item);
    let finish = state.duration_finish.unwrap_or(item_start + playout_duration);
    let mut state = state
        .advanced_to(item_start.max(state.current_time))
        .with_duration_finish(Some(finish));
    let mut items = Vec::new();

    if !state.in_duration_filler {
        loop {
            if ctx.token.is_cancelled() || state.current_time >= hard_stop {
                break;
            }
            let Some(media) = enumerators.peek(&schedule_item.collection) else {
                break;
            };
            let projected_end = end_time_with_filler(
                ctx,
                enumerators,
                schedule_item,
                state.current_time,
                media.duration(),
                media.chapters(),
            );
            if projected_end > finish || projected_end > hard_stop {
                break;
            }

            let primary =
                primary_playout_item(&media, state.current_time, state.next_guide_group);
            let composed =
                add_filler(ctx, enumerators, schedule_item, &primary, media.chapters())?;
            enumerators.advance(&schedule_item.collection);

            let end = composed.last().map(|i| i.finish).unwrap_or(state.current_time);
            items.extend(composed);
            state = state.advanced_to(end).bump_guide_group();
        }
    }

    if ctx.token.is_cancelled() {
        // Leave the window open; a resumed build continues it.
        return Ok(ScheduleResult { state, items });
    }

    let limit = finish.min(hard_stop);
    if let TailMode::Filler = tail_mode {
        state = state.with_in_duration_filler(true);
        let guide_group = state.next_guide_group - 1;
        if let Some(tail) = &schedule_item.tail_filler {
            let tail_items =
                add_tail_filler(enumerators, tail, state.current_time, limit, guide_group);
            if let Some(last) = tail_items.last() {
                state = state.advanced_to(last.finish);
            }
            items.extend(tail_items);
        }
        if state.current_time < limit
            && let Some(fallback) = &schedule_item.fallback_filler
            && let Some(item) =
                fallback_to(enumerators, fallback, state.current_time, limit, guide_group)
        {
            state = state.advanced_to(item.finish);
            items.push(item);
        }
    }

    // The window owns its whole span: offline tails leave the gap empty but
    // still advance the clock.
    if state.current_time < limit {
        state = state.advanced_to(limit);
    }
    let reached_finish = finish <= hard_stop;
    if reached_finish {
        state = state
            .with_duration_finish(None)
            .with_in_duration_filler(false);
    }

    debug!(
        channel = %ctx.channel,
        schedule_item = schedule_item.index,
        emitted = items.len(),
        reached_finish,
        "duration block finished"
    );
    Ok(ScheduleResult { state, items })
}
