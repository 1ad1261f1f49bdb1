//! Multiple scheduler: exactly N primaries, surviving cancellation and
//! hard stops by carrying the remaining count in the build state.

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::composer::add_filler;
use crate::context::PlayoutContext;
use crate::enumerator::CollectionEnumerators;
use crate::error::BuildError;
use crate::schedule::ProgramScheduleItem;
use crate::schedulers::{
    ScheduleResult, end_time_with_filler, peek_primary, primary_playout_item,
};
use crate::start_time::start_time_after;
use crate::state::PlayoutBuilderState;

pub fn schedule_multiple<Tz: TimeZone>(
    ctx: &PlayoutContext<Tz>,
    state: &PlayoutBuilderState,
    enumerators: &mut CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    count: u32,
    hard_stop: DateTime<Utc>,
) -> Result<ScheduleResult, BuildError> {
    peek_primary(enumerators, &schedule_item.collection)?;

    let mut state = state.clone();
    let mut remaining = state.multiple_remaining.unwrap_or(count);
    if remaining == 0 {
        return Ok(ScheduleResult {
            state: state.with_multiple_remaining(None),
            items: Vec::new(),
        });
    }

    let mut items = Vec::new();
    while remaining > 0 {
        if ctx.token.is_cancelled() || state.current_time >= hard_stop {
            break;
        }
        let Some(media) = enumerators.peek(&schedule_item.collection) else {
            break;
        };
        // The first primary honors a fixed anchor; once `multiple_remaining`
        // is set the block is mid-progress and continues from the clock.
        let item_start = start_time_after(ctx, &state, schedule_item);
        let projected_end = end_time_with_filler(
            ctx,
            enumerators,
            schedule_item,
            item_start,
            media.duration(),
            media.chapters(),
        );
        if projected_end > hard_stop {
            break;
        }
        let primary = primary_playout_item(&media, item_start, state.next_guide_group);
        let composed = add_filler(ctx, enumerators, schedule_item, &primary, media.chapters())?;
        enumerators.advance(&schedule_item.collection);

        let end = composed.last().map(|i| i.finish).unwrap_or(item_start);
        items.extend(composed);
        remaining -= 1;
        state = state
            .advanced_to(end)
            .bump_guide_group()
            .with_multiple_remaining(Some(remaining));
    }

    if remaining == 0 {
        state = state.with_multiple_remaining(None);
    }
    debug!(
        channel = %ctx.channel,
        schedule_item = schedule_item.index,
        remaining,
        "multiple block paused or finished"
    );
    Ok(ScheduleResult { state, items })
}
