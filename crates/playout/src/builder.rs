//! Top-level build loop.
//!
//! Iterates schedule items in order, routes each to its mode scheduler,
//! folds the returned items into the output, and threads the replaced state
//! forward until the hard stop. Recoverable failures skip the offending
//! schedule item; cancellation preserves all partial output; fatal
//! invariant violations abort. The search-index commit guard is held for
//! the whole build and releases on every path.

use chrono::{DateTime, TimeZone, Utc};
use tracing::{error, info, warn};

use playout_types::PlayoutItem;

use crate::context::PlayoutContext;
use crate::enumerator::CollectionEnumerators;
use crate::error::BuildError;
use crate::index::{CommitGuard, SearchIndex};
use crate::schedule::{PlaybackMode, ProgramSchedule};
use crate::schedulers::{
    ScheduleResult, schedule_duration, schedule_flood, schedule_multiple, schedule_once,
};
use crate::state::PlayoutBuilderState;

/// Result of one playout build: the replaced state to persist, the emitted
/// items, and whether the build was cut short by cancellation.
#[derive(Debug)]
pub struct PlayoutBuild {
    pub state: PlayoutBuilderState,
    pub items: Vec<PlayoutItem>,
    pub canceled: bool,
}

/// Build the playout for one channel between `initial_state.current_time`
/// and `hard_stop`.
pub fn build_playout<Tz: TimeZone>(
    ctx: &PlayoutContext<Tz>,
    schedule: &ProgramSchedule,
    enumerators: &mut CollectionEnumerators,
    index: &mut dyn SearchIndex,
    initial_state: PlayoutBuilderState,
    hard_stop: DateTime<Utc>,
) -> Result<PlayoutBuild, BuildError> {
    let guard = CommitGuard::new(index);
    let mut state = initial_state;
    let mut items: Vec<PlayoutItem> = Vec::new();
    let mut canceled = false;

    if schedule.is_empty() {
        guard.finish();
        return Ok(PlayoutBuild {
            state,
            items,
            canceled,
        });
    }

    let mut stalled = 0usize;
    while state.current_time < hard_stop {
        if let Err(BuildError::Canceled) = ctx.ensure_active() {
            canceled = true;
            break;
        }

        let idx = state.schedule_item_index % schedule.len();
        let next_idx = (idx + 1) % schedule.len();
        let (Some(item), Some(next_item)) = (schedule.item(idx), schedule.item(next_idx)) else {
            break;
        };

        let before_time = state.current_time;
        let before_len = items.len();

        let result = match item.playback {
            PlaybackMode::Once => schedule_once(ctx, &state, enumerators, item, hard_stop),
            PlaybackMode::Flood => {
                schedule_flood(ctx, &state, enumerators, item, next_item, hard_stop)
            }
            PlaybackMode::Multiple { count } => {
                schedule_multiple(ctx, &state, enumerators, item, count, hard_stop)
            }
            PlaybackMode::Duration {
                playout_duration,
                tail_mode,
            } => schedule_duration(
                ctx,
                &state,
                enumerators,
                item,
                playout_duration,
                tail_mode,
                hard_stop,
            ),
        };

        match result {
            Ok(ScheduleResult {
                state: next_state,
                items: new_items,
            }) => {
                items.extend(new_items);
                state = next_state;
            }
            Err(err @ BuildError::CollectionEmpty { .. }) => {
                warn!(
                    channel = %ctx.channel,
                    schedule_item = item.index,
                    error = %err,
                    "skipping schedule item"
                );
                state = state.cleared();
            }
            Err(err) if err.is_recoverable() => {
                error!(
                    channel = %ctx.channel,
                    schedule_item = item.index,
                    error = %err,
                    "recoverable failure, skipping schedule item"
                );
                state = state.cleared();
            }
            Err(err) => return Err(err),
        }

        if !state.is_mid_progress() {
            state = state.with_schedule_item_index(next_idx);
        }

        if state.current_time == before_time && items.len() == before_len {
            stalled += 1;
            if stalled > schedule.len() {
                warn!(
                    channel = %ctx.channel,
                    "no schedule item can make progress, stopping build"
                );
                break;
            }
        } else {
            stalled = 0;
        }
    }

    // Nothing may end past the hard stop.
    items.retain(|item| item.finish <= hard_stop);

    info!(
        channel = %ctx.channel,
        items = items.len(),
        canceled,
        "playout build finished"
    );
    guard.finish();
    Ok(PlayoutBuild {
        state,
        items,
        canceled,
    })
}
