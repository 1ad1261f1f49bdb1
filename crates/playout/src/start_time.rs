//! Start-time arithmetic.
//!
//! Fixed-start schedule items anchor to a wall-clock time of day in the
//! channel's zone. The local offset is resolved on the target date, so
//! anchoring stays correct across DST transitions; ambiguous local times
//! resolve to the earliest mapping and skipped local times slide forward by
//! an hour.

use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::context::PlayoutContext;
use crate::schedule::{PlaybackMode, ProgramScheduleItem, StartType};
use crate::state::PlayoutBuilderState;

/// Whether `item` is mid-progress under `state`, which suppresses fixed
/// anchoring so an in-flight flood/duration/multiple block continues from
/// its current clock.
pub fn is_item_mid_progress(state: &PlayoutBuilderState, item: &ProgramScheduleItem) -> bool {
    match item.playback {
        PlaybackMode::Once => false,
        PlaybackMode::Flood => state.in_flood,
        PlaybackMode::Multiple { .. } => state.multiple_remaining.is_some(),
        PlaybackMode::Duration { .. } => {
            state.duration_finish.is_some() || state.in_duration_filler
        }
    }
}

/// The instant at which `item` starts, given the current build state.
///
/// Fixed items anchor to the next occurrence of their time of day in the
/// channel's zone (today if still ahead, otherwise tomorrow); dynamic items
/// and mid-progress items start at the current clock.
pub fn start_time_after<Tz: TimeZone>(
    ctx: &PlayoutContext<Tz>,
    state: &PlayoutBuilderState,
    item: &ProgramScheduleItem,
) -> DateTime<Utc> {
    match (item.start_type, item.start_time) {
        (StartType::Fixed, Some(time_of_day)) if !is_item_mid_progress(state, item) => {
            let local_date = state.current_time.with_timezone(&ctx.zone).date_naive();
            let anchor = resolve_local(&ctx.zone, local_date, time_of_day);
            if anchor < state.current_time {
                resolve_local(&ctx.zone, local_date + Days::new(1), time_of_day)
            } else {
                anchor
            }
        }
        _ => state.current_time,
    }
}

/// Start instant clamped to the hard stop; filler never schedules past it.
pub fn filler_start_time_after<Tz: TimeZone>(
    ctx: &PlayoutContext<Tz>,
    state: &PlayoutBuilderState,
    item: &ProgramScheduleItem,
    hard_stop: DateTime<Utc>,
) -> DateTime<Utc> {
    start_time_after(ctx, state, item).min(hard_stop)
}

/// Resolve a local date + time of day to UTC using the offset in effect on
/// that date.
fn resolve_local<Tz: TimeZone>(zone: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Inside a spring-forward gap; the wall clock jumps an hour.
            let shifted = naive + TimeDelta::hours(1);
            match zone.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
                LocalResult::None => Utc.from_utc_datetime(&naive),
            }
        }
    }
}
