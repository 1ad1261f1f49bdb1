//! Once scheduler: a single primary, then move on.

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

pub fn schedule_once<Tz: TimeZone>(
    ctx: &PlayoutContext<Tz>,
    state: &PlayoutBuilderState,
    enumerators: &mut CollectionEnumerators,
    schedule_item: &ProgramScheduleItem,
    hard_stop: DateTime<Utc>,
) -> Result<ScheduleResult, BuildError> {
    let media = peek_primary(enumerators, &schedule_item.collection)?;
    let item_start = start_time_after(ctx, state, schedule_item);
    let projected_end = end_time_with_filler(
        ctx,
        enumerators,
        schedule_item,
        item_start,
        media.duration(),
        media.chapters(),
    );
    if projected_end > hard_stop {
        debug!(
            channel = %ctx.channel,
            schedule_item = schedule_item.index,
            "once block does not fit before the hard stop, skipping"
        );
        return Ok(ScheduleResult {
            state: state.cleared(),
            items: Vec::new(),
        });
    }
    let primary = primary_playout_item(&media, item_start, state.next_guide_group);
    let items = add_filler(ctx, enumerators, schedule_item, &primary, media.chapters())?;
    enumerators.advance(&schedule_item.collection);

    let end = items.last().map(|i| i.finish).unwrap_or(item_start);
    debug!(
        channel = %ctx.channel,
        schedule_item = schedule_item.index,
        media_item = %media.id,
        "scheduled once block"
    );
    Ok(ScheduleResult {
        state: state.advanced_to(end).bump_guide_group().cleared(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerator::OrderedCollectionEnumerator;
    use crate::schedule::PlaybackMode;
    use crate::test_utils::{context_utc, media};
    use chrono::{NaiveTime, TimeDelta, TimeZone, Utc};
    use playout_types::{CollectionKey, FillerKind};

    #[test]
    fn fixed_once_emits_one_primary_at_the_anchor() {
        let ctx = context_utc();
        let key = CollectionKey::collection(1);
        let mut enumerators = CollectionEnumerators::new();
        enumerators.insert(
            key.clone(),
            Box::new(OrderedCollectionEnumerator::new(vec![media(
                1,
                TimeDelta::minutes(30),
            )])),
        );
        let item = ProgramScheduleItem::builder(0, key, PlaybackMode::Once)
            .fixed_start(NaiveTime::from_hms_opt(20, 0, 0).expect("valid time"))
            .build();
        let state =
            PlayoutBuilderState::new(Utc.with_ymd_and_hms(2024, 3, 10, 19, 0, 0).unwrap());
        let hard_stop = Utc.with_ymd_and_hms(2024, 3, 11, 19, 0, 0).unwrap();

        let result = schedule_once(&ctx, &state, &mut enumerators, &item, hard_stop).unwrap();

        assert_eq!(result.items.len(), 1);
        let only = &result.items[0];
        assert_eq!(
            only.start,
            Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap()
        );
        assert_eq!(
            only.finish,
            Utc.with_ymd_and_hms(2024, 3, 10, 20, 30, 0).unwrap()
        );
        assert_eq!(only.filler_kind, FillerKind::None);
        assert_eq!(result.state.current_time, only.finish);
        assert_eq!(result.state.next_guide_group, 2);
        assert!(!result.state.is_mid_progress());
    }

    #[test]
    fn empty_collection_is_reported_for_skipping() {
        let ctx = context_utc();
        let key = CollectionKey::collection(1);
        let mut enumerators = CollectionEnumerators::new();
        enumerators.insert(
            key.clone(),
            Box::new(OrderedCollectionEnumerator::new(Vec::new())),
        );
        let item = ProgramScheduleItem::builder(0, key, PlaybackMode::Once).build();
        let state =
            PlayoutBuilderState::new(Utc.with_ymd_and_hms(2024, 3, 10, 19, 0, 0).unwrap());
        let hard_stop = Utc.with_ymd_and_hms(2024, 3, 11, 19, 0, 0).unwrap();

        let err = schedule_once(&ctx, &state, &mut enumerators, &item, hard_stop).unwrap_err();
        assert!(matches!(err, BuildError::CollectionEmpty { .. }));
    }
}
