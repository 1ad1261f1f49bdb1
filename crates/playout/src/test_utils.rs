//! Test fixtures shared by unit and scenario tests.

use chrono::{TimeDelta, Utc};
use playout_types::{MediaChapter, MediaItem, MediaItemId, MediaVersion};
use tokio_util::sync::CancellationToken;

use crate::context::PlayoutContext;

/// Initialize tracing for tests with appropriate settings.
#[inline]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A UTC build context for tests.
#[inline]
pub fn context_utc() -> PlayoutContext<Utc> {
    PlayoutContext::new("test-channel", Utc, CancellationToken::new())
}

/// A media item with the given duration and no chapters.
pub fn media(id: i64, duration: TimeDelta) -> MediaItem {
    MediaItem::new(MediaItemId(id), MediaVersion::new(duration))
}

/// A media item whose chapters are given as `(start, end)` minute pairs.
pub fn media_with_chapters(id: i64, duration: TimeDelta, chapters: &[(i64, i64)]) -> MediaItem {
    let chapters = chapters
        .iter()
        .map(|(s, e)| MediaChapter::new(TimeDelta::minutes(*s), TimeDelta::minutes(*e)))
        .collect();
    MediaItem::new(
        MediaItemId(id),
        MediaVersion::new(duration).with_chapters(chapters),
    )
}
