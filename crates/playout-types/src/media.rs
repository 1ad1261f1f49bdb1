//! Read-only media view consumed by the schedule builder.
//!
//! The scheduler never touches library metadata directly; it sees a media
//! item as an identity plus the head version's duration and ordered chapter
//! marks. Scanners and repositories own everything else.

use chrono::TimeDelta;

/// Opaque identity of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaItemId(pub i64);

impl std::fmt::Display for MediaItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chapter mark inside a media item, as offsets from the item start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaChapter {
    pub start_time: TimeDelta,
    pub end_time: TimeDelta,
}

impl MediaChapter {
    #[inline]
    pub fn new(start_time: TimeDelta, end_time: TimeDelta) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Span covered by this chapter.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}

/// The head version of a media item: playable duration plus chapter marks
/// sorted by start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaVersion {
    pub duration: TimeDelta,
    pub chapters: Vec<MediaChapter>,
}

impl MediaVersion {
    pub fn new(duration: TimeDelta) -> Self {
        Self {
            duration,
            chapters: Vec::new(),
        }
    }

    /// Attach chapter marks; they are kept sorted by start time.
    pub fn with_chapters(mut self, mut chapters: Vec<MediaChapter>) -> Self {
        chapters.sort_by_key(|c| c.start_time);
        self.chapters = chapters;
        self
    }
}

/// The scheduler's view of one media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub id: MediaItemId,
    pub version: MediaVersion,
}

impl MediaItem {
    pub fn new(id: MediaItemId, version: MediaVersion) -> Self {
        Self { id, version }
    }

    /// Head-version duration.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.version.duration
    }

    /// Ordered chapter marks of the head version; empty when the item has
    /// no chapter information.
    #[inline]
    pub fn chapters(&self) -> &[MediaChapter] {
        &self.version.chapters
    }
}
