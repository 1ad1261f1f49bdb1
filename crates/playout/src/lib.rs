//! # Playout
//!
//! This crate builds linear-channel playouts: given a program schedule (an
//! ordered list of scheduling rules) and a set of media collections, it
//! produces the concrete, time-stamped sequence of
//! [`PlayoutItem`](playout_types::PlayoutItem)s for a channel between a
//! start instant and a hard stop.
//!
//! ## Architecture
//!
//! ```text
//! build_playout
//!   ├── PlayoutBuilderState (immutable-by-replacement clock + mode flags)
//!   ├── mode schedulers (once / flood / multiple / duration)
//!   │     └── filler composer (pre-roll, chapter mid-roll, post-roll, pad)
//!   ├── CollectionEnumerators (cursors over media collections)
//!   └── SearchIndex commit guard (commit exactly once per build)
//! ```
//!
//! Each schedule item is routed to its mode scheduler, which drains its
//! collection until the variant's termination condition and hands every
//! primary to the filler composer. The build loop threads the replaced
//! state forward and stops at the hard stop or on cancellation, preserving
//! all partial output.

pub mod builder;
pub mod composer;
pub mod context;
pub mod enumerator;
pub mod error;
pub mod index;
pub mod scanner;
pub mod schedule;
pub mod schedulers;
pub mod start_time;
pub mod state;
pub mod test_utils;

pub use builder::{PlayoutBuild, build_playout};
pub use context::PlayoutContext;
pub use enumerator::{
    CollectionEnumerator, CollectionEnumerators, EnumeratorState, OrderedCollectionEnumerator,
    ShuffledCollectionEnumerator,
};
pub use error::{BuildError, CollaboratorError};
pub use index::{CommitGuard, MemorySearchIndex, SearchIndex};
pub use schedule::{
    PlaybackMode, ProgramSchedule, ProgramScheduleItem, ProgramScheduleItemBuilder, StartType,
    TailMode,
};
pub use state::PlayoutBuilderState;
