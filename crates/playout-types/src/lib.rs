//! # Playout Types
//!
//! Shared data model for the playout scheduler: the read-only media view
//! consumed by the schedule builder, filler presets, the collection key used
//! to address media collections, and the `PlayoutItem` output tuple together
//! with its persisted row shape.
//!
//! This crate is deliberately light on dependencies so that scanners, the
//! scheduling engine, and persistence layers can all share it.

pub mod collection;
pub mod filler;
pub mod item;
pub mod media;
pub mod time;

pub use collection::{CollectionKey, CollectionType};
pub use filler::{FillerKind, FillerMode, FillerPreset, PresetError};
pub use item::{PlayoutItem, PlayoutItemRow};
pub use media::{MediaChapter, MediaItem, MediaItemId, MediaVersion};
