//! Collection enumerators.
//!
//! An enumerator is a cursor over one media collection. The scheduler only
//! depends on the small [`CollectionEnumerator`] contract: a current item, a
//! way to advance, and a minimum-duration hint that lets duration-bounded
//! filler loops terminate without scanning the collection.
//!
//! Enumerator position is the persisted build progress: the same
//! [`EnumeratorState`] (seed + index) replayed over the same collection
//! yields the same sequence, which is what makes resumed builds
//! deterministic.

use chrono::TimeDelta;
use playout_types::{CollectionKey, MediaItem};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashMap;

/// Persisted enumerator position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumeratorState {
    pub seed: u64,
    pub index: usize,
}

/// Cursor over an ordered sequence of media items.
pub trait CollectionEnumerator {
    /// Current cursor value; `None` only for empty collections.
    fn current(&self) -> Option<MediaItem>;

    /// Advance the cursor. Enumerators cycle: after the last item the
    /// cursor wraps to the start of the (possibly reshuffled) sequence.
    fn move_next(&mut self);

    /// Lower bound on the duration of any remaining item, used by
    /// duration-bounded filler loops to terminate. Strictly positive for
    /// drainable collections; `None` when the collection is empty.
    fn minimum_duration(&self) -> Option<TimeDelta>;

    /// Position to persist for resumed builds.
    fn state(&self) -> EnumeratorState;
}

/// Enumerator that yields items in their stored order, cycling.
pub struct OrderedCollectionEnumerator {
    items: Vec<MediaItem>,
    index: usize,
    minimum: Option<TimeDelta>,
}

impl OrderedCollectionEnumerator {
    pub fn new(items: Vec<MediaItem>) -> Self {
        let minimum = items.iter().map(MediaItem::duration).min();
        Self {
            items,
            index: 0,
            minimum,
        }
    }

    /// Resume from a persisted position.
    pub fn with_state(items: Vec<MediaItem>, state: EnumeratorState) -> Self {
        let mut enumerator = Self::new(items);
        if !enumerator.items.is_empty() {
            enumerator.index = state.index % enumerator.items.len();
        }
        enumerator
    }
}

impl CollectionEnumerator for OrderedCollectionEnumerator {
    fn current(&self) -> Option<MediaItem> {
        self.items.get(self.index).cloned()
    }

    fn move_next(&mut self) {
        if !self.items.is_empty() {
            self.index = (self.index + 1) % self.items.len();
        }
    }

    fn minimum_duration(&self) -> Option<TimeDelta> {
        self.minimum
    }

    fn state(&self) -> EnumeratorState {
        EnumeratorState {
            seed: 0,
            index: self.index,
        }
    }
}

/// Enumerator that reshuffles the collection on every full pass, seeded so
/// the sequence is reproducible across builds.
///
/// The persisted index is the total number of advances, not the in-pass
/// offset; resuming replays `index / len` reshuffles to land on the same
/// pass ordering.
pub struct ShuffledCollectionEnumerator {
    items: Vec<MediaItem>,
    seed: u64,
    position: usize,
    minimum: Option<TimeDelta>,
    rng: SmallRng,
}

impl ShuffledCollectionEnumerator {
    pub fn new(items: Vec<MediaItem>, seed: u64) -> Self {
        Self::with_state(items, EnumeratorState { seed, index: 0 })
    }

    /// Resume from a persisted position: replay the shuffles up to the
    /// stored index so the visible sequence continues where it left off.
    pub fn with_state(mut items: Vec<MediaItem>, state: EnumeratorState) -> Self {
        let minimum = items.iter().map(MediaItem::duration).min();
        let mut rng = SmallRng::seed_from_u64(state.seed);
        if !items.is_empty() {
            items.shuffle(&mut rng);
            let passes = state.index / items.len();
            for _ in 0..passes {
                items.shuffle(&mut rng);
            }
        }
        Self {
            items,
            seed: state.seed,
            position: state.index,
            minimum,
            rng,
        }
    }
}

impl CollectionEnumerator for ShuffledCollectionEnumerator {
    fn current(&self) -> Option<MediaItem> {
        if self.items.is_empty() {
            return None;
        }
        self.items.get(self.position % self.items.len()).cloned()
    }

    fn move_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.position += 1;
        if self.position % self.items.len() == 0 {
            self.items.shuffle(&mut self.rng);
        }
    }

    fn minimum_duration(&self) -> Option<TimeDelta> {
        self.minimum
    }

    fn state(&self) -> EnumeratorState {
        EnumeratorState {
            seed: self.seed,
            index: self.position,
        }
    }
}

/// Registry of enumerators keyed by collection.
///
/// The build borrows the registry for its whole duration; enumerators are
/// advanced as items are consumed and that advancement is the persisted
/// progress.
#[derive(Default)]
pub struct CollectionEnumerators {
    map: FxHashMap<CollectionKey, Box<dyn CollectionEnumerator>>,
}

impl CollectionEnumerators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key: CollectionKey,
        enumerator: Box<dyn CollectionEnumerator>,
    ) -> &mut Self {
        self.map.insert(key, enumerator);
        self
    }

    pub fn get(&self, key: &CollectionKey) -> Option<&dyn CollectionEnumerator> {
        self.map.get(key).map(|e| e.as_ref())
    }

    pub fn get_mut(&mut self, key: &CollectionKey) -> Option<&mut (dyn CollectionEnumerator + '_)> {
        self.map
            .get_mut(key)
            .map(|e| -> &mut dyn CollectionEnumerator { e.as_mut() })
    }

    /// Current item of the keyed collection without advancing.
    pub fn peek(&self, key: &CollectionKey) -> Option<MediaItem> {
        self.get(key).and_then(|e| e.current())
    }

    /// Advance the keyed collection past its current item.
    pub fn advance(&mut self, key: &CollectionKey) {
        if let Some(e) = self.map.get_mut(key) {
            e.move_next();
        }
    }
}
