//! Collection addressing.
//!
//! A schedule item selects media through a [`CollectionKey`]: a value-type
//! composite of the collection flavor and the ids that identify it. Keys
//! have structural equality and a stable hash so they can index the
//! enumerator registry.

/// The flavor of media collection a schedule item draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionType {
    Collection,
    MultiCollection,
    SmartCollection,
    TelevisionShow,
    TelevisionSeason,
    Artist,
}

/// Value-type key addressing one media collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionKey {
    pub collection_type: CollectionType,
    pub collection_id: Option<i64>,
    pub media_item_id: Option<i64>,
}

impl CollectionKey {
    pub fn collection(id: i64) -> Self {
        Self {
            collection_type: CollectionType::Collection,
            collection_id: Some(id),
            media_item_id: None,
        }
    }

    pub fn multi_collection(id: i64) -> Self {
        Self {
            collection_type: CollectionType::MultiCollection,
            collection_id: Some(id),
            media_item_id: None,
        }
    }

    pub fn smart_collection(id: i64) -> Self {
        Self {
            collection_type: CollectionType::SmartCollection,
            collection_id: Some(id),
            media_item_id: None,
        }
    }

    pub fn television_show(id: i64) -> Self {
        Self {
            collection_type: CollectionType::TelevisionShow,
            collection_id: None,
            media_item_id: Some(id),
        }
    }

    pub fn television_season(id: i64) -> Self {
        Self {
            collection_type: CollectionType::TelevisionSeason,
            collection_id: None,
            media_item_id: Some(id),
        }
    }

    pub fn artist(id: i64) -> Self {
        Self {
            collection_type: CollectionType::Artist,
            collection_id: None,
            media_item_id: Some(id),
        }
    }
}
