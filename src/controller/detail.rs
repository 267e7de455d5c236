//! Resolution of a detail page: primary record, then its related records.

use serde::{Deserialize, Serialize};

use crate::model::{Collection, Entity, Lookup};
use crate::route::{self, DetailQuery, Route};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    NotFound,
}

/// How related records are fetched. One id goes through the single-record
/// endpoint, several through one batched request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelatedRequest {
    Single(u32),
    Batch(Vec<u32>),
}

impl RelatedRequest {
    pub fn plan(ids: Vec<u32>) -> Option<Self> {
        match ids.as_slice() {
            [] => None,
            [id] => Some(RelatedRequest::Single(*id)),
            _ => Some(RelatedRequest::Batch(ids)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimaryRequest {
    pub collection: Collection,
    pub id: u32,
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelatedFetch {
    pub collection: Collection,
    pub request: RelatedRequest,
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailController {
    pub collection: Collection,
    pub id: Option<u32>,
    pub back: Route,
    pub status: DetailStatus,
    pub primary: Option<Entity>,
    pub related: Vec<Entity>,
    pub related_loading: bool,
    pub generation: u64,
}

impl Default for DetailController {
    fn default() -> Self {
        Self {
            collection: Collection::Characters,
            id: None,
            back: Route::List(Collection::Characters),
            status: DetailStatus::Idle,
            primary: None,
            related: Vec::new(),
            related_loading: false,
            generation: 0,
        }
    }
}

impl DetailController {
    /// Opens a detail page from its query string. An invalid `id` goes
    /// straight to not-found without a request.
    pub fn open(&mut self, collection: Collection, query: &str) -> Option<PrimaryRequest> {
        let query = DetailQuery::parse(query);
        self.generation = self.generation.wrapping_add(1);
        self.collection = collection;
        self.id = query.id;
        self.back = route::back_target(collection, query.referrer.as_deref());
        self.primary = None;
        self.related.clear();
        self.related_loading = false;

        let Some(id) = query.id else {
            self.status = DetailStatus::NotFound;
            return None;
        };
        self.status = DetailStatus::Loading;
        Some(PrimaryRequest {
            collection,
            id,
            generation: self.generation,
        })
    }

    /// Applies the primary lookup; returns the related fetch to issue, if any.
    pub fn primary_loaded(
        &mut self,
        generation: u64,
        lookup: Lookup<Entity>,
    ) -> Option<RelatedFetch> {
        if !self.accepts(generation) {
            return None;
        }
        let Some(entity) = lookup.found() else {
            self.status = DetailStatus::NotFound;
            return None;
        };
        let ids = entity.related_ids();
        let related_collection = entity.collection().related();
        self.primary = Some(entity);
        self.status = DetailStatus::Loaded;

        let request = RelatedRequest::plan(ids)?;
        self.related_loading = true;
        Some(RelatedFetch {
            collection: related_collection,
            request,
            generation: self.generation,
        })
    }

    /// Any failure loading the primary record renders as not found.
    pub fn primary_failed(&mut self, generation: u64) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.status = DetailStatus::NotFound;
        true
    }

    pub fn related_loaded(&mut self, generation: u64, records: Vec<Entity>) -> bool {
        if generation != self.generation || !self.related_loading {
            return false;
        }
        self.related = records;
        self.related_loading = false;
        true
    }

    /// Related failures degrade to an empty list.
    pub fn related_failed(&mut self, generation: u64) -> bool {
        self.related_loaded(generation, Vec::new())
    }

    pub fn is_loading(&self) -> bool {
        self.status == DetailStatus::Loading
    }

    /// Route of the current page, used as `ref` by pages opened from it.
    pub fn referrer(&self) -> Option<String> {
        self.id
            .map(|id| format!("{}_{id}", self.collection.endpoint()))
    }

    fn accepts(&self, generation: u64) -> bool {
        self.status == DetailStatus::Loading && generation == self.generation
    }
}
