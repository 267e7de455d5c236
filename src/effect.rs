use crate::controller::{ListRequest, PrimaryRequest, RelatedFetch};
use crate::model::Collection;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    FetchList(ListRequest),
    /// Settle search input after the debounce window.
    DebounceSearch { collection: Collection, query: String },
    CancelSearch { collection: Collection },
    LoadDetail(PrimaryRequest),
    LoadRelated(RelatedFetch),
}

impl Effect {
    /// Task key the effect runs under. One key per controller, so a new
    /// request replaces the one in flight.
    pub fn task_key(&self) -> String {
        match self {
            Effect::FetchList(request) => list_task_key(request.collection),
            Effect::DebounceSearch { collection, .. } | Effect::CancelSearch { collection } => {
                format!("search:{}", collection.plural())
            }
            Effect::LoadDetail(_) => "detail".to_string(),
            Effect::LoadRelated(_) => "detail:related".to_string(),
        }
    }
}

pub fn list_task_key(collection: Collection) -> String {
    format!("list:{}", collection.plural())
}
