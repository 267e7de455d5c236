//! Pagination, filtering and loading state of one list page.

use serde::{Deserialize, Serialize};

use crate::filter::{self, FilterKey, FilterState};
use crate::model::{Collection, Entity, Page, EXPECTED_PAGE_LEN};
use crate::surface::RenderSurface;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Rendered,
    Empty,
    Errored,
}

/// Everything a fetch task needs. The `generation` comes back with the result
/// so late answers to superseded requests can be told apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListRequest {
    pub collection: Collection,
    pub page: u32,
    pub filters: FilterState,
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListController {
    pub collection: Collection,
    pub filters: FilterState,
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    pub results: Vec<Entity>,
    pub status: ListStatus,
    pub total: Option<u32>,
    pub generation: u64,
}

impl ListController {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: FilterState::new(),
            page: 1,
            has_more: true,
            loading: false,
            results: Vec::new(),
            status: ListStatus::Idle,
            total: None,
            generation: 0,
        }
    }

    /// Starts a fetch of the current page unless one is in flight or the
    /// last page has been seen.
    pub fn begin_fetch(&mut self, surface: &mut impl RenderSurface) -> Option<ListRequest> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        self.status = ListStatus::Loading;
        if self.page == 1 {
            surface.show_placeholder(self.collection, EXPECTED_PAGE_LEN);
        }
        surface.set_load_more(true, self.page > 1);
        Some(self.request())
    }

    /// Next page, appended to what is shown.
    pub fn load_more(&mut self, surface: &mut impl RenderSurface) -> Option<ListRequest> {
        if self.loading || !self.has_more {
            return None;
        }
        self.page += 1;
        self.begin_fetch(surface)
    }

    /// Applies free-text search input and restarts from page 1.
    pub fn search(&mut self, input: &str, surface: &mut impl RenderSurface) -> Option<ListRequest> {
        filter::apply_search(self.collection, &mut self.filters, input);
        self.restart(surface)
    }

    /// Sets one select filter and restarts from page 1.
    pub fn select(
        &mut self,
        key: FilterKey,
        value: &str,
        surface: &mut impl RenderSurface,
    ) -> Option<ListRequest> {
        self.filters.set(key, value);
        self.restart(surface)
    }

    /// Replaces all filters (modal apply) and restarts from page 1.
    pub fn apply_filters(
        &mut self,
        filters: FilterState,
        surface: &mut impl RenderSurface,
    ) -> Option<ListRequest> {
        self.filters = filters;
        self.restart(surface)
    }

    /// Drops whatever is shown or in flight and fetches page 1 again.
    pub fn restart(&mut self, surface: &mut impl RenderSurface) -> Option<ListRequest> {
        self.generation = self.generation.wrapping_add(1);
        self.page = 1;
        self.has_more = true;
        self.loading = false;
        self.results.clear();
        self.total = None;
        self.begin_fetch(surface)
    }

    /// Applies a successful response. Returns `false` for stale responses.
    /// An empty later page only ends pagination; rows already shown stay.
    pub fn complete(
        &mut self,
        generation: u64,
        page: Page,
        surface: &mut impl RenderSurface,
    ) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.loading = false;
        surface.remove_placeholder();

        let Page { info, results } = page;
        let first_new = if self.page == 1 {
            self.results = results;
            0
        } else {
            let start = self.results.len();
            self.results.extend(results);
            start
        };
        self.total = Some(info.count);

        if self.results.len() == first_new {
            self.has_more = false;
            if self.results.is_empty() {
                self.status = ListStatus::Empty;
                surface.show_no_results();
            } else {
                self.status = ListStatus::Rendered;
            }
            surface.set_load_more(false, false);
            return true;
        }

        self.has_more = info.next.is_some();
        self.status = ListStatus::Rendered;
        surface.render_list(self.results.len());
        surface.animate_entrance(first_new..self.results.len());
        surface.set_load_more(false, self.has_more);
        true
    }

    /// Applies a failed response. Returns `false` for stale responses.
    pub fn fail(&mut self, generation: u64, error: &str, surface: &mut impl RenderSurface) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.loading = false;
        surface.remove_placeholder();
        if self.results.is_empty() {
            self.status = ListStatus::Errored;
            surface.show_error(error);
        } else {
            // Keep the cursor on the last page that actually loaded.
            self.page = self.page.saturating_sub(1).max(1);
            self.status = ListStatus::Rendered;
        }
        surface.set_load_more(false, self.has_more && !self.results.is_empty());
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn accepts(&self, generation: u64) -> bool {
        self.loading && generation == self.generation
    }

    fn request(&self) -> ListRequest {
        ListRequest {
            collection: self.collection,
            page: self.page,
            filters: self.filters.clone(),
            generation: self.generation,
        }
    }
}
