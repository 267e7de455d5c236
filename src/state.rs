use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::controller::{DetailController, DetailStatus, ListController, ListRequest};
use crate::filter::{self, FilterKey, FilterState};
use crate::model::{Collection, Entity, Page};
use crate::route::Route;
use crate::surface::ListSurface;

/// Quiet period after the last keystroke before search input is applied.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

/// Filter overlay. Edits a draft that only reaches the list on apply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterModal {
    pub open: bool,
    pub draft: FilterState,
    pub row: usize,
}

/// One list page: its controller, what it shows and where the cursor is.
/// Pages live for the whole session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    pub controller: ListController,
    pub surface: ListSurface,
    pub selected: usize,
    pub visited: bool,
    /// Search text last pushed into the filters.
    pub applied_search: String,
    /// Inline select that `[` / `]` act on.
    pub select_focus: usize,
}

impl ListPage {
    pub fn new(collection: Collection) -> Self {
        Self {
            controller: ListController::new(collection),
            surface: ListSurface::default(),
            selected: 0,
            visited: false,
            applied_search: String::new(),
            select_focus: 0,
        }
    }

    pub fn collection(&self) -> Collection {
        self.controller.collection
    }

    pub fn begin_fetch(&mut self) -> Option<ListRequest> {
        self.controller.begin_fetch(&mut self.surface)
    }

    pub fn load_more(&mut self) -> Option<ListRequest> {
        self.controller.load_more(&mut self.surface)
    }

    pub fn reload(&mut self) -> Option<ListRequest> {
        self.selected = 0;
        self.controller.restart(&mut self.surface)
    }

    pub fn search(&mut self, query: &str) -> Option<ListRequest> {
        self.applied_search = query.to_string();
        self.selected = 0;
        self.controller.search(query, &mut self.surface)
    }

    pub fn select(&mut self, key: FilterKey, value: &str) -> Option<ListRequest> {
        self.selected = 0;
        self.controller.select(key, value, &mut self.surface)
    }

    pub fn apply_filters(&mut self, filters: FilterState) -> Option<ListRequest> {
        self.selected = 0;
        self.controller.apply_filters(filters, &mut self.surface)
    }

    pub fn complete(&mut self, generation: u64, page: Page) -> bool {
        let applied = self.controller.complete(generation, page, &mut self.surface);
        if applied {
            self.clamp_selection();
        }
        applied
    }

    pub fn fail(&mut self, generation: u64, error: &str) -> bool {
        self.controller.fail(generation, error, &mut self.surface)
    }

    /// Records currently on screen.
    pub fn shown(&self) -> &[Entity] {
        let len = self.surface.shown.min(self.controller.results.len());
        &self.controller.results[..len]
    }

    pub fn selected_entity(&self) -> Option<&Entity> {
        self.shown().get(self.selected)
    }

    pub fn focused_select(&self) -> Option<(FilterKey, &'static [&'static str])> {
        filter::select_options(self.collection())
            .get(self.select_focus)
            .copied()
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.shown().len().saturating_sub(1));
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub route: Route,
    pub lists: [ListPage; 3],
    pub detail: DetailController,
    pub related_selected: usize,
    pub search: SearchState,
    pub modal: FilterModal,
    pub message: Option<String>,
    pub tick: u64,
}

impl AppState {
    /// State that lands on `route` once `Init` is dispatched.
    pub fn new(route: Route) -> Self {
        Self {
            terminal_size: (80, 24),
            route,
            lists: [
                ListPage::new(Collection::Characters),
                ListPage::new(Collection::Locations),
                ListPage::new(Collection::Episodes),
            ],
            detail: DetailController::default(),
            related_selected: 0,
            search: SearchState::default(),
            modal: FilterModal::default(),
            message: None,
            tick: 0,
        }
    }

    pub fn list(&self, collection: Collection) -> &ListPage {
        &self.lists[collection.index()]
    }

    pub fn list_mut(&mut self, collection: Collection) -> &mut ListPage {
        &mut self.lists[collection.index()]
    }

    /// Collection of the page on screen.
    pub fn collection(&self) -> Collection {
        match &self.route {
            Route::List(collection) => *collection,
            Route::Detail { collection, .. } => *collection,
        }
    }

    /// The list page on screen, if a list is shown.
    pub fn current_list(&self) -> Option<&ListPage> {
        match &self.route {
            Route::List(collection) => Some(self.list(*collection)),
            Route::Detail { .. } => None,
        }
    }

    pub fn current_list_mut(&mut self) -> Option<&mut ListPage> {
        match self.route.clone() {
            Route::List(collection) => Some(self.list_mut(collection)),
            Route::Detail { .. } => None,
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self.route, Route::Detail { .. })
    }

    pub fn selected_related(&self) -> Option<&Entity> {
        self.detail.related.get(self.related_selected)
    }

    /// Whether a frame would differ from the last one without any new data.
    pub fn is_animating(&self) -> bool {
        match &self.route {
            Route::List(collection) => self.list(*collection).surface.is_animating(),
            Route::Detail { .. } => {
                self.detail.status == DetailStatus::Loading || self.detail.related_loading
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Route::List(Collection::Characters))
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let list = self.list(self.collection());
        vec![
            DebugSection::new("Route")
                .entry("route", ron_string(&self.route))
                .entry("message", ron_string(&self.message)),
            DebugSection::new("List")
                .entry("collection", ron_string(&list.collection()))
                .entry("status", ron_string(&list.controller.status))
                .entry("page", ron_string(&list.controller.page))
                .entry("has_more", ron_string(&list.controller.has_more))
                .entry("loading", ron_string(&list.controller.loading))
                .entry("results", ron_string(&list.controller.results.len()))
                .entry("total", ron_string(&list.controller.total))
                .entry("generation", ron_string(&list.controller.generation))
                .entry("selected", ron_string(&list.selected))
                .entry("filters", ron_string(&list.controller.filters.summary())),
            DebugSection::new("Detail")
                .entry("status", ron_string(&self.detail.status))
                .entry("id", ron_string(&self.detail.id))
                .entry("back", ron_string(&self.detail.back))
                .entry("related", ron_string(&self.detail.related.len()))
                .entry("related_loading", ron_string(&self.detail.related_loading))
                .entry("generation", ron_string(&self.detail.generation)),
            DebugSection::new("Input")
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("modal_open", ron_string(&self.modal.open))
                .entry("modal_draft", ron_string(&self.modal.draft.summary())),
        ]
    }
}
