use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::controller::ListRequest;
use crate::effect::Effect;
use crate::filter;
use crate::model::{Collection, Entity};
use crate::route::Route;
use crate::state::AppState;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            let route = state.route.clone();
            navigate(state, route)
        }

        Action::Navigate(route) => navigate(state, route),

        Action::NavigateBack => {
            if !state.is_detail() {
                return DispatchResult::unchanged();
            }
            let back = state.detail.back.clone();
            navigate(state, back)
        }

        Action::ListLoadMore => {
            let Some(page) = state.current_list_mut() else {
                return DispatchResult::unchanged();
            };
            fetch_result(page.load_more())
        }

        Action::ListReload => {
            if state.current_list().is_none() {
                return DispatchResult::unchanged();
            }
            state.message = None;
            let request = state.current_list_mut().and_then(|page| page.reload());
            fetch_result(request)
        }

        Action::ListDidLoad {
            collection,
            generation,
            page,
        } => {
            let count = page.results.len();
            if state.list_mut(collection).complete(generation, page) {
                state.message = None;
                DispatchResult::changed()
            } else {
                tracing::debug!(
                    collection = collection.plural(),
                    generation,
                    count,
                    "dropped stale list response"
                );
                DispatchResult::unchanged()
            }
        }

        Action::ListDidError {
            collection,
            generation,
            error,
        } => {
            if !state.list_mut(collection).fail(generation, &error) {
                return DispatchResult::unchanged();
            }
            tracing::warn!(collection = collection.plural(), %error, "list fetch failed");
            if !state.list(collection).controller.results.is_empty() {
                state.message = Some(format!(
                    "Could not load more {}: {error}",
                    collection.plural()
                ));
            }
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            if state.is_detail() {
                let len = state.detail.related.len();
                let next = clamp_index(state.related_selected, len, delta);
                return set_if_changed(&mut state.related_selected, next);
            }
            let Some(page) = state.current_list_mut() else {
                return DispatchResult::unchanged();
            };
            let next = clamp_index(page.selected, page.shown().len(), delta);
            set_if_changed(&mut page.selected, next)
        }

        Action::ListSelect(index) => {
            let Some(page) = state.current_list_mut() else {
                return DispatchResult::unchanged();
            };
            let next = index.min(page.shown().len().saturating_sub(1));
            set_if_changed(&mut page.selected, next)
        }

        Action::RelatedSelect(index) => {
            let next = index.min(state.detail.related.len().saturating_sub(1));
            set_if_changed(&mut state.related_selected, next)
        }

        Action::OpenSelected => {
            let target = if state.is_detail() {
                let referrer = state.detail.referrer();
                state
                    .selected_related()
                    .zip(referrer)
                    .map(|(entity, referrer)| detail_route(entity, &referrer))
            } else {
                state.current_list().and_then(|page| {
                    page.selected_entity()
                        .map(|entity| detail_route(entity, page.collection().plural()))
                })
            };
            match target {
                Some(route) => navigate(state, route),
                None => DispatchResult::unchanged(),
            }
        }

        Action::LocationOpen => {
            let target = match (&state.detail.primary, state.detail.referrer()) {
                (Some(Entity::Character(character)), Some(referrer)) => character
                    .location
                    .as_ref()
                    .and_then(|link| link.id())
                    .map(|id| Route::detail(Collection::Locations, id, &referrer)),
                _ => None,
            };
            match target {
                Some(route) => navigate(state, route),
                None => DispatchResult::unchanged(),
            }
        }

        Action::SearchStart => {
            let Some(query) = state.current_list().map(|page| page.applied_search.clone()) else {
                return DispatchResult::unchanged();
            };
            state.search.query = query;
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.query.push(ch);
            debounce_search(state)
        }

        Action::SearchBackspace => {
            if !state.search.active || state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            debounce_search(state)
        }

        Action::SearchSubmit => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            let collection = state.collection();
            let query = state.search.query.clone();
            let mut effects = vec![Effect::CancelSearch { collection }];
            effects.extend(apply_search(state, collection, &query));
            DispatchResult::changed_with_many(effects)
        }

        Action::SearchCancel => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            let collection = state.collection();
            state.search.query = state.list(collection).applied_search.clone();
            DispatchResult::changed_with(Effect::CancelSearch { collection })
        }

        Action::SearchDidSettle { collection, query } => {
            match apply_search(state, collection, &query) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::unchanged(),
            }
        }

        Action::FilterFocusNext => {
            let Some(page) = state.current_list_mut() else {
                return DispatchResult::unchanged();
            };
            let count = filter::select_options(page.collection()).len();
            if count == 0 {
                return DispatchResult::unchanged();
            }
            page.select_focus = (page.select_focus + 1) % count;
            DispatchResult::changed()
        }

        Action::FilterCycle(step) => {
            let Some(page) = state.current_list_mut() else {
                return DispatchResult::unchanged();
            };
            let Some((key, options)) = page.focused_select() else {
                return DispatchResult::unchanged();
            };
            let value = filter::cycle_option(options, page.controller.filters.get(key), step);
            let request = page.select(key, &value);
            restart_result(state, request)
        }

        Action::ModalOpen => {
            let Some(page) = state.current_list() else {
                return DispatchResult::unchanged();
            };
            if filter::select_options(page.collection()).is_empty() {
                return DispatchResult::unchanged();
            }
            let draft = page.controller.filters.clone();
            state.modal.draft = draft;
            state.modal.row = 0;
            state.modal.open = true;
            DispatchResult::changed()
        }

        Action::ModalClose => {
            if !state.modal.open {
                return DispatchResult::unchanged();
            }
            state.modal.open = false;
            state.modal.draft.clear();
            DispatchResult::changed()
        }

        Action::ModalMove(delta) => {
            if !state.modal.open {
                return DispatchResult::unchanged();
            }
            let rows = filter::select_options(state.collection()).len();
            let next = clamp_index(state.modal.row, rows, delta);
            set_if_changed(&mut state.modal.row, next)
        }

        Action::ModalCycle(step) => {
            if !state.modal.open {
                return DispatchResult::unchanged();
            }
            let Some((key, options)) = filter::select_options(state.collection())
                .get(state.modal.row)
                .copied()
            else {
                return DispatchResult::unchanged();
            };
            let value = filter::cycle_option(options, state.modal.draft.get(key), step);
            state.modal.draft.set(key, value);
            DispatchResult::changed()
        }

        Action::ModalReset => {
            if !state.modal.open {
                return DispatchResult::unchanged();
            }
            for (key, _) in filter::select_options(state.collection()) {
                state.modal.draft.remove(*key);
            }
            DispatchResult::changed()
        }

        Action::ModalApply => {
            if !state.modal.open {
                return DispatchResult::unchanged();
            }
            state.modal.open = false;
            let draft = std::mem::take(&mut state.modal.draft);
            let request = state
                .current_list_mut()
                .and_then(|page| page.apply_filters(draft));
            restart_result(state, request)
        }

        Action::DetailDidLoad { generation, lookup } => {
            if !state.detail.is_loading() || generation != state.detail.generation {
                return DispatchResult::unchanged();
            }
            if lookup.is_missing() {
                tracing::info!(
                    collection = state.detail.collection.endpoint(),
                    id = ?state.detail.id,
                    "record not found"
                );
            }
            match state.detail.primary_loaded(generation, lookup) {
                Some(related) => DispatchResult::changed_with(Effect::LoadRelated(related)),
                None => DispatchResult::changed(),
            }
        }

        Action::DetailDidError { generation, error } => {
            if !state.detail.primary_failed(generation) {
                return DispatchResult::unchanged();
            }
            tracing::warn!(%error, "detail fetch failed");
            DispatchResult::changed()
        }

        Action::RelatedDidLoad {
            generation,
            records,
        } => {
            if state.detail.related_loaded(generation, records) {
                state.related_selected = 0;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::RelatedDidError { generation, error } => {
            if !state.detail.related_failed(generation) {
                return DispatchResult::unchanged();
            }
            tracing::warn!(%error, "related fetch failed");
            state.related_selected = 0;
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Tick => tick_animation(state),

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn navigate(state: &mut AppState, route: Route) -> DispatchResult<Effect> {
    tracing::debug!(?route, "navigate");
    state.search.active = false;
    state.modal.open = false;
    state.message = None;
    state.route = route.clone();
    match route {
        Route::List(collection) => {
            state.search.query = state.list(collection).applied_search.clone();
            let page = state.list_mut(collection);
            if page.visited {
                return DispatchResult::changed();
            }
            page.visited = true;
            fetch_result(page.begin_fetch())
        }
        Route::Detail { collection, query } => {
            state.related_selected = 0;
            match state.detail.open(collection, &query) {
                Some(request) => DispatchResult::changed_with(Effect::LoadDetail(request)),
                None => {
                    tracing::info!(collection = collection.endpoint(), %query, "invalid detail id");
                    DispatchResult::changed()
                }
            }
        }
    }
}

/// Pushes settled search text into the list of `collection`. Text equal to
/// what is already applied is ignored.
fn apply_search(state: &mut AppState, collection: Collection, query: &str) -> Option<Effect> {
    let page = state.list_mut(collection);
    if page.applied_search == query {
        return None;
    }
    let request = page.search(query)?;
    state.message = None;
    Some(Effect::FetchList(request))
}

fn debounce_search(state: &mut AppState) -> DispatchResult<Effect> {
    DispatchResult::changed_with(Effect::DebounceSearch {
        collection: state.collection(),
        query: state.search.query.clone(),
    })
}

fn fetch_result(request: Option<ListRequest>) -> DispatchResult<Effect> {
    match request {
        Some(request) => DispatchResult::changed_with(Effect::FetchList(request)),
        None => DispatchResult::unchanged(),
    }
}

/// Like `fetch_result`, for fetches that replace the list from page one.
fn restart_result(state: &mut AppState, request: Option<ListRequest>) -> DispatchResult<Effect> {
    if request.is_some() {
        state.message = None;
    }
    fetch_result(request)
}

fn detail_route(entity: &Entity, referrer: &str) -> Route {
    Route::detail(entity.collection(), entity.id(), referrer)
}

fn tick_animation(state: &mut AppState) -> DispatchResult<Effect> {
    state.tick = state.tick.wrapping_add(1);
    if !state.is_animating() {
        return DispatchResult::unchanged();
    }
    if let Some(page) = state.current_list_mut() {
        page.surface.advance();
    }
    DispatchResult::changed()
}

fn set_if_changed(slot: &mut usize, next: usize) -> DispatchResult<Effect> {
    if *slot == next {
        DispatchResult::unchanged()
    } else {
        *slot = next;
        DispatchResult::changed()
    }
}

fn clamp_index(current: usize, len: usize, delta: i16) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len as i64 - 1;
    (current as i64 + delta as i64).clamp(0, max) as usize
}
