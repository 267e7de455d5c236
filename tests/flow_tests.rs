//! Reducer flows driven through an `EffectStore`: what each action changes and
//! which effects it asks for.

use pretty_assertions::assert_eq;
use rmapi::{
    action::Action,
    controller::{DetailStatus, ListRequest, ListStatus, PrimaryRequest, RelatedRequest},
    effect::Effect,
    filter::FilterKey,
    model::{Character, Collection, Entity, Episode, Lookup, NamedLink, Page, PageInfo},
    reducer::reducer,
    route::Route,
    state::AppState,
};
use tui_dispatch::EffectStore;

const BASE: &str = "https://rickandmortyapi.com/api";

fn character(id: u32, episodes: &[u32]) -> Entity {
    Entity::Character(Character {
        id,
        name: format!("Character {id}"),
        status: Some("Alive".into()),
        species: Some("Human".into()),
        kind: None,
        gender: Some("Female".into()),
        origin: None,
        location: Some(NamedLink {
            name: "Earth (C-137)".into(),
            url: format!("{BASE}/location/1"),
        }),
        image: None,
        episode: episodes
            .iter()
            .map(|id| format!("{BASE}/episode/{id}"))
            .collect(),
    })
}

fn episode(id: u32) -> Entity {
    Entity::Episode(Episode {
        id,
        name: format!("Episode {id}"),
        air_date: Some("December 2, 2013".into()),
        episode: Some(format!("S01E{id:02}")),
        characters: Vec::new(),
    })
}

fn page(results: Vec<Entity>, count: u32, next: Option<&str>) -> Page {
    Page {
        info: PageInfo {
            count,
            pages: count.div_ceil(20),
            next: next.map(str::to_string),
            prev: None,
        },
        results,
    }
}

fn characters(ids: std::ops::Range<u32>) -> Vec<Entity> {
    ids.map(|id| character(id, &[1])).collect()
}

fn list_request(effects: &[Effect]) -> ListRequest {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchList(request) => Some(request.clone()),
            _ => None,
        })
        .expect("expected a list fetch")
}

fn detail_request(effects: &[Effect]) -> PrimaryRequest {
    match effects {
        [Effect::LoadDetail(request)] => request.clone(),
        other => panic!("expected a detail load, got {other:?}"),
    }
}

fn loaded(request: &ListRequest, page: Page) -> Action {
    Action::ListDidLoad {
        collection: request.collection,
        generation: request.generation,
        page,
    }
}

#[test]
fn test_init_fetches_first_page_with_placeholders() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    let result = store.dispatch(Action::Init);
    assert!(result.changed);
    let request = list_request(&result.effects);
    assert_eq!(request.collection, Collection::Characters);
    assert_eq!(request.page, 1);
    assert_eq!(request.filters.active_count(), 0);

    let list = store.state().list(Collection::Characters);
    assert!(list.controller.is_loading());
    assert_eq!(list.surface.placeholder.as_ref().map(|p| p.count), Some(20));
}

#[test]
fn test_load_more_is_ignored_while_loading() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);

    let result = store.dispatch(Action::ListLoadMore);
    assert!(!result.changed);
    assert!(result.effects.is_empty());
}

#[test]
fn test_pages_append_until_next_is_null() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let first = list_request(&store.dispatch(Action::Init).effects);
    store.dispatch(loaded(
        &first,
        page(characters(1..21), 30, Some(format!("{BASE}/character?page=2").as_str())),
    ));
    assert!(store.state().list(Collection::Characters).surface.load_more.visible);

    let second = list_request(&store.dispatch(Action::ListLoadMore).effects);
    assert_eq!(second.page, 2);
    store.dispatch(loaded(&second, page(characters(21..31), 30, None)));

    let list = store.state().list(Collection::Characters);
    assert_eq!(list.controller.results.len(), 30);
    assert_eq!(list.controller.results[20].id(), 21);
    assert!(!list.controller.has_more);
    assert!(!list.surface.load_more.visible);
    assert!(store.dispatch(Action::ListLoadMore).effects.is_empty());
}

#[test]
fn test_load_more_error_clears_after_retry() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let first = list_request(&store.dispatch(Action::Init).effects);
    store.dispatch(loaded(&first, page(characters(1..21), 826, Some("next"))));

    let failed = list_request(&store.dispatch(Action::ListLoadMore).effects);
    store.dispatch(Action::ListDidError {
        collection: Collection::Characters,
        generation: failed.generation,
        error: "HTTP error! status: 500".into(),
    });
    assert_eq!(
        store.state().message.as_deref(),
        Some("Could not load more characters: HTTP error! status: 500")
    );

    let retry = list_request(&store.dispatch(Action::ListLoadMore).effects);
    assert_eq!(retry.page, 2);
    store.dispatch(loaded(&retry, page(characters(21..41), 826, Some("next"))));

    assert_eq!(
        store.state().list(Collection::Characters).controller.results.len(),
        40
    );
    assert_eq!(store.state().message, None);
}

#[test]
fn test_filter_restart_clears_load_more_error() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let first = list_request(&store.dispatch(Action::Init).effects);
    store.dispatch(loaded(&first, page(characters(1..21), 826, Some("next"))));

    let failed = list_request(&store.dispatch(Action::ListLoadMore).effects);
    store.dispatch(Action::ListDidError {
        collection: Collection::Characters,
        generation: failed.generation,
        error: "HTTP error! status: 500".into(),
    });
    assert!(store.state().message.is_some());

    let request = list_request(&store.dispatch(Action::FilterCycle(1)).effects);
    assert_eq!(request.page, 1);
    assert_eq!(store.state().message, None);
}

#[test]
fn test_new_search_replaces_results() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let first = list_request(&store.dispatch(Action::Init).effects);
    store.dispatch(loaded(&first, page(characters(1..21), 826, Some("next"))));

    store.dispatch(Action::SearchStart);
    store.dispatch(Action::SearchInput('R'));
    let request = list_request(&store.dispatch(Action::SearchSubmit).effects);
    assert_eq!(request.page, 1);
    assert_eq!(request.filters.get(FilterKey::Name), Some("R"));

    store.dispatch(loaded(&request, page(characters(100..103), 3, None)));
    let list = store.state().list(Collection::Characters);
    let ids: Vec<u32> = list.controller.results.iter().map(Entity::id).collect();
    assert_eq!(ids, vec![100, 101, 102]);
    assert_eq!(list.controller.total, Some(3));
}

#[test]
fn test_stale_list_response_is_dropped() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let stale = list_request(&store.dispatch(Action::Init).effects);

    store.dispatch(Action::SearchStart);
    store.dispatch(Action::SearchInput('M'));
    let fresh = list_request(&store.dispatch(Action::SearchSubmit).effects);
    assert!(fresh.generation > stale.generation);

    let result = store.dispatch(loaded(&stale, page(characters(1..21), 826, Some("next"))));
    assert!(!result.changed);
    assert!(store.state().list(Collection::Characters).controller.is_loading());

    store.dispatch(loaded(&fresh, page(characters(7..9), 2, None)));
    assert_eq!(
        store.state().list(Collection::Characters).controller.results.len(),
        2
    );
}

#[test]
fn test_search_debounces_then_settles_once() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(Action::SearchStart);

    let result = store.dispatch(Action::SearchInput('R'));
    assert_eq!(
        result.effects,
        vec![Effect::DebounceSearch {
            collection: Collection::Characters,
            query: "R".into(),
        }]
    );

    let settle = Action::SearchDidSettle {
        collection: Collection::Characters,
        query: "R".into(),
    };
    let request = list_request(&store.dispatch(settle.clone()).effects);
    assert_eq!(request.filters.get(FilterKey::Name), Some("R"));

    // Same text again is a no-op.
    let again = store.dispatch(settle);
    assert!(!again.changed);
    assert!(again.effects.is_empty());

    // Submitting text that already settled cancels the timer only.
    let submit = store.dispatch(Action::SearchSubmit);
    assert_eq!(
        submit.effects,
        vec![Effect::CancelSearch {
            collection: Collection::Characters
        }]
    );
}

#[test]
fn test_search_cancel_restores_applied_text() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(Action::SearchStart);
    store.dispatch(Action::SearchInput('x'));

    store.dispatch(Action::SearchCancel);
    assert!(!store.state().search.active);
    assert_eq!(store.state().search.query, "");
}

#[test]
fn test_episode_search_picks_code_or_name() {
    let mut store = EffectStore::new(AppState::new(Route::List(Collection::Episodes)), reducer);
    store.dispatch(Action::Init);

    let code = Action::SearchDidSettle {
        collection: Collection::Episodes,
        query: "S01E05".into(),
    };
    let request = list_request(&store.dispatch(code).effects);
    assert_eq!(request.filters.get(FilterKey::Episode), Some("S01E05"));
    assert_eq!(request.filters.get(FilterKey::Name), None);

    let name = Action::SearchDidSettle {
        collection: Collection::Episodes,
        query: "Pilot".into(),
    };
    let request = list_request(&store.dispatch(name).effects);
    assert_eq!(request.filters.get(FilterKey::Name), Some("Pilot"));
    assert_eq!(request.filters.get(FilterKey::Episode), None);
}

#[test]
fn test_inline_select_cycles_through_all() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);

    // Species is the first select on characters.
    let request = list_request(&store.dispatch(Action::FilterCycle(1)).effects);
    assert_eq!(request.filters.get(FilterKey::Species), Some("Human"));

    let request = list_request(&store.dispatch(Action::FilterCycle(-1)).effects);
    assert_eq!(request.filters.get(FilterKey::Species), Some(""));
    assert_eq!(request.filters.active_count(), 0);
}

#[test]
fn test_filter_modal_applies_draft_on_confirm() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let first = list_request(&store.dispatch(Action::Init).effects);
    store.dispatch(loaded(&first, page(characters(1..21), 826, Some("next"))));

    store.dispatch(Action::ModalOpen);
    store.dispatch(Action::ModalMove(2)); // Status
    let cycled = store.dispatch(Action::ModalCycle(2));
    assert!(cycled.effects.is_empty(), "draft edits do not fetch");
    assert_eq!(
        store.state().modal.draft.get(FilterKey::Status),
        Some("Dead")
    );

    let request = list_request(&store.dispatch(Action::ModalApply).effects);
    assert_eq!(request.page, 1);
    assert_eq!(request.filters.get(FilterKey::Status), Some("Dead"));
    assert!(!store.state().modal.open);
    assert_eq!(
        store.state().list(Collection::Characters).controller.status,
        ListStatus::Loading
    );
}

#[test]
fn test_modal_close_discards_draft() {
    let mut store = EffectStore::new(AppState::new(Route::List(Collection::Locations)), reducer);
    store.dispatch(Action::Init);

    store.dispatch(Action::ModalOpen);
    store.dispatch(Action::ModalCycle(1));
    let result = store.dispatch(Action::ModalClose);
    assert!(result.effects.is_empty());
    assert_eq!(
        store
            .state()
            .list(Collection::Locations)
            .controller
            .filters
            .active_count(),
        0
    );
}

#[test]
fn test_episodes_have_no_filter_modal() {
    let mut store = EffectStore::new(AppState::new(Route::List(Collection::Episodes)), reducer);
    store.dispatch(Action::Init);
    assert!(!store.dispatch(Action::ModalOpen).changed);
    assert!(!store.state().modal.open);
}

#[test]
fn test_missing_record_is_not_found_without_related_requests() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let route = Route::parse("character?id=9999&ref=characters").unwrap();
    let request = detail_request(&store.dispatch(Action::Navigate(route)).effects);
    assert_eq!(request.id, 9999);

    let result = store.dispatch(Action::DetailDidLoad {
        generation: request.generation,
        lookup: Lookup::Missing,
    });
    assert!(result.changed);
    assert!(result.effects.is_empty());
    assert_eq!(store.state().detail.status, DetailStatus::NotFound);
}

#[test]
fn test_detail_transport_error_renders_not_found() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let request = detail_request(
        &store
            .dispatch(Action::Navigate(Route::detail(Collection::Locations, 3, "locations")))
            .effects,
    );

    let result = store.dispatch(Action::DetailDidError {
        generation: request.generation,
        error: "HTTP error! status: 500".into(),
    });
    assert!(result.changed);
    assert!(result.effects.is_empty());
    assert_eq!(store.state().detail.status, DetailStatus::NotFound);
    assert!(!store.state().detail.related_loading);
}

#[test]
fn test_stale_detail_error_is_ignored() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let first = detail_request(
        &store
            .dispatch(Action::Navigate(Route::detail(Collection::Episodes, 1, "episodes")))
            .effects,
    );
    store.dispatch(Action::Navigate(Route::detail(Collection::Episodes, 2, "episodes")));

    let result = store.dispatch(Action::DetailDidError {
        generation: first.generation,
        error: "HTTP error! status: 500".into(),
    });
    assert!(!result.changed);
    assert_eq!(store.state().detail.id, Some(2));
    assert_eq!(store.state().detail.status, DetailStatus::Loading);
}

#[test]
fn test_related_error_leaves_empty_list() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let request = detail_request(
        &store
            .dispatch(Action::Navigate(Route::detail(
                Collection::Characters,
                1,
                "characters",
            )))
            .effects,
    );
    let fetch = match store
        .dispatch(Action::DetailDidLoad {
            generation: request.generation,
            lookup: Lookup::Found(character(1, &[1, 2])),
        })
        .effects
        .as_slice()
    {
        [Effect::LoadRelated(fetch)] => fetch.clone(),
        other => panic!("expected related load, got {other:?}"),
    };
    assert!(store.state().detail.related_loading);

    let result = store.dispatch(Action::RelatedDidError {
        generation: fetch.generation,
        error: "error sending request".into(),
    });
    assert!(result.changed);
    assert!(result.effects.is_empty());

    let state = store.state();
    assert_eq!(state.detail.status, DetailStatus::Loaded);
    assert!(state.detail.related.is_empty());
    assert!(!state.detail.related_loading);
    assert_eq!(state.related_selected, 0);
}

#[test]
fn test_invalid_id_skips_the_request() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let route = Route::parse("episode?id=abc").unwrap();

    let result = store.dispatch(Action::Navigate(route));
    assert!(result.effects.is_empty());
    assert_eq!(store.state().detail.status, DetailStatus::NotFound);
}

#[test]
fn test_related_lookup_single_or_batch() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    let request = detail_request(
        &store
            .dispatch(Action::Navigate(Route::detail(
                Collection::Characters,
                1,
                "characters",
            )))
            .effects,
    );
    let result = store.dispatch(Action::DetailDidLoad {
        generation: request.generation,
        lookup: Lookup::Found(character(1, &[28])),
    });
    match result.effects.as_slice() {
        [Effect::LoadRelated(fetch)] => {
            assert_eq!(fetch.collection, Collection::Episodes);
            assert_eq!(fetch.request, RelatedRequest::Single(28));
        }
        other => panic!("expected related load, got {other:?}"),
    }

    let request = detail_request(
        &store
            .dispatch(Action::Navigate(Route::detail(
                Collection::Characters,
                2,
                "characters",
            )))
            .effects,
    );
    let result = store.dispatch(Action::DetailDidLoad {
        generation: request.generation,
        lookup: Lookup::Found(character(2, &[1, 2, 3])),
    });
    match result.effects.as_slice() {
        [Effect::LoadRelated(fetch)] => {
            assert_eq!(fetch.request, RelatedRequest::Batch(vec![1, 2, 3]));
            store.dispatch(Action::RelatedDidLoad {
                generation: fetch.generation,
                records: vec![episode(1), episode(2), episode(3)],
            });
        }
        other => panic!("expected related load, got {other:?}"),
    }
    let detail = &store.state().detail;
    assert!(!detail.related_loading);
    assert_eq!(detail.related.len(), 3);
}

#[test]
fn test_stale_detail_response_is_dropped() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let first = detail_request(
        &store
            .dispatch(Action::Navigate(Route::detail(Collection::Episodes, 1, "episodes")))
            .effects,
    );
    store.dispatch(Action::Navigate(Route::detail(Collection::Episodes, 2, "episodes")));

    let result = store.dispatch(Action::DetailDidLoad {
        generation: first.generation,
        lookup: Lookup::Found(episode(1)),
    });
    assert!(!result.changed);
    assert_eq!(store.state().detail.id, Some(2));
    assert_eq!(store.state().detail.status, DetailStatus::Loading);
}

#[test]
fn test_open_selected_and_back() {
    let mut store = EffectStore::new(AppState::new(Route::List(Collection::Episodes)), reducer);
    let first = list_request(&store.dispatch(Action::Init).effects);
    store.dispatch(loaded(&first, page(vec![episode(1), episode(2)], 2, None)));

    store.dispatch(Action::SelectionMove(1));
    let request = detail_request(&store.dispatch(Action::OpenSelected).effects);
    assert_eq!(request.collection, Collection::Episodes);
    assert_eq!(request.id, 2);
    assert_eq!(
        store.state().route,
        Route::Detail {
            collection: Collection::Episodes,
            query: "id=2&ref=episodes".into(),
        }
    );

    // The list was loaded before, so going back shows it without a refetch.
    let back = store.dispatch(Action::NavigateBack);
    assert!(back.effects.is_empty());
    assert_eq!(store.state().route, Route::List(Collection::Episodes));
    assert_eq!(store.state().list(Collection::Episodes).selected, 1);
}

#[test]
fn test_related_record_links_back_to_its_referrer() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let request = detail_request(
        &store
            .dispatch(Action::Navigate(Route::detail(
                Collection::Characters,
                1,
                "characters",
            )))
            .effects,
    );
    let fetch = match store
        .dispatch(Action::DetailDidLoad {
            generation: request.generation,
            lookup: Lookup::Found(character(1, &[1, 2])),
        })
        .effects
        .as_slice()
    {
        [Effect::LoadRelated(fetch)] => fetch.clone(),
        other => panic!("expected related load, got {other:?}"),
    };
    store.dispatch(Action::RelatedDidLoad {
        generation: fetch.generation,
        records: vec![episode(1), episode(2)],
    });

    store.dispatch(Action::RelatedSelect(1));
    store.dispatch(Action::OpenSelected);
    assert_eq!(
        store.state().route,
        Route::Detail {
            collection: Collection::Episodes,
            query: "id=2&ref=character_1".into(),
        }
    );

    let back = store.dispatch(Action::NavigateBack);
    let request = detail_request(&back.effects);
    assert_eq!(request.collection, Collection::Characters);
    assert_eq!(request.id, 1);
}

#[test]
fn test_location_shortcut_opens_character_location() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let request = detail_request(
        &store
            .dispatch(Action::Navigate(Route::detail(
                Collection::Characters,
                5,
                "characters",
            )))
            .effects,
    );
    store.dispatch(Action::DetailDidLoad {
        generation: request.generation,
        lookup: Lookup::Found(character(5, &[])),
    });

    let request = detail_request(&store.dispatch(Action::LocationOpen).effects);
    assert_eq!(request.collection, Collection::Locations);
    assert_eq!(request.id, 1);
}
