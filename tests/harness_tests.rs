//! Store, component and render checks combined through
//! `EffectStoreTestHarness`.

use rmapi::{
    action::Action,
    components::{CatalogList, CatalogListProps, Component, DetailView, DetailViewProps},
    effect::Effect,
    model::{Collection, Entity, Location, Lookup, Page, PageInfo},
    reducer::reducer,
    route::Route,
    state::AppState,
};
use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;

fn location(id: u32, residents: usize) -> Entity {
    Entity::Location(Location {
        id,
        name: format!("Location {id}"),
        kind: Some("Planet".into()),
        dimension: None,
        residents: (1..=residents)
            .map(|id| format!("https://rickandmortyapi.com/api/character/{id}"))
            .collect(),
    })
}

fn locations_page(next: bool) -> Page {
    Page {
        info: PageInfo {
            count: 126,
            pages: 7,
            next: next.then(|| "https://rickandmortyapi.com/api/location?page=2".into()),
            prev: None,
        },
        results: (1..=20).map(|id| location(id, 2)).collect(),
    }
}

fn list_generation(effects: Vec<Effect>) -> u64 {
    effects.effects_count(1);
    match &effects[0] {
        Effect::FetchList(request) => request.generation,
        other => panic!("expected list fetch, got {other:?}"),
    }
}

#[test]
fn test_list_load_flow() {
    let mut harness =
        EffectStoreTestHarness::new(AppState::new(Route::List(Collection::Locations)), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.list(Collection::Locations).controller.is_loading());
    let generation = list_generation(harness.drain_effects());

    harness.complete_action(Action::ListDidLoad {
        collection: Collection::Locations,
        generation,
        page: locations_page(true),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| s.list(Collection::Locations).controller.results.len() == 20);
    harness.assert_state(|s| s.list(Collection::Locations).surface.load_more.visible);
}

#[test]
fn test_error_then_retry() {
    let mut harness =
        EffectStoreTestHarness::new(AppState::new(Route::List(Collection::Locations)), reducer);

    harness.dispatch_collect(Action::Init);
    let generation = list_generation(harness.drain_effects());
    harness.complete_action(Action::ListDidError {
        collection: Collection::Locations,
        generation,
        error: "HTTP error! status: 500".into(),
    });
    harness.process_emitted();
    harness.assert_state(|s| !s.list(Collection::Locations).controller.is_loading());

    harness.dispatch_collect(Action::ListReload);
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::FetchList(request) if request.page == 1));
}

#[test]
fn test_keyboard_loads_more() {
    let mut harness =
        EffectStoreTestHarness::new(AppState::new(Route::List(Collection::Locations)), reducer);
    harness.dispatch_collect(Action::Init);
    let generation = list_generation(harness.drain_effects());
    harness.dispatch_collect(Action::ListDidLoad {
        collection: Collection::Locations,
        generation,
        page: locations_page(true),
    });

    let mut component = CatalogList::new();
    let actions = harness.send_keys::<NumericComponentId, _, _>("m", |state, event| {
        let props = CatalogListProps {
            page: state.list(Collection::Locations),
            search: &state.search,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_count(1);
    actions.assert_first(Action::ListLoadMore);

    for action in actions {
        harness.dispatch_collect(action);
    }
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::FetchList(request) if request.page == 2));
}

#[test]
fn test_render_list_after_load() {
    let mut harness =
        EffectStoreTestHarness::new(AppState::new(Route::List(Collection::Locations)), reducer);
    harness.dispatch_collect(Action::Init);
    let generation = list_generation(harness.drain_effects());
    harness.dispatch_collect(Action::ListDidLoad {
        collection: Collection::Locations,
        generation,
        page: locations_page(false),
    });
    // Let the entrance animation finish.
    for _ in 0..60 {
        harness.dispatch_collect(Action::Tick);
    }

    let mut component = CatalogList::new();
    let output = harness.render_plain(80, 30, |frame, area, state| {
        let props = CatalogListProps {
            page: state.list(Collection::Locations),
            search: &state.search,
            is_focused: true,
        };
        component.render(frame, area, props);
    });

    assert!(output.contains("LOCATIONS"));
    assert!(output.contains("Location 1"));
    assert!(output.contains("All 20 locations loaded"));
}

#[test]
fn test_render_detail_with_residents() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Navigate(Route::detail(
        Collection::Locations,
        3,
        "locations",
    )));
    let effects = harness.drain_effects();
    let generation = match &effects[0] {
        Effect::LoadDetail(request) => request.generation,
        other => panic!("expected detail load, got {other:?}"),
    };

    harness.dispatch_collect(Action::DetailDidLoad {
        generation,
        lookup: Lookup::Found(location(3, 0)),
    });
    harness.assert_state(|s| !s.detail.related_loading);

    let mut view = DetailView::new();
    let output = harness.render_plain(80, 24, |frame, area, state| {
        let props = DetailViewProps {
            detail: &state.detail,
            related_selected: state.related_selected,
            tick: state.tick,
            is_focused: true,
        };
        view.render(frame, area, props);
    });

    assert!(output.contains("Location 3"));
    assert!(output.contains("Planet"));
    assert!(output.contains("No residents to show."));
}
