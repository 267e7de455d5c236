//! Rick and Morty catalog TUI

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame, Terminal,
};
use rmapi::action::Action;
use rmapi::api::{CatalogClient, SharedClient, API_BASE};
use rmapi::components::{
    render_footer, theme, CatalogList, CatalogListProps, Component, DetailView, DetailViewProps,
    FilterOverlay, FilterOverlayProps, SearchBar, SearchBarProps,
};
use rmapi::controller::RelatedRequest;
use rmapi::effect::Effect;
use rmapi::logging;
use rmapi::model::Collection;
use rmapi::reducer::reducer;
use rmapi::route::Route;
use rmapi::state::{AppState, SEARCH_DEBOUNCE_MS};
use rmapi::surface::TICK_MS;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_components::StatusBar;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Browse characters, locations and episodes of the Rick and Morty API
#[derive(Parser, Debug)]
#[command(name = "rmapi")]
#[command(about = "Rick and Morty catalog browser for the terminal")]
struct Args {
    /// API root the collections live under
    #[arg(long, env = "RMAPI_BASE_URL", default_value = API_BASE)]
    base_url: String,

    /// Page to start on, e.g. `locations` or `character?id=1`
    #[arg(long, default_value = "characters", value_parser = parse_route)]
    open: Route,

    /// Append tracing output to this file
    #[arg(long, env = "RMAPI_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `rmapi=trace` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

fn parse_route(value: &str) -> Result<Route, String> {
    Route::parse(value).ok_or_else(|| format!("unknown page `{value}`"))
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum CatalogComponentId {
    List,
    Detail,
    Search,
    Filters,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum CatalogContext {
    List,
    Detail,
    Search,
    Filters,
}

impl EventRoutingState<CatalogComponentId, CatalogContext> for AppState {
    fn focused(&self) -> Option<CatalogComponentId> {
        if let Some(modal) = self.modal() {
            return Some(modal);
        }
        if self.is_detail() {
            Some(CatalogComponentId::Detail)
        } else {
            Some(CatalogComponentId::List)
        }
    }

    fn modal(&self) -> Option<CatalogComponentId> {
        if self.modal.open {
            Some(CatalogComponentId::Filters)
        } else if self.search.active {
            Some(CatalogComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: CatalogComponentId) -> CatalogContext {
        match id {
            CatalogComponentId::List => CatalogContext::List,
            CatalogComponentId::Detail => CatalogContext::Detail,
            CatalogComponentId::Search => CatalogContext::Search,
            CatalogComponentId::Filters => CatalogContext::Filters,
        }
    }

    fn default_context(&self) -> CatalogContext {
        CatalogContext::List
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        base_url,
        open,
        log_file,
        log_level,
        debug: debug_args,
    } = Args::parse();

    logging::init(log_file.as_deref(), log_level.as_deref())?;
    tracing::info!(%base_url, route = ?open, "starting");

    let debug = DebugSession::new(debug_args);
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(open))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);
    let client: SharedClient = Arc::new(CatalogClient::new(base_url));

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, client, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("exited");
    Ok(())
}

struct CatalogUi {
    list: CatalogList,
    detail: DetailView,
    search: SearchBar,
    filters: FilterOverlay,
    status_bar: StatusBar,
}

impl CatalogUi {
    fn new() -> Self {
        Self {
            list: CatalogList::new(),
            detail: DetailView::new(),
            search: SearchBar,
            filters: FilterOverlay::new(),
            status_bar: StatusBar::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<CatalogComponentId>,
    ) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_BASE)),
            area,
        );
        let search_height = if state.search.active { 3 } else { 0 };
        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(search_height),
            Constraint::Length(3),
        ])
        .split(area);

        render_sections(frame, chunks[0], state);

        let body_focused = render_ctx.is_focused() && state.modal().is_none();
        if let Route::List(collection) = &state.route {
            event_ctx.set_component_area(CatalogComponentId::List, chunks[1]);
            event_ctx.component_areas.remove(&CatalogComponentId::Detail);
            let props = CatalogListProps {
                page: state.list(*collection),
                search: &state.search,
                is_focused: body_focused,
            };
            self.list.render(frame, chunks[1], props);
        } else {
            event_ctx.set_component_area(CatalogComponentId::Detail, chunks[1]);
            event_ctx.component_areas.remove(&CatalogComponentId::List);
            let props = DetailViewProps {
                detail: &state.detail,
                related_selected: state.related_selected,
                tick: state.tick,
                is_focused: body_focused,
            };
            self.detail.render(frame, chunks[1], props);
        }

        if state.search.active {
            event_ctx.set_component_area(CatalogComponentId::Search, chunks[2]);
            let props = SearchBarProps {
                collection: state.collection(),
                search: &state.search,
                is_focused: render_ctx.is_focused(),
            };
            self.search.render(frame, chunks[2], props);
        } else {
            event_ctx.component_areas.remove(&CatalogComponentId::Search);
        }

        render_footer(frame, chunks[3], state, &mut self.status_bar);

        if state.modal.open {
            event_ctx.set_component_area(CatalogComponentId::Filters, area);
            let props = FilterOverlayProps {
                collection: state.collection(),
                modal: &state.modal,
                is_focused: render_ctx.is_focused(),
            };
            self.filters.render(frame, area, props);
        } else {
            event_ctx.component_areas.remove(&CatalogComponentId::Filters);
        }
    }

    fn handle_list_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let Some(page) = state.current_list() else {
            return HandlerResponse::ignored();
        };
        let props = CatalogListProps {
            page,
            search: &state.search,
            is_focused: true,
        };
        let actions: Vec<_> = self.list.handle_event(event, props).into_iter().collect();
        respond(actions)
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DetailViewProps {
            detail: &state.detail,
            related_selected: state.related_selected,
            tick: state.tick,
            is_focused: true,
        };
        let actions: Vec<_> = self.detail.handle_event(event, props).into_iter().collect();
        respond(actions)
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = SearchBarProps {
            collection: state.collection(),
            search: &state.search,
            is_focused: true,
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_filters_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = FilterOverlayProps {
            collection: state.collection(),
            modal: &state.modal,
            is_focused: true,
        };
        let actions: Vec<_> = self.filters.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn respond(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_sections(frame: &mut Frame, area: Rect, state: &AppState) {
    let titles: Vec<Line> = Collection::ALL
        .iter()
        .enumerate()
        .map(|(index, collection)| Line::from(format!("{} {}", index + 1, collection.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.collection().index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border_style(false))
                .title(" Rick and Morty "),
        )
        .style(Style::default().fg(theme::TEXT_DIM).bg(theme::BG_PANEL))
        .highlight_style(theme::title_style().add_modifier(Modifier::UNDERLINED));
    frame.render_widget(tabs, area);
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    client: SharedClient,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(CatalogUi::new()));
    let mut bus: EventBus<AppState, Action, CatalogComponentId, CatalogContext> = EventBus::new();
    let keybindings: Keybindings<CatalogContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(CatalogComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(CatalogComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(CatalogComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_filters = Rc::clone(&ui);
    bus.register(CatalogComponentId::Filters, move |event, state| {
        ui_filters
            .borrow_mut()
            .handle_filters_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if state.modal().is_none() => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            KeyCode::Char(digit @ '1'..='3') => {
                let index = digit as usize - '1' as usize;
                HandlerResponse::action(Action::Navigate(Route::List(Collection::ALL[index])))
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &client),
        )
        .await
}

/// Handle effects by spawning tasks. Each controller owns one task key, so a
/// new request replaces whatever it had in flight.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: &SharedClient) {
    let key = TaskKey::new(effect.task_key());
    match effect {
        Effect::FetchList(request) => {
            let client = Arc::clone(client);
            ctx.tasks().spawn(key, async move {
                let collection = request.collection;
                let generation = request.generation;
                match client.list(collection, request.page, &request.filters).await {
                    Ok(page) => Action::ListDidLoad {
                        collection,
                        generation,
                        page,
                    },
                    Err(error) => Action::ListDidError {
                        collection,
                        generation,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::DebounceSearch { collection, query } => {
            ctx.tasks().debounce(
                key,
                Duration::from_millis(SEARCH_DEBOUNCE_MS),
                async move { Action::SearchDidSettle { collection, query } },
            );
        }
        Effect::CancelSearch { .. } => {
            ctx.tasks().cancel(&key);
        }
        Effect::LoadDetail(request) => {
            let client = Arc::clone(client);
            ctx.tasks().spawn(key, async move {
                let generation = request.generation;
                match client.get(request.collection, request.id).await {
                    Ok(lookup) => Action::DetailDidLoad { generation, lookup },
                    Err(error) => Action::DetailDidError {
                        generation,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadRelated(fetch) => {
            let client = Arc::clone(client);
            ctx.tasks().spawn(key, async move {
                let generation = fetch.generation;
                let records = match fetch.request {
                    RelatedRequest::Single(id) => client
                        .get(fetch.collection, id)
                        .await
                        .map(|lookup| lookup.found().into_iter().collect()),
                    RelatedRequest::Batch(ids) => client.get_many(fetch.collection, &ids).await,
                };
                match records {
                    Ok(records) => Action::RelatedDidLoad {
                        generation,
                        records,
                    },
                    Err(error) => Action::RelatedDidError {
                        generation,
                        error: error.to_string(),
                    },
                }
            });
        }
    }
}
