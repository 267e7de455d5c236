use serde::{Deserialize, Serialize};

use crate::model::{Collection, Entity, Lookup, Page};
use crate::route::Route;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    Navigate(Route),
    NavigateBack,

    ListLoadMore,
    ListReload,
    ListDidLoad {
        collection: Collection,
        generation: u64,
        page: Page,
    },
    ListDidError {
        collection: Collection,
        generation: u64,
        error: String,
    },

    SelectionMove(i16),
    ListSelect(usize),
    RelatedSelect(usize),
    OpenSelected,

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,
    SearchDidSettle {
        collection: Collection,
        query: String,
    },

    FilterFocusNext,
    FilterCycle(i16),

    ModalOpen,
    ModalClose,
    ModalMove(i16),
    ModalCycle(i16),
    ModalReset,
    ModalApply,

    DetailDidLoad {
        generation: u64,
        lookup: Lookup<Entity>,
    },
    DetailDidError {
        generation: u64,
        error: String,
    },
    RelatedDidLoad {
        generation: u64,
        records: Vec<Entity>,
    },
    RelatedDidError {
        generation: u64,
        error: String,
    },
    LocationOpen,

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
