pub mod catalog_list;
pub mod detail_view;
pub mod filter_overlay;
pub mod footer;
pub mod search_bar;
pub mod theme;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_list::{card_line, CatalogList, CatalogListProps};
pub use detail_view::{DetailView, DetailViewProps};
pub use filter_overlay::{FilterOverlay, FilterOverlayProps};
pub use footer::render_footer;
pub use search_bar::{SearchBar, SearchBarProps};
