//! Rendering contract the list controllers drive, and its terminal
//! implementation.
//!
//! Controllers never draw. After a transition they tell a [`RenderSurface`]
//! what changed; [`ListSurface`] records that as plain state which the list
//! component reads on every frame.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::model::Collection;

/// Delay between two cards of a staggered entrance.
pub const STAGGER_MS: u64 = 100;
/// Duration of one `Tick` action.
pub const TICK_MS: u64 = 50;
/// Ghost shimmer period, in ticks.
pub const SHIMMER_TICKS: u64 = 30;

pub trait RenderSurface {
    /// Replace the content with `count` ghost cards of `kind`.
    fn show_placeholder(&mut self, kind: Collection, count: usize);
    fn remove_placeholder(&mut self);
    /// Show the accumulated records; `total` is the accumulator length.
    fn render_list(&mut self, total: usize);
    /// Reveal `range` of the accumulator one card at a time.
    fn animate_entrance(&mut self, range: Range<usize>);
    fn show_no_results(&mut self);
    /// Only called when nothing has been shown yet.
    fn show_error(&mut self, message: &str);
    /// Reflect the loading flag and remaining pages on the load-more control.
    fn set_load_more(&mut self, loading: bool, visible: bool);
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceView {
    #[default]
    Blank,
    Items,
    NoResults,
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub kind: Collection,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrance {
    pub first: usize,
    pub len: usize,
    /// Tick at which the first card starts to appear.
    pub started_at: u64,
}

/// State of the load-more control below the list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadMore {
    pub visible: bool,
    pub loading: bool,
}

impl LoadMore {
    pub fn label(&self) -> &'static str {
        if self.loading {
            "Loading..."
        } else {
            "Load more"
        }
    }
}

impl Default for LoadMore {
    fn default() -> Self {
        Self {
            visible: false,
            loading: false,
        }
    }
}

/// Terminal render state of one list page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSurface {
    pub view: SurfaceView,
    pub placeholder: Option<Placeholder>,
    pub entrance: Option<Entrance>,
    pub load_more: LoadMore,
    pub shown: usize,
    /// Current animation clock, advanced by `Tick`.
    pub tick: u64,
}

impl ListSurface {
    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(entrance) = &self.entrance {
            if self.tick.saturating_sub(entrance.started_at) > entrance_ticks(entrance.len) {
                self.entrance = None;
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.placeholder.is_some() || self.entrance.is_some()
    }

    /// Whether card `index` of the accumulator is visible yet.
    pub fn is_revealed(&self, index: usize) -> bool {
        let Some(entrance) = &self.entrance else {
            return true;
        };
        if index < entrance.first {
            return true;
        }
        let offset = (index - entrance.first) as u64;
        let elapsed_ms = self.tick.saturating_sub(entrance.started_at) * TICK_MS;
        elapsed_ms >= offset * STAGGER_MS
    }

    /// Position of the shimmer highlight, `0.0..1.0`.
    pub fn shimmer_phase(&self) -> f32 {
        (self.tick % SHIMMER_TICKS) as f32 / SHIMMER_TICKS as f32
    }
}

fn entrance_ticks(len: usize) -> u64 {
    (len as u64 * STAGGER_MS).div_ceil(TICK_MS)
}

impl RenderSurface for ListSurface {
    fn show_placeholder(&mut self, kind: Collection, count: usize) {
        self.placeholder = Some(Placeholder { kind, count });
        self.entrance = None;
        self.view = SurfaceView::Blank;
        self.shown = 0;
    }

    fn remove_placeholder(&mut self) {
        self.placeholder = None;
    }

    fn render_list(&mut self, total: usize) {
        self.view = SurfaceView::Items;
        self.shown = total;
    }

    fn animate_entrance(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        self.entrance = Some(Entrance {
            first: range.start,
            len: range.len(),
            started_at: self.tick,
        });
    }

    fn show_no_results(&mut self) {
        self.view = SurfaceView::NoResults;
        self.entrance = None;
        self.shown = 0;
        self.load_more.visible = false;
    }

    fn show_error(&mut self, message: &str) {
        self.view = SurfaceView::Error(message.to_string());
        self.entrance = None;
    }

    fn set_load_more(&mut self, loading: bool, visible: bool) {
        self.load_more = LoadMore { visible, loading };
    }
}
