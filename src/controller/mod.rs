//! Page controllers: explicit state plus transition methods. They never touch
//! the network; transitions hand back requests for the reducer to turn into
//! effects.

pub mod detail;
pub mod list;

pub use detail::{DetailController, DetailStatus, PrimaryRequest, RelatedFetch, RelatedRequest};
pub use list::{ListController, ListRequest, ListStatus};
