//! Rick and Morty catalog TUI built on tui-dispatch.
//!
//! The library exposes the app's modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod controller;
pub mod effect;
pub mod filter;
pub mod logging;
pub mod model;
pub mod reducer;
pub mod route;
pub mod state;
pub mod surface;
