//! Terminal rendering.
//!
//! Rendering is split in two steps. [`viewmodel::compute_viewmodel`] reads the
//! session state and decides what is on screen; [`render`] turns that
//! description into ANSI text sized to the terminal. Nothing here touches the
//! registry or mutates state.
//!
//! ```text
//! AppState ──compute_viewmodel──▶ UIViewModel ──render──▶ frame bytes
//! ```

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{Body, EmptyState, FooterInfo, HeaderInfo, Overlay, SearchBarInfo, UIViewModel};
