//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to the layout in [`components`]
//!
//! Output goes to any [`Write`] so frames can be captured in tests; the
//! session runtime passes a buffered stdout.
//!
//! # Example
//!
//! ```rust
//! use modstash::app::AppState;
//! use modstash::ui::{render, Theme};
//!
//! let state = AppState::new(Theme::default());
//! let mut frame = Vec::new();
//! render(&mut frame, &state, 24, 80)?;
//! assert!(String::from_utf8_lossy(&frame).contains("modstash"));
//! # Ok::<(), std::io::Error>(())
//! ```

use crate::app::AppState;
use crate::ui::components;
use std::io::{self, Write};

/// Renders one frame of the session UI.
///
/// Does not clear the screen; the caller owns terminal control.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn render<W: Write>(out: &mut W, state: &AppState, rows: usize, cols: usize) -> io::Result<()> {
    let viewmodel = state.compute_viewmodel(rows, cols);
    components::render_layout(out, &viewmodel, &state.theme, rows, cols)
}
