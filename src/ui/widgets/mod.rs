//! Custom-drawn progress widgets.
//!
//! Both widgets follow the same host protocol:
//! - construction from defaults, optionally overridden once by a style source
//! - `set_*` property writes, each ending in one redraw request
//! - `measure` against the host's constraints, then `paint` onto a canvas
//! - `save_state` / `restore_state` across a rebuild of the host UI

pub mod arc;
pub mod line;
pub mod progress;

pub use arc::ArcProgressBar;
pub use line::{FillShape, LineProgressBar};
pub use progress::{progress_fraction, Progress};
