//! Scene items bound to overlay planes and the drag interaction driving them

pub mod item;
pub mod parallax;
pub mod progress;

pub use item::{to_plane_position, PlaneBackedItem};
pub use parallax::{propose_move, DragState, ParallaxController, DEFAULT_WEIGHTS};
pub use progress::ProgressBar;
