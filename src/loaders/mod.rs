pub mod media;

pub use media::{backdrop, fit_keep_aspect, load_image, scale_to_width, MediaSet, LAYER_COUNT};
