pub mod cli;
pub mod core;
pub mod cpu;
pub mod demo;
pub mod loaders;
pub mod plane;
pub mod scene;

pub use demo::SpaceTouch;
