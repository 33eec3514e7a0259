pub mod controller;
pub mod display_context;
pub mod framebuffer;
pub mod gpu_context;
pub mod input_adapter;
pub mod quad_pipeline;
pub mod rect;
pub mod surface_renderer;
pub mod timer;

pub use controller::{Button, InputEvent, PointerEvent, PointerPhase};
pub use display_context::DisplayContext;
pub use framebuffer::Framebuffer;
pub use gpu_context::{AdapterChoice, GpuContext, WindowSurface};
pub use input_adapter::WinitInput;
pub use quad_pipeline::{Placement, QuadPipeline, TexturedQuad};
pub use rect::Rect;
pub use surface_renderer::SurfaceRenderer;
pub use timer::{Clock, FixedHz};
