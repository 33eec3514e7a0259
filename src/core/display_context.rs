use glam::{UVec2, Vec2};

use super::rect::Rect;

/// Display context - the fixed viewport everything is composited into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DisplayContext {
    /// Create new display context
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Total size in bytes for RGBA buffer
    pub fn buffer_size(&self) -> usize {
        self.pixel_count() * 4
    }

    /// Viewport rectangle in scene coordinates
    pub fn rect(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.size().as_vec2())
    }

    /// Region dragged layers may occupy: the viewport grown by half its
    /// width and half its height on every side
    pub fn drag_bounds(&self) -> Rect {
        let size = self.size().as_vec2();
        Rect::new(-size * 0.5, size * 2.0)
    }
}
