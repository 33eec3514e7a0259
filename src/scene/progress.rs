use glam::{IVec2, UVec2};

use crate::core::Framebuffer;

const FILL: [u8; 4] = [255, 0, 0, 255];
const TRACK: [u8; 4] = [0, 0, 0, 96];
const FRAME: [u8; 4] = [255, 255, 255, 255];

/// Horizontal 0..=100 gauge drawn into the primary framebuffer
#[derive(Debug, Clone)]
pub struct ProgressBar {
    origin: IVec2,
    size: UVec2,
    value: u8,
}

impl ProgressBar {
    pub const WIDTH: u32 = 200;
    pub const HEIGHT: u32 = 24;
    pub const MARGIN: i32 = 10;

    pub fn new(origin: IVec2, size: UVec2) -> Self {
        Self {
            origin,
            size,
            value: 0,
        }
    }

    /// Default bar in the top-right corner of a `viewport_width` wide screen
    pub fn top_right(viewport_width: u32) -> Self {
        let x = viewport_width as i32 - Self::WIDTH as i32 - Self::MARGIN;
        Self::new(
            IVec2::new(x, Self::MARGIN),
            UVec2::new(Self::WIDTH, Self::HEIGHT),
        )
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Set the displayed percentage, truncated and clamped to 0..=100.
    /// Returns true when the displayed value changed.
    pub fn set_value(&mut self, percent: f32) -> bool {
        let value = if percent.is_nan() {
            0
        } else {
            percent.clamp(0.0, 100.0) as u8
        };
        let changed = value != self.value;
        self.value = value;
        changed
    }

    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Width in pixels of the filled part, inside the frame
    pub fn fill_width(&self) -> u32 {
        let inner = self.size.x.saturating_sub(2);
        inner * self.value as u32 / 100
    }

    pub fn draw(&self, target: &mut Framebuffer) {
        let inner_origin = self.origin + IVec2::ONE;
        let inner_size = self.size.saturating_sub(UVec2::splat(2));

        target.fill_rect(inner_origin, inner_size, TRACK);
        target.fill_rect(
            inner_origin,
            UVec2::new(self.fill_width(), inner_size.y),
            FILL,
        );
        target.stroke_rect(self.origin, self.size, FRAME);
    }
}
