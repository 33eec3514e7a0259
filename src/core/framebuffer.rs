use glam::{IVec2, UVec2};

/// RGBA pixel buffer with simple software blitting
///
/// Every mutation bumps the revision so consumers (plane devices) can skip
/// re-uploading an unchanged buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    revision: u64,
}

impl Framebuffer {
    /// Create a fully transparent framebuffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
            revision: 0,
        }
    }

    /// Wrap existing RGBA data; `None` when the length does not match
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            pixels,
            width,
            height,
            revision: 0,
        })
    }

    pub fn from_image(image: &image::RgbaImage) -> Self {
        Self {
            pixels: image.as_raw().clone(),
            width: image.width(),
            height: image.height(),
            revision: 0,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Read one pixel, `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0; 4];
        px.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(px)
    }

    /// Fill the whole buffer with one color
    pub fn clear(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
        self.revision += 1;
    }

    /// Replace the whole contents with another buffer of the same size
    pub fn copy_from(&mut self, other: &Framebuffer) {
        if other.size() == self.size() {
            self.pixels.copy_from_slice(&other.pixels);
        } else {
            self.pixels.fill(0);
            self.blit(other.pixels(), other.size(), IVec2::ZERO);
        }
        self.revision += 1;
    }

    /// Fill a rectangle, blending `color` over the existing contents
    pub fn fill_rect(&mut self, origin: IVec2, size: UVec2, color: [u8; 4]) {
        let Some((x0, y0, x1, y1)) = self.clip(origin, size) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = (y as usize * self.width as usize + x as usize) * 4;
                blend_over(&mut self.pixels[idx..idx + 4], &color);
            }
        }
        self.revision += 1;
    }

    /// Draw a one pixel wide rectangle outline
    pub fn stroke_rect(&mut self, origin: IVec2, size: UVec2, color: [u8; 4]) {
        if size.x == 0 || size.y == 0 {
            return;
        }
        let (w, h) = (size.x as i32, size.y as i32);
        self.fill_rect(origin, UVec2::new(size.x, 1), color);
        self.fill_rect(origin + IVec2::new(0, h - 1), UVec2::new(size.x, 1), color);
        self.fill_rect(origin, UVec2::new(1, size.y), color);
        self.fill_rect(origin + IVec2::new(w - 1, 0), UVec2::new(1, size.y), color);
    }

    /// Alpha-blend `src` (RGBA, `src_size`) with its top-left corner at `at`.
    /// Parts falling outside the buffer are clipped.
    pub fn blit(&mut self, src: &[u8], src_size: UVec2, at: IVec2) {
        debug_assert_eq!(src.len(), src_size.x as usize * src_size.y as usize * 4);
        let Some((x0, y0, x1, y1)) = self.clip(at, src_size) else {
            return;
        };
        let row_len = (x1 - x0) as usize * 4;
        for y in y0..y1 {
            let sy = (y - at.y) as usize;
            let sx = (x0 - at.x) as usize;
            let src_start = (sy * src_size.x as usize + sx) * 4;
            let dst_start = (y as usize * self.width as usize + x0 as usize) * 4;
            let src_row = &src[src_start..src_start + row_len];
            let dst_row = &mut self.pixels[dst_start..dst_start + row_len];
            for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                blend_over(d, s);
            }
        }
        self.revision += 1;
    }

    /// Repeat `src` across the whole buffer starting at the origin
    pub fn tile(&mut self, src: &Framebuffer) {
        let (w, h) = src.dimensions();
        if w == 0 || h == 0 {
            return;
        }
        for ty in (0..self.height).step_by(h as usize) {
            for tx in (0..self.width).step_by(w as usize) {
                self.blit(src.pixels(), src.size(), IVec2::new(tx as i32, ty as i32));
            }
        }
    }

    /// Intersect a rectangle with the buffer bounds, as (x0, y0, x1, y1)
    fn clip(&self, origin: IVec2, size: UVec2) -> Option<(i32, i32, i32, i32)> {
        let x0 = origin.x.max(0);
        let y0 = origin.y.max(0);
        let x1 = (origin.x as i64 + size.x as i64).min(self.width as i64) as i32;
        let y1 = (origin.y as i64 + size.y as i64).min(self.height as i64) as i32;
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

/// Straight-alpha source-over
fn blend_over(dst: &mut [u8], src: &[u8]) {
    let a = src[3] as u32;
    match a {
        0 => {}
        255 => dst.copy_from_slice(src),
        _ => {
            let inv = 255 - a;
            for c in 0..3 {
                dst[c] = ((src[c] as u32 * a + dst[c] as u32 * inv + 127) / 255) as u8;
            }
            dst[3] = (a + (dst[3] as u32 * inv + 127) / 255) as u8;
        }
    }
}
