use anyhow::{Context, Result};
use glam::{IVec2, UVec2};
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;

use crate::core::Framebuffer;

/// Number of parallax layers the demo ships art for
pub const LAYER_COUNT: usize = 3;

/// Decoded demo artwork
#[derive(Debug, Clone)]
pub struct MediaSet {
    /// Full-screen backdrop (`plane0.png`)
    pub background: RgbaImage,
    /// Parallax layers, back to front (`plane1.png` .. `plane3.png`)
    pub layers: Vec<RgbaImage>,
    /// Corner logo (`logo.png`); the demo runs without one
    pub logo: Option<RgbaImage>,
}

impl MediaSet {
    /// Load the artwork from `dir`.
    ///
    /// Missing files are replaced by generated stand-ins so the demo still
    /// runs from a bare checkout. Files that exist but fail to decode are an
    /// error.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let background = match load_optional(&dir.join("plane0.png"))? {
            Some(image) => image,
            None => placeholder_background(UVec2::new(800, 480)),
        };

        let layers = (1..=LAYER_COUNT)
            .map(|i| {
                let loaded = load_optional(&dir.join(format!("plane{}.png", i)))?;
                Ok(loaded.unwrap_or_else(|| placeholder_layer(i, UVec2::new(800, 480))))
            })
            .collect::<Result<Vec<_>>>()?;

        let logo = load_optional(&dir.join("logo.png"))?;

        log::info!(
            "media from {}: background {}x{}, {} layers, logo: {}",
            dir.display(),
            background.width(),
            background.height(),
            layers.len(),
            logo.is_some()
        );
        Ok(Self {
            background,
            layers,
            logo,
        })
    }
}

/// Decode an image file to RGBA
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let path = path.as_ref();
    let image = image::open(path).context(format!("Failed to load image: {:?}", path))?;
    Ok(image.to_rgba8())
}

fn load_optional(path: &Path) -> Result<Option<RgbaImage>> {
    if !path.exists() {
        log::warn!("{} not found, using generated artwork", path.display());
        return Ok(None);
    }
    load_image(path).map(Some)
}

/// Scale to `width` keeping the aspect ratio, placed top-left in a buffer of
/// the plane's `size`. Rows past the plane are cropped; uncovered rows stay
/// transparent.
pub fn scale_to_width(image: &RgbaImage, width: u32, size: UVec2) -> Framebuffer {
    let mut frame = Framebuffer::new(size.x, size.y);
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 || width == 0 {
        return frame;
    }
    let height = ((h as u64 * width as u64 + w as u64 / 2) / w as u64).max(1) as u32;
    if (w, h) == (size.x, size.y) && w == width {
        return Framebuffer::from_image(image);
    }
    let scaled = image::imageops::resize(image, width, height, FilterType::Triangle);
    frame.blit(scaled.as_raw(), UVec2::new(width, height), IVec2::ZERO);
    frame
}

/// Largest scaling of `image` that fits inside `bounds` keeping its aspect ratio
pub fn fit_keep_aspect(image: &RgbaImage, bounds: UVec2) -> Framebuffer {
    if image.dimensions() == (bounds.x, bounds.y) {
        return Framebuffer::from_image(image);
    }
    let scaled = DynamicImage::ImageRgba8(image.clone())
        .resize(bounds.x, bounds.y, FilterType::Triangle)
        .to_rgba8();
    Framebuffer::from_image(&scaled)
}

/// Backdrop built from `background` for a `viewport` sized primary plane:
/// scaled to fit, then tiled to cover the whole screen
pub fn backdrop(background: &RgbaImage, viewport: UVec2) -> Framebuffer {
    let tile = fit_keep_aspect(background, viewport);
    let mut frame = Framebuffer::new(viewport.x, viewport.y);
    frame.clear([0, 0, 0, 255]);
    frame.tile(&tile);
    frame
}

fn placeholder_background(size: UVec2) -> RgbaImage {
    RgbaImage::from_fn(size.x, size.y, |_, y| {
        let t = y as f32 / size.y.max(1) as f32;
        Rgba([(8.0 + 16.0 * t) as u8, (10.0 + 20.0 * t) as u8, (30.0 + 50.0 * t) as u8, 255])
    })
}

/// Sparse star field; nearer layers get fewer, larger and brighter stars
fn placeholder_layer(layer: usize, size: UVec2) -> RgbaImage {
    let mut image = RgbaImage::new(size.x, size.y);
    let stars = 400 / layer as u32;
    let radius = layer as i32 - 1;
    let brightness = (140 + 35 * layer).min(255) as u8;

    // xorshift, fixed seed per layer
    let mut state = 0x9E37_79B9u32 ^ (layer as u32).wrapping_mul(0x85EB_CA6B);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    for _ in 0..stars {
        let cx = (next() % size.x.max(1)) as i32;
        let cy = (next() % size.y.max(1)) as i32;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let (x, y) = (cx + dx, cy + dy);
                if x >= 0 && y >= 0 && (x as u32) < size.x && (y as u32) < size.y {
                    image.put_pixel(x as u32, y as u32, Rgba([brightness, brightness, 255, 255]));
                }
            }
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    #[test]
    fn test_scale_to_width_keeps_aspect() {
        // 10x5 at width 40 is 40x20: covers the top of a 40x30 plane only
        let frame = scale_to_width(&solid(10, 5, [1, 2, 3, 255]), 40, UVec2::new(40, 30));
        assert_eq!(frame.dimensions(), (40, 30));
        assert_eq!(frame.pixel(39, 10).map(|px| px[3]), Some(255));
        assert_eq!(frame.pixel(20, 25), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_scale_to_width_crops_tall_images() {
        let frame = scale_to_width(&solid(4, 4, [9, 9, 9, 255]), 40, UVec2::new(40, 24));
        assert_eq!(frame.dimensions(), (40, 24));
        assert_eq!(frame.pixel(0, 23).map(|px| px[3]), Some(255));
    }

    #[test]
    fn test_fit_keep_aspect() {
        let frame = fit_keep_aspect(&solid(100, 100, [0, 0, 0, 255]), UVec2::new(800, 480));
        assert_eq!(frame.dimensions(), (480, 480));
    }

    #[test]
    fn test_backdrop_covers_viewport() {
        let frame = backdrop(&solid(100, 100, [9, 9, 9, 255]), UVec2::new(80, 40));
        assert_eq!(frame.dimensions(), (80, 40));
        // Two 40x40 tiles side by side, no uncovered black
        assert_eq!(frame.pixel(0, 0).map(|px| px[3]), Some(255));
        assert_ne!(frame.pixel(79, 39), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_load_empty_dir_uses_generated_artwork() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaSet::load(dir.path()).unwrap();
        assert_eq!(media.layers.len(), LAYER_COUNT);
        assert!(media.logo.is_none());
        assert_eq!(media.background.dimensions(), (800, 480));
    }

    #[test]
    fn test_load_reads_png_files() {
        let dir = tempfile::tempdir().unwrap();
        solid(4, 2, [255, 0, 0, 255]).save(dir.path().join("logo.png")).unwrap();
        let media = MediaSet::load(dir.path()).unwrap();
        assert_eq!(media.logo.unwrap().dimensions(), (4, 2));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("plane2.png"), b"not a png").unwrap();
        assert!(MediaSet::load(dir.path()).is_err());
    }
}
