use anyhow::{Context, Result};
use glam::{IVec2, Vec2};
use std::time::Duration;

use crate::core::{DisplayContext, FixedHz, Framebuffer, InputEvent};
use crate::cpu::CpuSampler;
use crate::loaders::{backdrop, scale_to_width, MediaSet};
use crate::plane::{PlaneDevice, PlaneError, PlaneManager};
use crate::scene::{ParallaxController, PlaneBackedItem, ProgressBar, DEFAULT_WEIGHTS};

/// Planes carrying the parallax layers, back to front
pub const LAYER_PLANES: [&str; 3] = ["overlay0", "overlay1", "overlay2"];

/// Where the logo sits on the primary plane
pub const LOGO_POSITION: IVec2 = IVec2::new(10, 10);

/// The touch demo: three plane-backed layers dragged with parallax over a
/// software-drawn primary plane showing the logo and a CPU gauge
pub struct SpaceTouch<D: PlaneDevice = Box<dyn PlaneDevice>> {
    viewport: DisplayContext,
    planes: PlaneManager<D>,
    items: Vec<PlaneBackedItem>,
    parallax: ParallaxController,
    backdrop: Framebuffer,
    logo: Option<Framebuffer>,
    primary: Framebuffer,
    progress: ProgressBar,
    sampler: CpuSampler,
    cpu_timer: FixedHz,
    needs_redraw: bool,
}

impl<D: PlaneDevice> SpaceTouch<D> {
    /// Bind the layer artwork to the loaded planes and draw the first frame.
    ///
    /// `planes` must already be loaded; a missing layer plane is fatal.
    pub fn new(
        mut planes: PlaneManager<D>,
        media: &MediaSet,
        viewport: DisplayContext,
        sampler: CpuSampler,
        sample_interval: Duration,
    ) -> Result<Self> {
        if media.layers.len() < LAYER_PLANES.len() {
            anyhow::bail!(
                "Expected {} layer images, got {}",
                LAYER_PLANES.len(),
                media.layers.len()
            );
        }

        let mut items = Vec::with_capacity(LAYER_PLANES.len());

        for (name, art) in LAYER_PLANES.iter().zip(&media.layers) {
            let handle = planes
                .handle(name)
                .context(format!("Screen configuration has no {:?} plane", name))?;
            let pixels = scale_to_width(art, viewport.width, planes.plane(handle).size());
            let item = PlaneBackedItem::new(&mut planes, handle, Vec2::ZERO, pixels.pixels())
                .context(format!("Failed to fill plane {:?}", name))?;
            items.push(item);
        }

        let mut demo = Self {
            viewport,
            parallax: ParallaxController::for_viewport(&viewport, DEFAULT_WEIGHTS),
            backdrop: backdrop(&media.background, viewport.size()),
            logo: media.logo.as_ref().map(Framebuffer::from_image),
            primary: Framebuffer::new(viewport.width, viewport.height),
            progress: ProgressBar::top_right(viewport.width),
            cpu_timer: FixedHz::every(sample_interval),
            planes,
            items,
            sampler,
            needs_redraw: true,
        };
        demo.draw_primary();
        Ok(demo)
    }

    /// Apply one input event. Returns false when the demo should exit.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Quit => false,
            InputEvent::Pointer(pointer) => {
                if self
                    .parallax
                    .handle(pointer, &mut self.items, &mut self.planes)
                {
                    self.needs_redraw = true;
                }
                true
            }
        }
    }

    /// Advance the CPU timer by `elapsed`, sampling when it fires
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.cpu_timer.tick(elapsed) {
            return;
        }
        if let Some(usage) = self.sampler.sample() {
            log::trace!("cpu0 {:.1}%", usage);
            if self.progress.set_value(usage) {
                self.draw_primary();
                self.needs_redraw = true;
            }
        }
    }

    /// Time until the next CPU sample is due
    pub fn next_tick(&self) -> Duration {
        self.cpu_timer.remaining()
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Push pending plane changes and the primary plane to the display
    pub fn render(&mut self) -> Result<(), PlaneError> {
        self.planes.commit(&self.primary)?;
        self.needs_redraw = false;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.planes.resize(width, height);
        self.needs_redraw = true;
    }

    pub fn viewport(&self) -> DisplayContext {
        self.viewport
    }

    pub fn items(&self) -> &[PlaneBackedItem] {
        &self.items
    }

    pub fn planes(&self) -> &PlaneManager<D> {
        &self.planes
    }

    pub fn parallax(&self) -> &ParallaxController {
        &self.parallax
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    pub fn primary(&self) -> &Framebuffer {
        &self.primary
    }

    fn draw_primary(&mut self) {
        self.primary.copy_from(&self.backdrop);
        if let Some(logo) = &self.logo {
            self.primary.blit(logo.pixels(), logo.size(), LOGO_POSITION);
        }
        self.progress.draw(&mut self.primary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PointerEvent;
    use crate::plane::{ScreenConfig, SoftwarePlaneDevice};
    use image::{Rgba, RgbaImage};

    fn media() -> MediaSet {
        MediaSet {
            background: RgbaImage::from_pixel(8, 8, Rgba([0, 0, 64, 255])),
            layers: vec![RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])); 3],
            logo: None,
        }
    }

    fn planes(names: &[&str]) -> PlaneManager<SoftwarePlaneDevice> {
        let planes: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                format!(
                    r#"{{ "name": "{}", "index": {}, "width": 40, "height": 24, "zpos": {} }}"#,
                    name,
                    i,
                    i + 1
                )
            })
            .collect();
        let config = ScreenConfig::parse(&format!(r#"{{ "planes": [{}] }}"#, planes.join(","))).unwrap();
        let mut manager = PlaneManager::new(SoftwarePlaneDevice::new(glam::UVec2::new(40, 24), 4));
        assert!(manager.load_config(&config));
        manager
    }

    fn demo() -> SpaceTouch<SoftwarePlaneDevice> {
        SpaceTouch::new(
            planes(&LAYER_PLANES),
            &media(),
            DisplayContext::new(40, 24),
            CpuSampler::new("/nonexistent/stat"),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_layer_plane_is_fatal() {
        let result = SpaceTouch::new(
            planes(&["overlay0", "overlay1"]),
            &media(),
            DisplayContext::new(40, 24),
            CpuSampler::default(),
            Duration::from_secs(1),
        );
        let message = format!("{:#}", result.err().unwrap());
        assert!(message.contains("overlay2"));
    }

    #[test]
    fn test_drag_moves_layers_and_requests_redraw() {
        let mut demo = demo();
        demo.render().unwrap();
        assert!(!demo.needs_redraw());

        demo.handle_input(&InputEvent::Pointer(PointerEvent::down(Vec2::new(10.0, 10.0))));
        demo.handle_input(&InputEvent::Pointer(PointerEvent::moved(Vec2::new(20.0, 10.0), true)));
        assert!(demo.needs_redraw());

        let xs: Vec<f32> = demo.items().iter().map(|item| item.position().x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_quit_stops_the_demo() {
        let mut demo = demo();
        assert!(!demo.handle_input(&InputEvent::Quit));
    }

    #[test]
    fn test_unreadable_stat_leaves_gauge_alone() {
        let mut demo = demo();
        demo.render().unwrap();
        demo.tick(Duration::from_secs(1));
        assert_eq!(demo.progress().value(), 0);
        assert!(!demo.needs_redraw());
    }
}
