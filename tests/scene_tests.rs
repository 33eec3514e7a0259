use glam::{UVec2, Vec2};
use image::{Rgba, RgbaImage};
use spacetouch::core::{DisplayContext, InputEvent, PointerEvent};
use spacetouch::cpu::CpuSampler;
use spacetouch::loaders::MediaSet;
use spacetouch::plane::{PlaneManager, ScreenConfig, SoftwarePlaneDevice};
use spacetouch::SpaceTouch;
use std::time::Duration;

const W: u32 = 40;
const H: u32 = 24;
const BACKGROUND: [u8; 4] = [0, 0, 80, 255];
const LAYER_COLORS: [[u8; 4]; 3] = [[255, 0, 0, 255], [0, 255, 0, 255], [255, 255, 0, 255]];

/// Transparent layer with a 2x2 marker at (2 + 10 * layer, 2)
fn layer(index: usize) -> RgbaImage {
    let mut image = RgbaImage::new(W, H);
    let x0 = 2 + 10 * index as u32;
    for (x, y) in [(x0, 2), (x0 + 1, 2), (x0, 3), (x0 + 1, 3)] {
        image.put_pixel(x, y, Rgba(LAYER_COLORS[index]));
    }
    image
}

fn demo(stat: &std::path::Path) -> SpaceTouch<SoftwarePlaneDevice> {
    let config = ScreenConfig::parse(&format!(
        r#"{{ "planes": [
            {{ "name": "overlay0", "index": 0, "width": {w}, "height": {h}, "zpos": 1 }},
            {{ "name": "overlay1", "index": 1, "width": {w}, "height": {h}, "zpos": 2 }},
            {{ "name": "overlay2", "index": 2, "width": {w}, "height": {h}, "zpos": 3 }}
        ] }}"#,
        w = W,
        h = H
    ))
    .unwrap();
    let mut planes = PlaneManager::new(SoftwarePlaneDevice::new(UVec2::new(W, H), 4));
    assert!(planes.load_config(&config));

    let media = MediaSet {
        background: RgbaImage::from_pixel(W, H, Rgba(BACKGROUND)),
        layers: (0..3).map(layer).collect(),
        logo: None,
    };
    SpaceTouch::new(
        planes,
        &media,
        DisplayContext::new(W, H),
        CpuSampler::new(stat),
        Duration::from_millis(100),
    )
    .unwrap()
}

fn pointer(event: PointerEvent) -> InputEvent {
    InputEvent::Pointer(event)
}

#[test]
fn test_first_frame_composites_layers_over_background() {
    let mut demo = demo(std::path::Path::new("/nonexistent/stat"));
    assert!(demo.needs_redraw());
    demo.render().unwrap();

    let frame = demo.planes().device().frame();
    assert_eq!(frame.pixel(2, 2), Some(LAYER_COLORS[0]));
    assert_eq!(frame.pixel(12, 2), Some(LAYER_COLORS[1]));
    assert_eq!(frame.pixel(22, 3), Some(LAYER_COLORS[2]));
    assert_eq!(frame.pixel(35, 20), Some(BACKGROUND));
}

#[test]
fn test_drag_shifts_layers_by_weight() {
    let mut demo = demo(std::path::Path::new("/nonexistent/stat"));
    demo.render().unwrap();

    demo.handle_input(&pointer(PointerEvent::down(Vec2::new(5.0, 5.0))));
    demo.handle_input(&pointer(PointerEvent::moved(Vec2::new(15.0, 5.0), true)));
    assert!(demo.needs_redraw());
    demo.render().unwrap();

    let frame = demo.planes().device().frame();
    assert_eq!(frame.pixel(3, 2), Some(LAYER_COLORS[0]));
    assert_eq!(frame.pixel(15, 2), Some(LAYER_COLORS[1]));
    assert_eq!(frame.pixel(27, 2), Some(LAYER_COLORS[2]));
    assert_eq!(frame.pixel(22, 2), Some(BACKGROUND));
}

#[test]
fn test_drag_does_not_reupload_layers() {
    let mut demo = demo(std::path::Path::new("/nonexistent/stat"));
    demo.render().unwrap();
    let uploads = demo.planes().device().upload_count();

    demo.handle_input(&pointer(PointerEvent::down(Vec2::new(5.0, 5.0))));
    for x in 6..20 {
        demo.handle_input(&pointer(PointerEvent::moved(Vec2::new(x as f32, 5.0), true)));
        demo.render().unwrap();
    }
    assert_eq!(demo.planes().device().upload_count(), uploads);
}

#[test]
fn test_cpu_tick_redraws_gauge() {
    let dir = tempfile::tempdir().unwrap();
    let stat = dir.path().join("stat");
    std::fs::write(&stat, "cpu0 100 0 50 850 0 0 0\n").unwrap();

    let mut demo = demo(&stat);
    demo.render().unwrap();
    let revision = demo.primary().revision();

    demo.tick(Duration::from_millis(50));
    assert!(!demo.needs_redraw());

    demo.tick(Duration::from_millis(50));
    assert_eq!(demo.progress().value(), 15);
    assert!(demo.needs_redraw());
    assert_ne!(demo.primary().revision(), revision);
}
