use glam::{IVec2, UVec2, Vec2};

use crate::core::Rect;
use crate::plane::{PlaneDevice, PlaneError, PlaneHandle, PlaneManager};

/// Scene item whose pixels live on an overlay plane
///
/// The item's scene position is the single authoritative value and the
/// plane's pixel position is its rounded projection. Every move goes through
/// [`PlaneBackedItem::move_to`], which writes both in the same step.
#[derive(Debug, Clone)]
pub struct PlaneBackedItem {
    plane: PlaneHandle,
    position: Vec2,
    size: UVec2,
}

/// Whole-pixel plane position for a scene position
pub fn to_plane_position(position: Vec2) -> IVec2 {
    position.round().as_ivec2()
}

impl PlaneBackedItem {
    /// Push `pixels` to the plane once and place the plane at `position`
    pub fn new<D: PlaneDevice>(
        planes: &mut PlaneManager<D>,
        plane: PlaneHandle,
        position: Vec2,
        pixels: &[u8],
    ) -> Result<Self, PlaneError> {
        let target = planes.plane_mut(plane);
        target.set_content(pixels)?;
        target.set_position(to_plane_position(position));
        let size = target.size();
        Ok(Self {
            plane,
            position,
            size,
        })
    }

    /// Move the item and its plane; metadata only
    pub fn move_to<D: PlaneDevice>(&mut self, planes: &mut PlaneManager<D>, position: Vec2) {
        self.position = position;
        planes
            .plane_mut(self.plane)
            .set_position(to_plane_position(position));
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn plane_position(&self) -> IVec2 {
        to_plane_position(self.position)
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size.as_vec2())
    }

    /// Hit test in scene coordinates
    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds().contains_point(point)
    }

    pub fn handle(&self) -> PlaneHandle {
        self.plane
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::{PlaneDirty, ScreenConfig, SoftwarePlaneDevice};

    fn planes() -> PlaneManager<SoftwarePlaneDevice> {
        let mut planes = PlaneManager::new(SoftwarePlaneDevice::new(UVec2::new(32, 32), 4));
        let config = ScreenConfig::parse(
            r#"{ "planes": [ { "name": "overlay0", "index": 0, "width": 4, "height": 4, "x": 9, "y": 9 } ] }"#,
        )
        .unwrap();
        assert!(planes.load_config(&config));
        planes
    }

    #[test]
    fn test_new_syncs_plane_to_item_position() {
        let mut planes = planes();
        let handle = planes.handle("overlay0").unwrap();
        let item = PlaneBackedItem::new(&mut planes, handle, Vec2::ZERO, &[255; 64]).unwrap();

        assert_eq!(planes.plane(handle).position(), IVec2::ZERO);
        assert_eq!(item.position(), Vec2::ZERO);
        assert_eq!(item.size(), UVec2::new(4, 4));
        assert!(planes.plane(handle).pixels().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_new_rejects_wrong_content_size() {
        let mut planes = planes();
        let handle = planes.handle("overlay0").unwrap();
        let err = PlaneBackedItem::new(&mut planes, handle, Vec2::ZERO, &[0; 8]).unwrap_err();
        assert!(matches!(err, PlaneError::ContentSize { .. }));
    }

    #[test]
    fn test_move_to_keeps_plane_in_sync() {
        let mut planes = planes();
        let handle = planes.handle("overlay0").unwrap();
        let mut item = PlaneBackedItem::new(&mut planes, handle, Vec2::ZERO, &[0; 64]).unwrap();
        planes.commit(&crate::core::Framebuffer::new(32, 32)).unwrap();

        item.move_to(&mut planes, Vec2::new(-3.0, 7.0));
        assert_eq!(item.position(), Vec2::new(-3.0, 7.0));
        assert_eq!(planes.plane(handle).position(), IVec2::new(-3, 7));
        assert_eq!(planes.plane(handle).dirty(), PlaneDirty::GEOMETRY);
    }

    #[test]
    fn test_move_to_is_idempotent() {
        let mut planes = planes();
        let handle = planes.handle("overlay0").unwrap();
        let mut item = PlaneBackedItem::new(&mut planes, handle, Vec2::ZERO, &[0; 64]).unwrap();

        item.move_to(&mut planes, Vec2::new(5.0, 6.0));
        let once = planes.plane(handle).state();
        item.move_to(&mut planes, Vec2::new(5.0, 6.0));
        assert_eq!(planes.plane(handle).state(), once);
        assert_eq!(item.position(), Vec2::new(5.0, 6.0));
    }

    #[test]
    fn test_fractional_position_rounds_on_plane() {
        let mut planes = planes();
        let handle = planes.handle("overlay0").unwrap();
        let mut item = PlaneBackedItem::new(&mut planes, handle, Vec2::ZERO, &[0; 64]).unwrap();

        item.move_to(&mut planes, Vec2::new(0.3, 2.6));
        assert_eq!(item.position(), Vec2::new(0.3, 2.6));
        assert_eq!(item.plane_position(), IVec2::new(0, 3));
        assert_eq!(planes.plane(handle).position(), IVec2::new(0, 3));
    }

    #[test]
    fn test_contains_uses_scene_bounds() {
        let mut planes = planes();
        let handle = planes.handle("overlay0").unwrap();
        let item = PlaneBackedItem::new(&mut planes, handle, Vec2::new(10.0, 10.0), &[0; 64]).unwrap();
        assert!(item.contains(Vec2::new(11.0, 13.5)));
        assert!(!item.contains(Vec2::new(14.0, 10.0)));
    }
}
