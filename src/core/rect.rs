use glam::{IVec2, Vec2};

/// Axis-aligned rectangle in scene coordinates
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle at an integer pixel position
    pub fn at(position: IVec2, size: Vec2) -> Self {
        Self::new(position.as_vec2(), size)
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }

    pub fn top(&self) -> f32 {
        self.origin.y
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Point containment, right and bottom edges exclusive
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// True when `other` lies entirely inside, edges inclusive
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let rect = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn test_contains_rect_inclusive_edges() {
        let outer = Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
        assert!(outer.contains_rect(&outer));
        assert!(outer.contains_rect(&Rect::new(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0))));
        assert!(!outer.contains_rect(&Rect::new(Vec2::new(51.0, 50.0), Vec2::new(50.0, 50.0))));
        assert!(!outer.contains_rect(&Rect::new(Vec2::new(-1.0, 0.0), Vec2::new(10.0, 10.0))));
    }

    #[test]
    fn test_contains_point() {
        let rect = Rect::at(IVec2::new(5, 5), Vec2::new(10.0, 10.0));
        assert!(rect.contains_point(Vec2::new(5.0, 5.0)));
        assert!(rect.contains_point(Vec2::new(14.5, 14.5)));
        assert!(!rect.contains_point(Vec2::new(15.0, 10.0)));
        assert!(!rect.contains_point(Vec2::new(4.9, 10.0)));
    }
}
