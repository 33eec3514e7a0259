use glam::Vec2;

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Left mouse button or a touch contact
    Primary,
    Secondary,
}

/// Phase of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Discrete pointer event in device pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Vec2,
    /// Whether the primary button is held once this event is applied
    pub primary_held: bool,
}

impl PointerEvent {
    pub fn down(position: Vec2) -> Self {
        Self {
            phase: PointerPhase::Down,
            position,
            primary_held: true,
        }
    }

    pub fn moved(position: Vec2, primary_held: bool) -> Self {
        Self {
            phase: PointerPhase::Move,
            position,
            primary_held,
        }
    }

    pub fn up(position: Vec2) -> Self {
        Self {
            phase: PointerPhase::Up,
            position,
            primary_held: false,
        }
    }
}

/// Events the demo reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_phase_and_button() {
        let p = Vec2::new(3.0, 4.0);

        let down = PointerEvent::down(p);
        assert_eq!(down.phase, PointerPhase::Down);
        assert!(down.primary_held);

        let moved = PointerEvent::moved(p, false);
        assert_eq!(moved.phase, PointerPhase::Move);
        assert!(!moved.primary_held);

        let up = PointerEvent::up(p);
        assert_eq!(up.phase, PointerPhase::Up);
        assert!(!up.primary_held);
        assert_eq!(up.position, p);
    }

    #[test]
    fn test_button_debug() {
        assert_eq!(format!("{:?}", Button::Primary), "Primary");
        assert_ne!(Button::Primary, Button::Secondary);
    }
}
