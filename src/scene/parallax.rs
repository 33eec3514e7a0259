use glam::Vec2;

use super::item::PlaneBackedItem;
use crate::core::{DisplayContext, PointerEvent, PointerPhase, Rect};
use crate::plane::{PlaneDevice, PlaneManager};

/// Fraction of the drag each layer follows, back to front
pub const DEFAULT_WEIGHTS: [f32; 3] = [0.1, 0.3, 0.5];

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        /// Pointer position at pointer-down
        origin: Vec2,
        /// Item positions at pointer-down, one per item
        snapshot: Vec<Vec2>,
    },
}

/// Turns pointer drags into weighted moves of several plane-backed items
///
/// A drag tick moves every item or none: if any item's candidate rectangle
/// leaves the bounds, the whole tick is dropped so the layers keep their
/// relative arrangement.
#[derive(Debug, Clone)]
pub struct ParallaxController {
    weights: Vec<f32>,
    bounds: Rect,
    state: DragState,
}

impl ParallaxController {
    pub fn new(weights: impl Into<Vec<f32>>, bounds: Rect) -> Self {
        Self {
            weights: weights.into(),
            bounds,
            state: DragState::Idle,
        }
    }

    /// Controller bounded by the viewport's drag region
    pub fn for_viewport(viewport: &DisplayContext, weights: impl Into<Vec<f32>>) -> Self {
        Self::new(weights, viewport.drag_bounds())
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Apply one pointer event. Returns true when the items moved.
    pub fn handle<D: PlaneDevice>(
        &mut self,
        event: &PointerEvent,
        items: &mut [PlaneBackedItem],
        planes: &mut PlaneManager<D>,
    ) -> bool {
        debug_assert_eq!(items.len(), self.weights.len());

        match event.phase {
            PointerPhase::Down => {
                if event.primary_held {
                    self.state = DragState::Dragging {
                        origin: event.position,
                        snapshot: items.iter().map(PlaneBackedItem::position).collect(),
                    };
                }
                false
            }
            PointerPhase::Move => {
                let DragState::Dragging { origin, snapshot } = &self.state else {
                    return false;
                };
                // A stray move without the button keeps the drag alive
                if !event.primary_held {
                    return false;
                }

                let delta = event.position - *origin;
                let sizes: Vec<Vec2> = items.iter().map(|item| item.size().as_vec2()).collect();
                let Some(targets) = propose_move(snapshot, &sizes, delta, &self.weights, &self.bounds)
                else {
                    log::trace!("drag by {:?} rejected: layer would leave bounds", delta);
                    return false;
                };

                for (item, target) in items.iter_mut().zip(targets) {
                    item.move_to(planes, target);
                }
                true
            }
            PointerPhase::Up => {
                self.state = DragState::Idle;
                false
            }
        }
    }
}

/// Candidate positions for a drag by `delta`, or `None` when any candidate
/// rectangle would leave `bounds`
///
/// Candidate `i` is `snapshot[i] + delta * weights[i]`. Pure: nothing moves
/// until the caller applies the result.
pub fn propose_move(
    snapshot: &[Vec2],
    sizes: &[Vec2],
    delta: Vec2,
    weights: &[f32],
    bounds: &Rect,
) -> Option<Vec<Vec2>> {
    snapshot
        .iter()
        .zip(sizes)
        .zip(weights)
        .map(|((&start, &size), &weight)| {
            let candidate = start + delta * weight;
            bounds
                .contains_rect(&Rect::new(candidate, size))
                .then_some(candidate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        DisplayContext::new(800, 480).drag_bounds()
    }

    #[test]
    fn test_propose_move_scales_delta_per_layer() {
        let start = [Vec2::ZERO; 3];
        let sizes = [Vec2::new(800.0, 480.0); 3];
        let moved = propose_move(&start, &sizes, Vec2::new(10.0, -20.0), &DEFAULT_WEIGHTS, &bounds())
            .unwrap();
        assert_eq!(moved[0], Vec2::new(1.0, -2.0));
        assert_eq!(moved[1], Vec2::new(3.0, -6.0));
        assert_eq!(moved[2], Vec2::new(5.0, -10.0));
    }

    #[test]
    fn test_propose_move_rejects_when_one_layer_leaves() {
        let start = [Vec2::ZERO; 3];
        let sizes = [Vec2::new(800.0, 480.0); 3];
        // Layer 3 moves 500 px right: 500 + 800 > 1200. Layers 1 and 2 fit.
        assert!(propose_move(&start, &sizes, Vec2::new(1000.0, 0.0), &DEFAULT_WEIGHTS, &bounds()).is_none());
        assert!(propose_move(&start, &sizes, Vec2::new(800.0, 0.0), &DEFAULT_WEIGHTS, &bounds()).is_some());
    }

    #[test]
    fn test_propose_move_edges_are_inclusive() {
        let start = [Vec2::ZERO];
        let sizes = [Vec2::new(800.0, 480.0)];
        let moved = propose_move(&start, &sizes, Vec2::new(-400.0, -240.0), &[1.0], &bounds()).unwrap();
        assert_eq!(moved[0], Vec2::new(-400.0, -240.0));
        assert!(propose_move(&start, &sizes, Vec2::new(-401.0, 0.0), &[1.0], &bounds()).is_none());
    }

    #[test]
    fn test_propose_move_zero_delta_is_identity() {
        let start = [Vec2::new(3.0, 4.0), Vec2::new(-5.0, 6.0)];
        let sizes = [Vec2::new(10.0, 10.0); 2];
        let moved = propose_move(&start, &sizes, Vec2::ZERO, &[0.1, 0.3], &bounds()).unwrap();
        assert_eq!(moved, start.to_vec());
    }

    #[test]
    fn test_controller_starts_idle() {
        let controller = ParallaxController::for_viewport(&DisplayContext::new(800, 480), DEFAULT_WEIGHTS);
        assert_eq!(controller.state(), &DragState::Idle);
        assert_eq!(controller.weights(), &DEFAULT_WEIGHTS);
        assert_eq!(controller.bounds(), bounds());
    }
}
