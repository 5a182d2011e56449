// Insertion-ordered marker collection with proximity toggle.

use crate::model::{Marker, Rgb, Vec2};

/// Hit radius for toggling, in screen pixels. Callers divide by the current
/// scale so the threshold a finger sees is constant at every zoom level.
pub const HIT_TOLERANCE_PX: f64 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerStore {
    markers: Vec<Marker>,
}

impl MarkerStore {
    pub fn from_markers(markers: Vec<Marker>) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Removes the first marker (insertion order) within `tolerance` of `at`
    /// in map space, or appends a new one. Exactly one of the two happens.
    pub fn toggle(&mut self, at: Vec2, tolerance: f64, color: Rgb, jitter_seed: f64) -> Toggle {
        let hit = self
            .markers
            .iter()
            .position(|m| (m.x_map - at.x).hypot(m.y_map - at.y) <= tolerance);
        match hit {
            Some(i) => {
                self.markers.remove(i);
                Toggle::Removed
            }
            None => {
                self.markers.push(Marker {
                    x_map: at.x,
                    y_map: at.y,
                    color,
                    jitter_seed,
                });
                Toggle::Added
            }
        }
    }

    /// Bulk erase; distinct from toggling in that it never adds.
    pub fn clear(&mut self) {
        self.markers.clear();
    }
}
