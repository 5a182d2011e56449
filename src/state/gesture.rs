// Pointer gesture state machine: pan with one pointer, pinch-zoom with two,
// double-tap to toggle a marker. Pure over (pointer id, position, timestamp)
// tuples so event sequences can be fed synthetically in tests.

use std::collections::HashMap;

use crate::model::Vec2;
use crate::state::view::ViewTransform;

/// Two tap-ups inside this window and radius form a double tap.
pub const DOUBLE_TAP_WINDOW_MS: f64 = 280.0;
pub const DOUBLE_TAP_RADIUS_PX: f64 = 32.0;
/// An up further than this from its own down is a drag, not a tap.
const TAP_SLOP_PX: f64 = 10.0;

fn dist(a: Vec2, b: Vec2) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[derive(Clone, Copy, Debug)]
struct PointerTrack {
    pos: Vec2,
    down: Vec2,
    /// Sticky: set once the pointer ever strays past the tap slop. A drag
    /// that wanders and then releases back near its down point is still a
    /// drag, not a tap.
    dragged: bool,
}

#[derive(Clone, Copy, Debug)]
struct PanBaseline {
    id: i32,
    start: Vec2,
    translation: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct PinchBaseline {
    start_dist: f64,
    start_scale: f64,
    /// Live focal anchor. Follows the midpoint every move, so a pinch whose
    /// fingers drift sideways pans the view as well as zooming it.
    focal: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct TapCandidate {
    time_ms: f64,
    pos: Vec2,
}

#[derive(Clone, Debug, Default)]
pub struct GestureState {
    pointers: HashMap<i32, PointerTrack>,
    pan: Option<PanBaseline>,
    pinch: Option<PinchBaseline>,
    last_tap: Option<TapCandidate>,
    /// Set once two pointers were ever down in this session; suppresses tap
    /// detection until every pointer has lifted.
    multi_touch: bool,
}

impl GestureState {
    /// Pointer count is derived from the id map and nothing else.
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn pointer_down(&mut self, id: i32, pos: Vec2, view: &ViewTransform) {
        self.pointers.insert(
            id,
            PointerTrack {
                pos,
                down: pos,
                dragged: false,
            },
        );
        match self.pointers.len() {
            1 => {
                self.pan = Some(PanBaseline {
                    id,
                    start: pos,
                    translation: view.translation,
                });
            }
            2 => {
                self.multi_touch = true;
                self.pan = None;
                // A tap recorded before the pinch must not pair with one after.
                self.last_tap = None;
                self.rebaseline_pinch(view);
            }
            _ => {
                // No defined gesture with 3+ pointers; drop the stale pair
                // baseline so it can never apply.
                self.pinch = None;
            }
        }
    }

    /// Returns true when the view transform changed and a redraw is due.
    pub fn pointer_move(
        &mut self,
        id: i32,
        pos: Vec2,
        center: Vec2,
        view: &mut ViewTransform,
    ) -> bool {
        match self.pointers.get_mut(&id) {
            Some(track) => {
                track.pos = pos;
                if dist(pos, track.down) > TAP_SLOP_PX {
                    track.dragged = true;
                }
            }
            // Moves for pointers that never went down carry no baseline.
            None => return false,
        }
        match self.pointers.len() {
            1 => self.pan_move(id, pos, view),
            2 => self.pinch_move(center, view),
            _ => false,
        }
    }

    fn pan_move(&mut self, id: i32, pos: Vec2, view: &mut ViewTransform) -> bool {
        let Some(pan) = self.pan else { return false };
        if pan.id != id {
            return false;
        }
        // Strictly baseline-relative: a long drag stays linear, no jumps.
        view.translation.x = pan.translation.x + (pos.x - pan.start.x);
        view.translation.y = pan.translation.y + (pos.y - pan.start.y);
        true
    }

    fn pinch_move(&mut self, center: Vec2, view: &mut ViewTransform) -> bool {
        let (a, b) = match self.pointer_pair() {
            Some(pair) => pair,
            None => return false,
        };
        let Some(pinch) = self.pinch.as_mut() else {
            return false;
        };
        let mid = Vec2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        // Midpoint drift pans.
        view.translation.x += mid.x - pinch.focal.x;
        view.translation.y += mid.y - pinch.focal.y;
        // Coincident start pointers give no usable ratio; keep the last
        // valid scale for this frame instead of dividing by zero.
        if pinch.start_dist > 0.0 {
            let factor = dist(a, b) / pinch.start_dist;
            view.zoom_about(center, mid, pinch.start_scale * factor);
        }
        pinch.focal = mid;
        true
    }

    /// Runs completed-tap detection; returns the screen point a marker
    /// toggle should fire at.
    pub fn pointer_up(
        &mut self,
        id: i32,
        pos: Vec2,
        now_ms: f64,
        view: &ViewTransform,
    ) -> Option<Vec2> {
        let track = self.pointers.remove(&id)?;
        let tap = self.detect_tap(track, pos, now_ms);
        self.after_release(view);
        tap
    }

    /// Identical to `pointer_up` for the state machine, but never a tap: the
    /// in-flight gesture is discarded without committing anything further.
    pub fn pointer_cancel(&mut self, id: i32, view: &ViewTransform) {
        if self.pointers.remove(&id).is_some() {
            self.after_release(view);
        }
    }

    fn detect_tap(&mut self, track: PointerTrack, pos: Vec2, now_ms: f64) -> Option<Vec2> {
        if self.multi_touch {
            return None;
        }
        if track.dragged || dist(pos, track.down) > TAP_SLOP_PX {
            return None;
        }
        if let Some(last) = self.last_tap {
            if now_ms - last.time_ms < DOUBLE_TAP_WINDOW_MS && dist(pos, last.pos) < DOUBLE_TAP_RADIUS_PX
            {
                // Reset so a triple tap cannot fire twice.
                self.last_tap = None;
                return Some(pos);
            }
        }
        self.last_tap = Some(TapCandidate { time_ms: now_ms, pos });
        None
    }

    fn after_release(&mut self, view: &ViewTransform) {
        match self.pointers.len() {
            0 => {
                self.pan = None;
                self.pinch = None;
                self.multi_touch = false;
            }
            1 => {
                // Pinch over; panning resumes from the surviving pointer's
                // current position so the hand-off is seamless.
                self.pinch = None;
                let survivor = self.pointers.iter().next().map(|(&id, t)| (id, t.pos));
                if let Some((id, start)) = survivor {
                    self.pan = Some(PanBaseline {
                        id,
                        start,
                        translation: view.translation,
                    });
                }
            }
            2 => self.rebaseline_pinch(view),
            _ => {}
        }
    }

    fn rebaseline_pinch(&mut self, view: &ViewTransform) {
        let pair = self.pointer_pair();
        self.pinch = pair.map(|(a, b)| PinchBaseline {
            start_dist: dist(a, b),
            start_scale: view.scale,
            focal: Vec2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
        });
    }

    fn pointer_pair(&self) -> Option<(Vec2, Vec2)> {
        if self.pointers.len() != 2 {
            return None;
        }
        let mut it = self.pointers.values();
        let a = it.next()?.pos;
        let b = it.next()?.pos;
        Some((a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Size;

    const EPS: f64 = 1e-9;

    fn view() -> ViewTransform {
        ViewTransform {
            scale: 1.0,
            min_scale: 0.4,
            translation: Vec2::default(),
            image_natural: Size::new(2000.0, 1000.0),
            ..Default::default()
        }
    }

    fn center() -> Vec2 {
        Vec2::new(400.0, 300.0)
    }

    fn tap(g: &mut GestureState, v: &ViewTransform, pos: Vec2, t: f64) -> Option<Vec2> {
        g.pointer_down(7, pos, v);
        g.pointer_up(7, pos, t, v)
    }

    #[test]
    fn single_pointer_pan_is_baseline_relative() {
        let mut g = GestureState::default();
        let mut v = view();
        g.pointer_down(1, Vec2::new(100.0, 100.0), &v);
        for step in 1..=50 {
            let pos = Vec2::new(100.0 + step as f64 * 3.0, 100.0 - step as f64);
            assert!(g.pointer_move(1, pos, center(), &mut v));
        }
        assert!((v.translation.x - 150.0).abs() < EPS);
        assert!((v.translation.y + 50.0).abs() < EPS);
    }

    #[test]
    fn pinch_doubles_scale_when_distance_doubles() {
        let mut g = GestureState::default();
        let mut v = view();
        g.pointer_down(1, Vec2::new(350.0, 300.0), &v);
        g.pointer_down(2, Vec2::new(450.0, 300.0), &v);
        g.pointer_move(1, Vec2::new(300.0, 300.0), center(), &mut v);
        g.pointer_move(2, Vec2::new(500.0, 300.0), center(), &mut v);
        assert!((v.scale - 2.0).abs() < 1e-6, "scale = {}", v.scale);
    }

    #[test]
    fn pinch_keeps_focal_map_point_stationary() {
        let mut g = GestureState::default();
        let mut v = view();
        v.translation = Vec2::new(25.0, -10.0);
        let p1 = Vec2::new(200.0, 240.0);
        let p2 = Vec2::new(280.0, 300.0);
        let mid = Vec2::new(240.0, 270.0);
        let before = v.screen_to_map(center(), mid);
        g.pointer_down(1, p1, &v);
        g.pointer_down(2, p2, &v);
        // Spread symmetrically about the midpoint; the focal must not move.
        g.pointer_move(1, Vec2::new(160.0, 210.0), center(), &mut v);
        g.pointer_move(2, Vec2::new(320.0, 330.0), center(), &mut v);
        let after = v.screen_to_map(center(), mid);
        assert!((before.x - after.x).abs() < 1e-6);
        assert!((before.y - after.y).abs() < 1e-6);
    }

    #[test]
    fn drifting_pinch_pans_by_midpoint_delta() {
        let mut g = GestureState::default();
        let mut v = view();
        g.pointer_down(1, Vec2::new(350.0, 300.0), &v);
        g.pointer_down(2, Vec2::new(450.0, 300.0), &v);
        // Same distance, both pointers shifted 10px right.
        g.pointer_move(1, Vec2::new(360.0, 300.0), center(), &mut v);
        g.pointer_move(2, Vec2::new(460.0, 300.0), center(), &mut v);
        assert!((v.scale - 1.0).abs() < 1e-9);
        assert!((v.translation.x - 10.0).abs() < 1e-6);
        assert!(v.translation.y.abs() < 1e-9);
    }

    #[test]
    fn coincident_pinch_start_skips_scale_update() {
        let mut g = GestureState::default();
        let mut v = view();
        let p = Vec2::new(400.0, 300.0);
        g.pointer_down(1, p, &v);
        g.pointer_down(2, p, &v);
        g.pointer_move(2, Vec2::new(500.0, 300.0), center(), &mut v);
        assert!((v.scale - 1.0).abs() < EPS);
    }

    #[test]
    fn double_tap_fires_at_second_tap() {
        let mut g = GestureState::default();
        let v = view();
        assert!(tap(&mut g, &v, Vec2::new(100.0, 100.0), 1000.0).is_none());
        let hit = tap(&mut g, &v, Vec2::new(105.0, 103.0), 1200.0);
        assert_eq!(hit, Some(Vec2::new(105.0, 103.0)));
    }

    #[test]
    fn triple_tap_fires_only_once() {
        let mut g = GestureState::default();
        let v = view();
        assert!(tap(&mut g, &v, Vec2::new(100.0, 100.0), 1000.0).is_none());
        assert!(tap(&mut g, &v, Vec2::new(102.0, 101.0), 1150.0).is_some());
        // Third tap within the window of the second starts a fresh candidate.
        assert!(tap(&mut g, &v, Vec2::new(101.0, 102.0), 1300.0).is_none());
    }

    #[test]
    fn slow_or_far_taps_do_not_pair() {
        let mut g = GestureState::default();
        let v = view();
        assert!(tap(&mut g, &v, Vec2::new(100.0, 100.0), 1000.0).is_none());
        assert!(tap(&mut g, &v, Vec2::new(100.0, 100.0), 1400.0).is_none());
        assert!(tap(&mut g, &v, Vec2::new(150.0, 100.0), 1500.0).is_none());
    }

    #[test]
    fn long_drag_suppresses_tap() {
        let mut g = GestureState::default();
        let mut v = view();
        assert!(tap(&mut g, &v, Vec2::new(100.0, 100.0), 1000.0).is_none());
        g.pointer_down(1, Vec2::new(100.0, 100.0), &v);
        g.pointer_move(1, Vec2::new(104.0, 103.0), center(), &mut v);
        g.pointer_move(1, Vec2::new(180.0, 160.0), center(), &mut v);
        // Released back near the first tap, but after a real drag.
        g.pointer_move(1, Vec2::new(102.0, 101.0), center(), &mut v);
        assert!(g.pointer_up(1, Vec2::new(102.0, 101.0), 1100.0, &v).is_none());
    }

    #[test]
    fn drag_released_far_from_candidate_neither_fires_nor_pairs() {
        let mut g = GestureState::default();
        let mut v = view();
        assert!(tap(&mut g, &v, Vec2::new(100.0, 100.0), 1000.0).is_none());
        // Drag well past the slop and release outside the double-tap radius.
        g.pointer_down(1, Vec2::new(100.0, 100.0), &v);
        g.pointer_move(1, Vec2::new(400.0, 250.0), center(), &mut v);
        assert!(g.pointer_up(1, Vec2::new(400.0, 250.0), 1100.0, &v).is_none());
        // The drag also left no tap candidate behind.
        assert!(tap(&mut g, &v, Vec2::new(400.0, 250.0), 1150.0).is_none());
    }

    #[test]
    fn pinch_session_suppresses_tap_until_all_lift() {
        let mut g = GestureState::default();
        let v = view();
        g.pointer_down(1, Vec2::new(100.0, 100.0), &v);
        g.pointer_down(2, Vec2::new(200.0, 100.0), &v);
        assert!(g.pointer_up(2, Vec2::new(200.0, 100.0), 1000.0, &v).is_none());
        assert!(g.pointer_up(1, Vec2::new(100.0, 100.0), 1050.0, &v).is_none());
        // Session over: the next pair of taps works again.
        assert!(tap(&mut g, &v, Vec2::new(100.0, 100.0), 1100.0).is_none());
        assert!(tap(&mut g, &v, Vec2::new(100.0, 100.0), 1200.0).is_some());
    }

    #[test]
    fn pan_resumes_seamlessly_after_pinch_release() {
        let mut g = GestureState::default();
        let mut v = view();
        g.pointer_down(1, Vec2::new(300.0, 300.0), &v);
        g.pointer_down(2, Vec2::new(500.0, 300.0), &v);
        g.pointer_move(1, Vec2::new(250.0, 300.0), center(), &mut v);
        let settled = v.translation;
        g.pointer_cancel(2, &v);
        // First move of the surviving pointer from its current position must
        // not jump the view.
        g.pointer_move(1, Vec2::new(250.0, 300.0), center(), &mut v);
        assert!((v.translation.x - settled.x).abs() < EPS);
        assert!((v.translation.y - settled.y).abs() < EPS);
        g.pointer_move(1, Vec2::new(260.0, 310.0), center(), &mut v);
        assert!((v.translation.x - (settled.x + 10.0)).abs() < EPS);
        assert!((v.translation.y - (settled.y + 10.0)).abs() < EPS);
    }

    #[test]
    fn cancel_matches_up_for_the_state_machine() {
        let mut g = GestureState::default();
        let v = view();
        g.pointer_down(1, Vec2::new(100.0, 100.0), &v);
        g.pointer_cancel(1, &v);
        assert_eq!(g.pointer_count(), 0);
        // And a cancel for an unknown id is a no-op.
        g.pointer_cancel(99, &v);
        assert_eq!(g.pointer_count(), 0);
    }

    #[test]
    fn third_pointer_disables_pinch_until_pair_reforms() {
        let mut g = GestureState::default();
        let mut v = view();
        g.pointer_down(1, Vec2::new(300.0, 300.0), &v);
        g.pointer_down(2, Vec2::new(500.0, 300.0), &v);
        g.pointer_down(3, Vec2::new(400.0, 500.0), &v);
        assert!(!g.pointer_move(1, Vec2::new(200.0, 300.0), center(), &mut v));
        assert!((v.scale - 1.0).abs() < EPS);
        // Back to two pointers: a fresh baseline applies, no stale jump.
        // Pair is now 300px apart; spreading to 400px scales by 4/3.
        g.pointer_cancel(3, &v);
        g.pointer_move(2, Vec2::new(600.0, 300.0), center(), &mut v);
        assert!((v.scale - 400.0 / 300.0).abs() < 1e-6);
    }
}
