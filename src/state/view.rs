// Viewport transform: scale + translation with fit-derived zoom bounds, and
// the screen <-> map coordinate mapping everything else builds on.

use crate::model::{Size, Vec2};

/// Hard upper zoom bound; the lower bound is derived from the viewport.
pub const MAX_SCALE: f64 = 5.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Offset of the image center from the viewport center, in screen pixels.
    pub translation: Vec2,
    /// Natural (unscaled) size of the map image; zero until the image loads.
    pub image_natural: Size,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            min_scale: 1.0,
            max_scale: MAX_SCALE,
            translation: Vec2::default(),
            image_natural: Size::default(),
        }
    }
}

impl ViewTransform {
    /// Coordinate conversions are meaningless before the image has reported
    /// its natural size; callers hold off gesture/marker work until then.
    pub fn is_ready(&self) -> bool {
        self.image_natural.w > 0.0 && self.image_natural.h > 0.0
    }

    /// Recompute the fit-to-viewport scale (lower zoom bound). Must be called
    /// on every viewport resize and once the image size is known.
    pub fn recompute_min_scale(&mut self, viewport: Size) {
        if !self.is_ready() || viewport.w <= 0.0 || viewport.h <= 0.0 {
            return;
        }
        let fit_w = viewport.w / self.image_natural.w;
        let fit_h = viewport.h / self.image_natural.h;
        // A small image in a large viewport can fit at more than the zoom
        // ceiling; the bounds must stay ordered, so the ceiling wins.
        self.min_scale = fit_w.min(fit_h).min(self.max_scale);
        self.clamp_scale();
    }

    pub fn clamp_scale(&mut self) {
        self.scale = self.scale.clamp(self.min_scale, self.max_scale);
    }

    pub fn screen_to_map(&self, center: Vec2, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x - center.x - self.translation.x) / self.scale,
            (p.y - center.y - self.translation.y) / self.scale,
        )
    }

    pub fn map_to_screen(&self, center: Vec2, m: Vec2) -> Vec2 {
        Vec2::new(
            center.x + self.translation.x + m.x * self.scale,
            center.y + self.translation.y + m.y * self.scale,
        )
    }

    /// Rescale to `raw_scale` (clamped) while keeping the map point under
    /// `anchor` (screen space) visually stationary.
    pub fn zoom_about(&mut self, center: Vec2, anchor: Vec2, raw_scale: f64) {
        let target = raw_scale.clamp(self.min_scale, self.max_scale);
        let under_anchor = self.screen_to_map(center, anchor);
        self.scale = target;
        self.translation.x = anchor.x - center.x - under_anchor.x * self.scale;
        self.translation.y = anchor.y - center.y - under_anchor.y * self.scale;
    }

    /// Stepwise zoom anchored at the viewport center (keyboard shortcuts).
    pub fn zoom_step(&mut self, center: Vec2, factor: f64) {
        self.zoom_about(center, center, self.scale * factor);
    }
}
