use macroquad::math::Vec2;

/// Padding around the framed points, world units.
const PADDING: f32 = 350.0;
/// Smallest box the camera will frame.
const MIN_BOX: Vec2 = Vec2::new(1200.0, 900.0);
/// Largest framed extent; stops runaway zoom-out as space expands.
const MAX_WORLD_EXTENT: f32 = 6000.0;
const MIN_ZOOM: f32 = 0.05;
const MAX_ZOOM: f32 = 3.0;
/// Per-tick blend toward the target. Pan settles faster than zoom.
const PAN_BLEND: f32 = 0.08;
const ZOOM_BLEND: f32 = 0.05;

/// Auto-framing 2D camera. Every tick it computes a target frame from the
/// bounding box of the priority points and glides the current center and
/// zoom toward it, so the view never jumps.
pub struct Camera {
    view: Vec2,
    pub center: Vec2,
    pub zoom: f32,
    target_center: Vec2,
    target_zoom: f32,
}

impl Camera {
    pub fn new(view_w: f32, view_h: f32) -> Self {
        Self {
            view: Vec2::new(view_w, view_h),
            center: Vec2::ZERO,
            zoom: 0.85,
            target_center: Vec2::ZERO,
            target_zoom: 0.85,
        }
    }

    pub fn set_viewport(&mut self, w: f32, h: f32) {
        self.view = Vec2::new(w, h);
    }

    fn framing(&self, points: &[Vec2]) -> (Vec2, f32) {
        let mut lo = points[0];
        let mut hi = points[0];
        for p in points {
            lo = lo.min(*p);
            hi = hi.max(*p);
        }
        let center = (lo + hi) * 0.5;
        let size = ((hi - lo) + Vec2::splat(2.0 * PADDING))
            .max(MIN_BOX)
            .min(Vec2::splat(MAX_WORLD_EXTENT));
        let zoom = (self.view.x / size.x)
            .min(self.view.y / size.y)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        (center, zoom)
    }

    /// Glide toward a frame containing every priority point.
    pub fn update(&mut self, priority: &[Vec2]) {
        if priority.is_empty() {
            return;
        }
        let (center, zoom) = self.framing(priority);
        self.target_center = center;
        self.target_zoom = zoom;
        self.center += (self.target_center - self.center) * PAN_BLEND;
        self.zoom += (self.target_zoom - self.zoom) * ZOOM_BLEND;
    }

    /// Re-seed both current and target on the given frame. Used on reset
    /// and mode change, where the scene is rebuilt from scratch.
    pub fn snap_to(&mut self, priority: &[Vec2]) {
        if priority.is_empty() {
            return;
        }
        let (center, zoom) = self.framing(priority);
        self.center = center;
        self.target_center = center;
        self.zoom = zoom;
        self.target_zoom = zoom;
    }

    /// World to screen: (world - center) * zoom + viewport center.
    pub fn project(&self, world: Vec2) -> Vec2 {
        (world - self.center) * self.zoom + self.view * 0.5
    }

    /// Depth < 1 drags a point along more slowly, for the parallax backdrop.
    pub fn project_parallax(&self, world: Vec2, depth: f32) -> Vec2 {
        (world - self.center * depth) * self.zoom + self.view * 0.5
    }
}
