//! Pointer trail, velocity prediction, and drag-position smoothing
//!
//! The tracker keeps two positions per gesture: the smoothed position the
//! renderer draws every frame, and the raw position the placement decision
//! prefers when the finger and the smoothed piece agree. Prediction leads
//! fast motion to compensate for input-to-render latency.

use std::collections::VecDeque;

/// Samples kept in the trail
const TRAIL_LEN: usize = 6;
/// Elapsed spans below this are treated as noise, not velocity
const NOISE_FLOOR_MS: u64 = 10;
/// How far ahead of the finger to extrapolate
const LEAD_TIME_SECS: f32 = 0.06;
/// On release, prefer the raw point when it is this close to the smoothed one
const PRECISION_RADIUS: f32 = 20.0;
/// Per-frame interpolation factor toward the raw position
const SMOOTH_FACTOR: f32 = 0.3;
/// Per-frame interpolation factor toward the predicted position
const ACCEL_FACTOR: f32 = 0.45;

/// A pointer position in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    fn lerp(&self, target: Point, factor: f32) -> Point {
        Point {
            x: self.x + (target.x - self.x) * factor,
            y: self.y + (target.y - self.y) * factor,
        }
    }
}

/// How the rendered drag position follows the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    /// Raw position every frame, no smoothing
    Precise,
    /// Exponential interpolation toward the raw position
    #[default]
    Smooth,
    /// Stronger interpolation toward the predicted position
    Accelerated,
}

impl MovementMode {
    pub fn name(&self) -> &'static str {
        match self {
            MovementMode::Precise => "precise",
            MovementMode::Smooth => "smooth",
            MovementMode::Accelerated => "accelerated",
        }
    }

    pub fn from_name(name: &str) -> MovementMode {
        match name {
            "precise" => MovementMode::Precise,
            "accelerated" => MovementMode::Accelerated,
            _ => MovementMode::Smooth,
        }
    }

    pub fn all() -> &'static [MovementMode] {
        &[
            MovementMode::Precise,
            MovementMode::Smooth,
            MovementMode::Accelerated,
        ]
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    pos: Point,
    t_ms: u64,
}

/// Bounded ring buffer of recent pointer samples, alive only during a drag
#[derive(Debug, Clone, Default)]
pub struct PointerTrail {
    samples: VecDeque<Sample>,
}

impl PointerTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pos: Point, t_ms: u64) {
        if self.samples.len() == TRAIL_LEN {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { pos, t_ms });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Extrapolate the raw point along the trail's average velocity.
    /// Returns the raw point unchanged with fewer than 3 samples or when
    /// the elapsed span is below the noise floor.
    pub fn predict(&self, raw: Point) -> Point {
        if self.samples.len() < 3 {
            return raw;
        }
        let oldest = self.samples.front().expect("trail is non-empty");
        let newest = self.samples.back().expect("trail is non-empty");
        let elapsed_ms = newest.t_ms.saturating_sub(oldest.t_ms);
        if elapsed_ms < NOISE_FLOOR_MS {
            return raw;
        }
        let dt = elapsed_ms as f32 / 1000.0;
        let vx = (newest.pos.x - oldest.pos.x) / dt;
        let vy = (newest.pos.y - oldest.pos.y) / dt;
        Point {
            x: raw.x + vx * LEAD_TIME_SECS,
            y: raw.y + vy * LEAD_TIME_SECS,
        }
    }
}

/// Per-gesture drag state: trail plus the smoothed render position
#[derive(Debug, Clone)]
pub struct DragTracker {
    trail: PointerTrail,
    mode: MovementMode,
    raw: Point,
    smoothed: Point,
}

impl DragTracker {
    /// Start a gesture at the initial pointer position
    pub fn start(mode: MovementMode, pos: Point, t_ms: u64) -> Self {
        let mut trail = PointerTrail::new();
        trail.push(pos, t_ms);
        Self {
            trail,
            mode,
            raw: pos,
            smoothed: pos,
        }
    }

    /// Record a pointer-move sample
    pub fn sample(&mut self, pos: Point, t_ms: u64) {
        self.raw = pos;
        self.trail.push(pos, t_ms);
    }

    /// Advance smoothing one frame; called on every animation tick, with or
    /// without new input
    pub fn tick(&mut self) {
        match self.mode {
            MovementMode::Precise => {
                self.smoothed = self.raw;
            }
            MovementMode::Smooth => {
                self.smoothed = self.smoothed.lerp(self.raw, SMOOTH_FACTOR);
            }
            MovementMode::Accelerated => {
                let target = self.trail.predict(self.raw);
                self.smoothed = self.smoothed.lerp(target, ACCEL_FACTOR);
            }
        }
    }

    /// Position the renderer should draw this frame
    pub fn render_pos(&self) -> Point {
        self.smoothed
    }

    /// Resolve the final decision point for a release at `raw`: the raw
    /// point when it sits within the precision radius of the smoothed
    /// position, otherwise the smoothed position
    pub fn release(&self, raw: Point) -> Point {
        if raw.distance(self.smoothed) <= PRECISION_RADIUS {
            raw
        } else {
            self.smoothed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_needs_three_samples() {
        let mut trail = PointerTrail::new();
        let raw = Point::new(50.0, 50.0);
        assert_eq!(trail.predict(raw), raw);
        trail.push(Point::new(0.0, 0.0), 0);
        trail.push(Point::new(10.0, 0.0), 20);
        assert_eq!(trail.predict(raw), raw);
        trail.push(Point::new(20.0, 0.0), 40);
        assert_ne!(trail.predict(raw), raw);
    }

    #[test]
    fn test_predict_noise_floor() {
        let mut trail = PointerTrail::new();
        trail.push(Point::new(0.0, 0.0), 0);
        trail.push(Point::new(40.0, 0.0), 3);
        trail.push(Point::new(80.0, 0.0), 6);
        let raw = Point::new(80.0, 0.0);
        assert_eq!(trail.predict(raw), raw);
    }

    #[test]
    fn test_predict_extrapolates_velocity() {
        let mut trail = PointerTrail::new();
        trail.push(Point::new(0.0, 0.0), 0);
        trail.push(Point::new(50.0, 0.0), 50);
        trail.push(Point::new(100.0, 0.0), 100);
        // 1000 px/s rightward, 60 ms lead
        let predicted = trail.predict(Point::new(100.0, 0.0));
        assert!((predicted.x - 160.0).abs() < 0.01);
        assert!((predicted.y - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut trail = PointerTrail::new();
        for i in 0..20 {
            trail.push(Point::new(i as f32, 0.0), i * 16);
        }
        assert_eq!(trail.len(), TRAIL_LEN);
        // Oldest surviving sample is i=14
        trail.push(Point::new(100.0, 0.0), 400);
        assert_eq!(trail.len(), TRAIL_LEN);
    }

    #[test]
    fn test_precise_mode_tracks_raw() {
        let mut drag = DragTracker::start(MovementMode::Precise, Point::new(0.0, 0.0), 0);
        drag.sample(Point::new(100.0, 40.0), 16);
        drag.tick();
        assert_eq!(drag.render_pos(), Point::new(100.0, 40.0));
    }

    #[test]
    fn test_smooth_mode_lags_raw() {
        let mut drag = DragTracker::start(MovementMode::Smooth, Point::new(0.0, 0.0), 0);
        drag.sample(Point::new(100.0, 0.0), 16);
        drag.tick();
        let pos = drag.render_pos();
        assert!((pos.x - 30.0).abs() < 0.01);
        // Repeated ticks converge without new input
        for _ in 0..50 {
            drag.tick();
        }
        assert!((drag.render_pos().x - 100.0).abs() < 1.0);
    }

    #[test]
    fn test_release_precision_override() {
        let mut drag = DragTracker::start(MovementMode::Smooth, Point::new(0.0, 0.0), 0);
        drag.sample(Point::new(100.0, 0.0), 16);
        drag.tick();
        // Smoothed is at ~30; a far raw point loses to the smoothed one
        let far = Point::new(100.0, 0.0);
        assert_eq!(drag.release(far), drag.render_pos());
        // A nearby raw point wins
        let near = Point::new(35.0, 0.0);
        assert_eq!(drag.release(near), near);
    }
}
