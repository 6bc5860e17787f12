//! Frame timing and sprite motion for the demo loop

use std::collections::VecDeque;
use std::time::Instant;

use crate::geometry::Point;

/// Longest step fed to the simulation, so a stalled frame (window drag,
/// debugger) does not teleport the sprite
const MAX_STEP: f32 = 0.1;

// ============================================================================
// Frame Clock
// ============================================================================

/// Frame delta timing with a rolling FPS average
pub struct FrameClock {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FrameClock {
    pub fn new(sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count,
        }
    }

    /// Call once per frame. Returns the clamped delta time in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt)
    }

    fn record(&mut self, dt: f32) -> f32 {
        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }
        dt.min(MAX_STEP)
    }

    /// Average FPS over the sample window
    pub fn average_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg_dt = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }
}

// ============================================================================
// Bouncer
// ============================================================================

/// Moves a box of `size` pixels back and forth across an area, letting it
/// run `overshoot` pixels past every edge before turning around
#[derive(Debug, Clone, PartialEq)]
pub struct Bouncer {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    min: (f32, f32),
    max: (f32, f32),
}

impl Bouncer {
    pub fn new(area: (u32, u32), size: (u32, u32), velocity: (f32, f32), overshoot: f32) -> Self {
        let min = (-overshoot, -overshoot);
        let max = (
            area.0 as f32 - size.0 as f32 + overshoot,
            area.1 as f32 - size.1 as f32 + overshoot,
        );
        Self {
            x: (min.0 + max.0) * 0.5,
            y: (min.1 + max.1) * 0.5,
            vx: velocity.0,
            vy: velocity.1,
            min,
            max,
        }
    }

    pub fn update(&mut self, dt: f32) {
        (self.x, self.vx) = bounce_axis(self.x + self.vx * dt, self.vx, self.min.0, self.max.0);
        (self.y, self.vy) = bounce_axis(self.y + self.vy * dt, self.vy, self.min.1, self.max.1);
    }

    /// Top-left corner, rounded to the pixel grid
    pub fn position(&self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// Reflect a coordinate off [min, max]. A range that has collapsed (box
/// larger than the area) pins the coordinate to its midpoint.
fn bounce_axis(pos: f32, vel: f32, min: f32, max: f32) -> (f32, f32) {
    if max <= min {
        ((min + max) * 0.5, vel)
    } else if pos < min {
        ((2.0 * min - pos).min(max), -vel)
    } else if pos > max {
        ((2.0 * max - pos).max(min), -vel)
    } else {
        (pos, vel)
    }
}
