//! Frame timing helpers

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// Session Clock
// ============================================================================

/// Monotonic milliseconds since the session began
pub struct SessionClock {
    start: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

// ============================================================================
// Frame Pacer
// ============================================================================

/// Sleeps out the rest of each frame when vsync is not doing it for us
pub struct FramePacer {
    frame_time: Option<Duration>,
    last: Instant,
}

impl FramePacer {
    /// `fps == 0` disables pacing
    pub fn new(fps: u32) -> Self {
        Self {
            frame_time: (fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(fps))),
            last: Instant::now(),
        }
    }

    /// Block until one frame period has passed since the previous call
    pub fn wait(&mut self) {
        if let Some(frame_time) = self.frame_time {
            let spent = self.last.elapsed();
            if spent < frame_time {
                thread::sleep(frame_time - spent);
            }
        }
        self.last = Instant::now();
    }
}

// ============================================================================
// FPS Counter
// ============================================================================

/// FPS counter with rolling average
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    /// Create a new FPS counter with specified sample window
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count,
        }
    }

    /// Call once per frame. Returns the average fps over the window.
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
        let avg_dt = self.avg_frame_time_ms() / 1000.0;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }

    /// Get the average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        avg_dt * 1000.0
    }

    /// Get min/max FPS from sample window
    pub fn min_max_fps(&self) -> (f32, f32) {
        if self.frame_times.is_empty() {
            return (0.0, 0.0);
        }
        let min_dt = self
            .frame_times
            .iter()
            .cloned()
            .fold(f32::INFINITY, f32::min);
        let max_dt = self.frame_times.iter().cloned().fold(0.0, f32::max);
        let max_fps = if min_dt > 0.0 { 1.0 / min_dt } else { 0.0 };
        let min_fps = if max_dt > 0.0 { 1.0 / max_dt } else { 0.0 };
        (min_fps, max_fps)
    }

    /// One-line summary for the overlay
    pub fn summary(&self) -> String {
        let (min_fps, max_fps) = self.min_max_fps();
        let avg_ms = self.avg_frame_time_ms();
        let avg_fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };
        format!(
            "FPS {} AVG {} MIN {} MAX",
            avg_fps as u32, min_fps as u32, max_fps as u32
        )
    }
}
