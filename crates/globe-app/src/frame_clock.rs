//! Frame counting and once-a-second FPS reporting.
//!
//! The globe advances per frame rather than per elapsed second, so the clock
//! only measures; it never drives the animation.

use std::time::{Duration, Instant};

/// Interval between FPS reports.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Counts frames and measures the rate over each report interval.
pub struct FrameClock {
    window_start: Instant,
    frames_in_window: u32,
    frame_count: u64,
    last_fps: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            frame_count: 0,
            last_fps: None,
        }
    }

    /// Record a frame now. Returns the frame rate when a report interval
    /// has elapsed.
    pub fn tick(&mut self) -> Option<f64> {
        self.tick_at(Instant::now())
    }

    /// Record a frame at an explicit instant.
    pub fn tick_at(&mut self, now: Instant) -> Option<f64> {
        self.frame_count += 1;
        self.frames_in_window += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < REPORT_INTERVAL {
            return None;
        }
        let fps = f64::from(self.frames_in_window) / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames_in_window = 0;
        self.last_fps = Some(fps);
        Some(fps)
    }

    /// Total frames recorded.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Rate from the most recent completed interval.
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
