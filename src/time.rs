//! Frame clock.
//!
//! Produces the per-frame delta fed to the animator and the camera. Deltas
//! are clamped to [`Time::max_delta`] so a stalled frame (window drag,
//! debugger pause, tab switch) cannot fling debris across the scene.
//!
//! ```ignore
//! let mut time = Time::new();
//! // once per redraw:
//! let dt = time.update();
//! scheduler.step(&mut scene, pointer, dt);
//! ```

use std::time::{Duration, Instant};

/// Default upper bound on a single frame delta, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Wall-clock frame timing with pause, scaling and delta clamping.
#[derive(Debug)]
pub struct Time {
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    /// Replaces the measured delta when set.
    fixed_delta: Option<f32>,
    time_scale: f32,
    max_delta: f32,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Measure the time since the previous call and return the frame delta.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.advance(self.fixed_delta.unwrap_or(raw))
    }

    /// Advance by an externally supplied raw delta.
    ///
    /// Applies pause, time scale and clamping exactly like [`Time::update`];
    /// used for deterministic stepping.
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        self.frame_count += 1;

        if self.paused || !raw_delta.is_finite() {
            self.delta_secs = 0.0;
            return 0.0;
        }

        self.delta_secs = (raw_delta.max(0.0) * self.time_scale).min(self.max_delta);
        self.elapsed_secs += self.delta_secs;
        self.delta_secs
    }

    /// Scaled seconds accumulated while running.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Delta produced by the last update.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed twice a second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    #[inline]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Speed multiplier; negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Upper bound on a frame delta; non-positive values are ignored.
    pub fn set_max_delta(&mut self, max_delta: f32) {
        if max_delta > 0.0 {
            self.max_delta = max_delta;
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert!(!time.is_paused());
        assert_eq!(time.time_scale(), 1.0);
        assert_eq!(time.max_delta(), DEFAULT_MAX_DELTA);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let delta = time.update();

        assert!(delta > 0.0);
        assert!(time.elapsed() > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut time = Time::new();
        assert_eq!(time.advance(2.5), 0.1);

        time.set_max_delta(0.05);
        assert_eq!(time.advance(0.2), 0.05);

        time.set_max_delta(-1.0);
        assert_eq!(time.max_delta(), 0.05);
    }

    #[test]
    fn test_time_pause() {
        let mut time = Time::new();
        time.advance(0.016);

        time.pause();
        let elapsed_before = time.elapsed();
        assert_eq!(time.advance(0.016), 0.0);
        assert_eq!(time.elapsed(), elapsed_before);

        time.toggle_pause();
        assert!(!time.is_paused());
        assert!(time.advance(0.016) > 0.0);
    }

    #[test]
    fn test_time_scale() {
        let mut time = Time::new();
        time.set_time_scale(0.5);
        assert!((time.advance(0.02) - 0.01).abs() < 1e-6);

        time.set_time_scale(-1.0);
        assert_eq!(time.time_scale(), 0.0);
    }

    #[test]
    fn test_bad_delta_is_zero() {
        let mut time = Time::new();
        assert_eq!(time.advance(f32::NAN), 0.0);
        assert_eq!(time.advance(-0.5), 0.0);
    }

    #[test]
    fn test_fixed_delta() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(1.0 / 60.0));

        thread::sleep(Duration::from_millis(100));
        time.update();

        assert!((time.delta() - 1.0 / 60.0).abs() < 0.0001);
    }
}
