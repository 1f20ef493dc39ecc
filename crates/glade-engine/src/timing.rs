//! Frame timing.
//!
//! Frames advance either on a simulated clock (one `frame_dt` per frame,
//! deterministic) or on the wall clock. Physics runs on a fixed timestep fed
//! by an accumulator.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum fixed updates per frame before the accumulator is dropped.
const MAX_FIXED_UPDATES: u32 = 10;

/// Which clock drives frame deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    /// Every frame lasts exactly the frame budget.
    Simulated,
    /// Frames are measured and paced against the wall clock.
    Realtime,
}

/// Frame timing manager.
#[derive(Debug)]
pub struct FrameTiming {
    /// Clock driving the deltas
    mode: ClockMode,
    /// Time budget per frame
    frame_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Accumulator for fixed timestep
    accumulator: f32,
    /// Fixed timestep delta (for physics)
    fixed_dt: f32,
    /// Maximum delta time to prevent spiral of death
    max_dt: f32,
    /// Recent frame times for averaging
    frame_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
}

impl FrameTiming {
    /// Create a frame timing manager.
    #[must_use]
    pub fn new(mode: ClockMode, target_fps: u32, fixed_hz: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            mode,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            last_frame: Instant::now(),
            accumulator: 0.0,
            fixed_dt: 1.0 / fixed_hz.max(1) as f32,
            max_dt: 0.25,
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
        }
    }

    /// Get the fixed timestep value.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Delta time for the frame that is starting.
    /// Also stores the frame time for FPS calculation.
    pub fn delta_time(&mut self) -> f32 {
        let dt = match self.mode {
            ClockMode::Simulated => self.frame_budget.as_secs_f32(),
            ClockMode::Realtime => {
                let now = Instant::now();
                let dt = (now - self.last_frame).as_secs_f32();
                self.last_frame = now;
                dt
            },
        };

        // Clamp to prevent spiral of death
        let clamped_dt = dt.min(self.max_dt);

        self.frame_times.push_back(clamped_dt);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }

        clamped_dt
    }

    /// Accumulate time for fixed timestep updates.
    /// Returns the number of fixed updates that should be performed.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut count = 0;

        while self.accumulator >= self.fixed_dt && count < MAX_FIXED_UPDATES {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Still behind: drop the backlog
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }

    /// Sleep for the remainder of the frame budget on the wall clock.
    pub fn sleep_remainder(&self) {
        if self.mode == ClockMode::Simulated {
            return;
        }

        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    /// Get the current FPS (averaged over recent frames).
    #[must_use]
    pub fn current_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let avg_frame_time: f32 = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;

        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }

    /// Reset timing (call after pause or loading).
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.accumulator = 0.0;
        self.frame_times.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_delta_is_fixed() {
        let mut timing = FrameTiming::new(ClockMode::Simulated, 50, 50);
        std::thread::sleep(Duration::from_millis(5));
        assert!((timing.delta_time() - 0.02).abs() < 1e-6);
        assert!((timing.delta_time() - 0.02).abs() < 1e-6);
        assert!((timing.current_fps() - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_realtime_delta_clamped() {
        let mut timing = FrameTiming::new(ClockMode::Realtime, 60, 50);
        std::thread::sleep(Duration::from_millis(300));
        let dt = timing.delta_time();
        assert!(dt <= timing.max_dt);
    }

    #[test]
    fn test_fixed_steps_per_frame() {
        // 60 fps frames against 50 Hz physics: 5 steps every 6 frames
        let mut timing = FrameTiming::new(ClockMode::Simulated, 60, 50);
        let mut steps = 0;
        for _ in 0..60 {
            let dt = timing.delta_time();
            steps += timing.accumulate(dt);
        }
        assert!((49..=50).contains(&steps));
    }

    #[test]
    fn test_accumulate_spiral_prevention() {
        let mut timing = FrameTiming::new(ClockMode::Simulated, 60, 60);
        let updates = timing.accumulate(1.0);
        assert_eq!(updates, MAX_FIXED_UPDATES);
        assert_eq!(timing.accumulator, 0.0);
    }

    #[test]
    fn test_reset_timing() {
        let mut timing = FrameTiming::new(ClockMode::Simulated, 60, 50);
        timing.accumulator = 0.5;
        timing.frame_times.push_back(0.016);

        timing.reset();

        assert_eq!(timing.accumulator, 0.0);
        assert!(timing.frame_times.is_empty());
        assert_eq!(timing.current_fps(), 0.0);
    }
}
