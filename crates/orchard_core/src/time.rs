//! Fixed-timestep scheduling.
//!
//! The host feeds one wall-clock delta per rendered frame. The delta is capped
//! at `max_frame_dt` so a debugger pause or a backgrounded window cannot queue
//! an unbounded burst of catch-up steps, then added to an accumulator that is
//! drained in `fixed_dt` slices. Anything smaller than a slice carries over to
//! the next frame.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub const DEFAULT_FIXED_DT: f64 = 1.0 / 60.0;
pub const DEFAULT_MAX_FRAME_DT: f64 = 0.25;

pub struct FixedStepScheduler {
    pub fixed_dt: f64,
    pub max_frame_dt: f64,
    accumulator: f64,
    /// Simulated time, i.e. `fixed_step_count * fixed_dt`.
    pub total_time: f64,
    /// Wall time accepted into the accumulator, after capping.
    pub fed_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Option<Instant>,
    pub interpolation_alpha: f64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FixedStepScheduler {
    pub fn new(fixed_dt: f64, max_frame_dt: f64) -> Self {
        Self {
            fixed_dt,
            max_frame_dt,
            accumulator: 0.0,
            total_time: 0.0,
            fed_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: None,
            interpolation_alpha: 0.0,
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    /// Wall-clock seconds since the previous call. The first call returns 0.
    pub fn measure_frame(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = self
            .last_instant
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_instant = Some(now);
        elapsed
    }

    pub fn begin_frame(&mut self, frame_dt: f64) {
        // NaN and negative deltas contribute nothing.
        self.real_dt = if frame_dt >= 0.0 { frame_dt } else { 0.0 };

        // Spiral-of-death cap
        if self.real_dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms, capping to {:.1}ms",
                self.real_dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            self.real_dt = self.max_frame_dt;
        }

        self.accumulator += self.real_dt;
        self.fed_time += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&mut self) {
        self.interpolation_alpha = self.accumulator / self.fixed_dt;
    }

    /// Runs one whole frame: accumulate `frame_dt`, then call `update` with
    /// `fixed_dt` once per whole slice. Returns the number of updates run.
    pub fn advance<F: FnMut(f64)>(&mut self, frame_dt: f64, mut update: F) -> u32 {
        self.begin_frame(frame_dt);
        while self.should_step() {
            update(self.fixed_dt);
        }
        self.end_frame();
        self.steps_this_frame
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Upper bound on updates a single frame can trigger.
    pub fn max_steps_per_frame(&self) -> u32 {
        (self.max_frame_dt / self.fixed_dt).floor() as u32
    }
}

impl Default for FixedStepScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_DT, DEFAULT_MAX_FRAME_DT)
    }
}
