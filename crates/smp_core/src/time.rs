use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Wall-clock frame timer for a variable-timestep loop.
///
/// Each rendered frame runs exactly one simulation update with the measured
/// delta. The delta is capped so a long stall (window drag, breakpoint)
/// cannot teleport bodies through platforms.
pub struct FrameClock {
    pub max_frame_dt: f32,
    pub total_time: f64,
    pub frame_count: u64,
    pub real_dt: f32,
    last_instant: Instant,

    fps_samples: [f32; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f32,
    pub smoothed_frame_time_ms: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            max_frame_dt: 0.25,
            total_time: 0.0,
            frame_count: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Restart measurement from now. Called once after startup work so the
    /// first frame does not absorb window/GPU initialisation time.
    pub fn reset(&mut self) {
        self.last_instant = Instant::now();
    }

    /// Measure the time since the previous call and return it in seconds.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let measured = now.duration_since(self.last_instant).as_secs_f32();
        self.last_instant = now;
        self.record(measured)
    }

    fn record(&mut self, measured: f32) -> f32 {
        self.real_dt = measured;
        if self.real_dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms, capping delta to {}ms",
                self.real_dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            self.real_dt = self.max_frame_dt;
        }

        self.total_time += self.real_dt as f64;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f32 = self.fps_samples.iter().sum::<f32>() / FPS_SAMPLE_COUNT as f32;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        self.real_dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
