use std::collections::VecDeque;

#[cfg(target_arch = "wasm32")]
use web_sys::Performance;

// Platform-specific timing
#[cfg(not(target_arch = "wasm32"))]
type PlatformInstant = std::time::Instant;

#[cfg(target_arch = "wasm32")]
type PlatformInstant = f64; // JavaScript timestamp

const MAX_FRAME_SAMPLES: usize = 60;

#[derive(Clone, Debug, Default)]
pub struct FrameSample {
    pub wall_time_ms: f64,
    pub steps: u32,
}

/// Rolling timing statistics for batches of integration steps.
pub struct StepProfiler {
    frame_start: Option<PlatformInstant>,

    #[cfg(target_arch = "wasm32")]
    performance: Option<Performance>,

    samples: VecDeque<FrameSample>,

    // Statistics
    pub avg_frame_ms: f64,
    pub max_frame_ms: f64,
    pub steps_per_second: f64,

    frame_count: u64,
    total_steps: u64,
}

impl Default for StepProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl StepProfiler {
    pub fn new() -> Self {
        Self {
            frame_start: None,
            #[cfg(target_arch = "wasm32")]
            performance: web_sys::window().and_then(|window| window.performance()),
            samples: VecDeque::new(),
            avg_frame_ms: 0.0,
            max_frame_ms: 0.0,
            steps_per_second: 0.0,
            frame_count: 0,
            total_steps: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Some(self.now());
    }

    fn now(&self) -> PlatformInstant {
        #[cfg(not(target_arch = "wasm32"))]
        {
            std::time::Instant::now()
        }
        #[cfg(target_arch = "wasm32")]
        {
            self.performance.as_ref().map_or(0.0, |p| p.now())
        }
    }

    fn elapsed_ms(&self, start: PlatformInstant) -> f64 {
        #[cfg(not(target_arch = "wasm32"))]
        {
            start.elapsed().as_secs_f64() * 1000.0
        }
        #[cfg(target_arch = "wasm32")]
        {
            self.now() - start
        }
    }

    /// Close the current frame, recording how many steps it advanced
    pub fn end_frame(&mut self, steps: u32) {
        let Some(start) = self.frame_start.take() else {
            return;
        };
        let sample = FrameSample {
            wall_time_ms: self.elapsed_ms(start),
            steps,
        };
        self.record(sample);
    }

    fn record(&mut self, sample: FrameSample) {
        self.frame_count += 1;
        self.total_steps += u64::from(sample.steps);

        self.samples.push_back(sample);
        if self.samples.len() > MAX_FRAME_SAMPLES {
            self.samples.pop_front();
        }

        self.update_statistics();
    }

    fn update_statistics(&mut self) {
        if self.samples.is_empty() {
            return;
        }

        let mut time_sum = 0.0;
        let mut step_sum = 0u64;
        let mut max_time: f64 = 0.0;

        for sample in &self.samples {
            time_sum += sample.wall_time_ms;
            step_sum += u64::from(sample.steps);
            max_time = max_time.max(sample.wall_time_ms);
        }

        self.avg_frame_ms = time_sum / self.samples.len() as f64;
        self.max_frame_ms = max_time;
        self.steps_per_second = if time_sum > 0.0 {
            step_sum as f64 / (time_sum / 1000.0)
        } else {
            0.0
        };
    }

    pub fn latest_sample(&self) -> Option<&FrameSample> {
        self.samples.back()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_statistics_over_window() {
        let mut profiler = StepProfiler::new();
        profiler.record(FrameSample {
            wall_time_ms: 2.0,
            steps: 100,
        });
        profiler.record(FrameSample {
            wall_time_ms: 6.0,
            steps: 300,
        });
        assert_relative_eq!(profiler.avg_frame_ms, 4.0);
        assert_relative_eq!(profiler.max_frame_ms, 6.0);
        // 400 steps in 8 ms
        assert_relative_eq!(profiler.steps_per_second, 50_000.0);
        assert_eq!(profiler.total_steps(), 400);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut profiler = StepProfiler::new();
        for i in 0..(MAX_FRAME_SAMPLES + 10) {
            profiler.record(FrameSample {
                wall_time_ms: i as f64,
                steps: 1,
            });
        }
        assert_eq!(profiler.samples.len(), MAX_FRAME_SAMPLES);
        assert_eq!(profiler.frame_count(), (MAX_FRAME_SAMPLES + 10) as u64);
        assert_eq!(profiler.latest_sample().map(|s| s.steps), Some(1));
    }

    #[test]
    fn test_end_without_begin_is_ignored() {
        let mut profiler = StepProfiler::new();
        profiler.end_frame(10);
        assert_eq!(profiler.frame_count(), 0);

        profiler.begin_frame();
        profiler.end_frame(10);
        assert_eq!(profiler.frame_count(), 1);
        assert_eq!(profiler.total_steps(), 10);
    }
}
