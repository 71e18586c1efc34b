use std::time::{Duration, Instant};

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimeSample {
    /// Elapsed wall-clock time in seconds since the loop started.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    /// Creates a new time sample.
    pub(crate) fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Time source backed by the system monotonic clock.
///
/// Owns the loop's timing state explicitly instead of leaning on process-wide
/// statics; the origin is captured when the render loop enters its running
/// state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    /// Creates a system time source initialised to `Instant::now()`.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Produces a time sample for the next frame.
    pub(crate) fn sample(&mut self) -> TimeSample {
        let elapsed = self.origin.elapsed();
        let sample = TimeSample::new(elapsed.as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

/// Schedules redraws for the event loop.
///
/// Without a target FPS every `AboutToWait` turn is ready, so frames run as
/// fast as the swapchain lets them. With a cap, a deadline is armed after each
/// presented frame and the loop sleeps until it passes.
pub(crate) struct FramePacer {
    interval: Option<Duration>,
    next_deadline: Option<Instant>,
}

impl FramePacer {
    pub(crate) fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));
        Self {
            interval,
            next_deadline: None,
        }
    }

    pub(crate) fn ready_for_frame(&self, now: Instant) -> bool {
        match self.next_deadline {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    pub(crate) fn mark_rendered(&mut self, now: Instant) {
        self.next_deadline = self.interval.map(|interval| now + interval);
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_time_samples_are_monotonic() {
        let mut source = SystemTimeSource::new();
        let mut previous = source.sample();
        for _ in 0..100 {
            let next = source.sample();
            assert!(next.seconds >= previous.seconds);
            assert_eq!(next.frame_index, previous.frame_index + 1);
            previous = next;
        }
    }

    #[test]
    fn uncapped_pacer_is_always_ready() {
        let mut pacer = FramePacer::new(None);
        let now = Instant::now();
        assert!(pacer.ready_for_frame(now));
        pacer.mark_rendered(now);
        assert!(pacer.ready_for_frame(now));
        assert_eq!(pacer.next_deadline(), None);
    }

    #[test]
    fn zero_fps_means_uncapped() {
        let mut pacer = FramePacer::new(Some(0.0));
        pacer.mark_rendered(Instant::now());
        assert_eq!(pacer.next_deadline(), None);
    }

    #[test]
    fn capped_pacer_spaces_frames_at_the_interval() {
        let mut pacer = FramePacer::new(Some(60.0));
        let now = Instant::now();
        assert!(pacer.ready_for_frame(now));

        pacer.mark_rendered(now);
        let deadline = pacer.next_deadline().expect("deadline armed after frame");
        assert_eq!(deadline - now, Duration::from_secs_f64(1.0 / 60.0));
        assert!(!pacer.ready_for_frame(now));
        assert!(pacer.ready_for_frame(deadline));
    }
}
