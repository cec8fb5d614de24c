use std::time::{Duration, Instant};

/// Loop health over one logging window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    /// Ticks short of the target rate over the window.
    pub ticks_behind: u32,
}

#[derive(Debug)]
pub(crate) struct LoopStats {
    target_tps: u32,
    window: Duration,
    window_start: Instant,
    last_frame: Instant,
    frames: u32,
    ticks: u32,
    frame_time_total: Duration,
}

impl LoopStats {
    pub(crate) fn new(target_tps: u32, window: Duration, now: Instant) -> Self {
        Self {
            target_tps,
            window,
            window_start: now,
            last_frame: now,
            frames: 0,
            ticks: 0,
            frame_time_total: Duration::ZERO,
        }
    }

    pub(crate) fn frame_presented(&mut self, now: Instant) {
        self.frames = self.frames.saturating_add(1);
        let frame_time = now.saturating_duration_since(self.last_frame);
        self.frame_time_total = self.frame_time_total.saturating_add(frame_time);
        self.last_frame = now;
    }

    pub(crate) fn tick_ran(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Closes the window and resets the counters once `window` has elapsed.
    pub(crate) fn take_if_due(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let expected_ticks = (seconds * self.target_tps as f32).floor() as u32;
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms: match self.frames {
                0 => 0.0,
                frames => self.frame_time_total.as_secs_f32() * 1000.0 / frames as f32,
            },
            ticks_behind: expected_ticks.saturating_sub(self.ticks),
        };

        self.window_start = now;
        self.frames = 0;
        self.ticks = 0;
        self.frame_time_total = Duration::ZERO;
        Some(snapshot)
    }
}
