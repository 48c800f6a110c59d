use serde::Serialize;

/// Timing information for the frame being processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Time {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Seconds since the clock started, at the start of this frame.
    pub elapsed: f32,
    pub frame: u64,
}

/// Monotonic frame clock driven by the host loop.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    current: Time,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a frame lasting `dt` seconds and return its timing.
    pub fn begin_frame(&mut self, dt: f32) -> Time {
        self.current.delta = dt.max(0.0);
        self.current
    }

    /// Close the current frame, accumulating its delta.
    pub fn end_frame(&mut self) {
        self.current.elapsed += self.current.delta;
        self.current.frame += 1;
    }

    pub fn now(&self) -> Time {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates_elapsed() {
        let mut clock = FrameClock::new();
        let t0 = clock.begin_frame(0.5);
        assert_eq!(t0.elapsed, 0.0);
        assert_eq!(t0.frame, 0);
        clock.end_frame();

        let t1 = clock.begin_frame(0.25);
        assert_eq!(t1.elapsed, 0.5);
        assert_eq!(t1.delta, 0.25);
        assert_eq!(t1.frame, 1);
        clock.end_frame();
        assert_eq!(clock.now().elapsed, 0.75);
    }

    #[test]
    fn negative_delta_is_clamped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.begin_frame(-1.0).delta, 0.0);
    }
}
