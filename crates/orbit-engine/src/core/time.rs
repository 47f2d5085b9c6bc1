/// Frame clock feeding absolute time to the orbit systems.
/// Every animation samples `now()`, so the clock only has to be monotonic;
/// long frames (a backgrounded tab) are clamped so nothing jumps.
pub struct FrameClock {
    /// Largest frame delta accepted, in seconds.
    max_dt: f32,
    now: f32,
    frames: u64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            max_dt: max_dt.max(0.0),
            now: 0.0,
            frames: 0,
        }
    }

    /// Add a frame delta. Negative and non-finite deltas count as zero.
    /// Returns the new absolute time.
    pub fn advance(&mut self, frame_dt: f32) -> f32 {
        let dt = if frame_dt.is_finite() { frame_dt.clamp(0.0, self.max_dt) } else { 0.0 };
        self.now += dt;
        self.frames += 1;
        self.now
    }

    /// Seconds since the clock started.
    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_frames() {
        let mut clock = FrameClock::new(0.1);
        clock.advance(1.0 / 60.0);
        clock.advance(1.0 / 60.0);
        assert!((clock.now() - 2.0 / 60.0).abs() < 1e-6);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn clamps_long_frames() {
        let mut clock = FrameClock::new(0.1);
        let now = clock.advance(5.0); // backgrounded tab
        assert!((now - 0.1).abs() < 1e-6);
    }

    #[test]
    fn ignores_bad_deltas() {
        let mut clock = FrameClock::new(0.1);
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.now(), 0.0);
    }
}
