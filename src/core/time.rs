//! Frame clock

/// Tracks the per-frame timestep and total elapsed time
#[derive(Debug, Clone, Default)]
pub struct Time {
    delta: f32,
    elapsed: f64,
    frame: u64,
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by an already clamped frame delta
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt;
        self.elapsed += f64::from(dt);
        self.frame += 1;
    }

    /// Clamped delta of the current frame, in seconds
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Seconds simulated since the clock started
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of frames advanced
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut time = Time::new();
        time.advance(0.05);
        time.advance(0.02);

        assert_eq!(time.delta(), 0.02);
        assert!((time.elapsed() - 0.07).abs() < 1e-6);
        assert_eq!(time.frame(), 2);
    }
}
