use tracing::debug;

/// Speed applied while the screen is long-pressed.
pub const DEFAULT_LONG_PRESS_SPEED: f32 = 2.5;

/// Presets offered by the speed menu, in cycling order.
pub const DEFAULT_SPEEDS: [f32; 8] = [0.75, 1.0, 1.25, 1.5, 1.75, 2.0, 2.5, 3.0];

/// Temporary speed boost with a single save slot for the speed to restore.
#[derive(Debug, Clone)]
pub struct SpeedOverride {
    override_speed: f32,
    saved: Option<f32>,
}

impl Default for SpeedOverride {
    fn default() -> Self {
        Self::new(DEFAULT_LONG_PRESS_SPEED)
    }
}

impl SpeedOverride {
    pub fn new(override_speed: f32) -> Self {
        Self {
            override_speed,
            saved: None,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.saved.is_some()
    }

    pub fn saved_speed(&self) -> Option<f32> {
        self.saved
    }

    /// Start the override and return the speed to apply.
    ///
    /// Only the first call saves `current`; engaging again while engaged keeps
    /// the originally saved speed.
    pub fn engage(&mut self, current: f32) -> f32 {
        if self.saved.is_none() {
            debug!(
                "Speed override {}x engaged, saving {}x",
                self.override_speed, current
            );
            self.saved = Some(current);
        }
        self.override_speed
    }

    /// End the override and return the saved speed to restore, if any.
    pub fn release(&mut self) -> Option<f32> {
        let restored = self.saved.take();
        if let Some(speed) = restored {
            debug!("Speed override released, restoring {}x", speed);
        }
        restored
    }
}

/// Next preset after `current`, wrapping around. An unknown speed moves to
/// the first preset.
pub fn next_speed(current: f32, available: &[f32]) -> Option<f32> {
    if available.is_empty() {
        return None;
    }
    let next = available
        .iter()
        .position(|&speed| (speed - current).abs() < f32::EPSILON)
        .map_or(0, |i| (i + 1) % available.len());
    available.get(next).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engage_and_release() {
        let mut boost = SpeedOverride::default();
        assert_eq!(boost.engage(1.25), 2.5);
        assert!(boost.is_engaged());
        assert_eq!(boost.release(), Some(1.25));
        assert!(!boost.is_engaged());
        assert_eq!(boost.release(), None);
    }

    #[test]
    fn test_reengage_keeps_first_saved_speed() {
        let mut boost = SpeedOverride::new(3.0);
        boost.engage(1.0);
        boost.engage(3.0);
        assert_eq!(boost.saved_speed(), Some(1.0));
        assert_eq!(boost.release(), Some(1.0));
    }

    #[test]
    fn test_next_speed_cycles() {
        assert_eq!(next_speed(1.0, &DEFAULT_SPEEDS), Some(1.25));
        assert_eq!(next_speed(3.0, &DEFAULT_SPEEDS), Some(0.75));
        assert_eq!(next_speed(1.1, &DEFAULT_SPEEDS), Some(0.75));
        assert_eq!(next_speed(1.0, &[]), None);
    }
}
