//! Volume control
//!
//! Linear 0.0-1.0 level as understood by every playback backend, plus a
//! mute flag that preserves the level.

/// Volume controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// The level is clamped into `[0.0, 1.0]`.
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level),
            muted: false,
        }
    }

    /// Set volume level, clamped into `[0.0, 1.0]`
    ///
    /// Returns the level actually stored.
    pub fn set_level(&mut self, level: f32) -> f32 {
        self.level = Self::clamp(level);
        self.level
    }

    /// Get current volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level to hand to the backend: 0.0 while muted
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    // NaN clamps to silence
    fn clamp(level: f32) -> f32 {
        if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_levels() {
        let mut volume = Volume::default();

        assert_eq!(volume.set_level(1.5), 1.0);
        assert_eq!(volume.set_level(-0.2), 0.0);
        assert_eq!(volume.set_level(0.35), 0.35);
        assert_eq!(volume.set_level(f32::NAN), 0.0);
        assert_eq!(Volume::new(7.0).level(), 1.0);
    }

    #[test]
    fn mute_preserves_level() {
        let mut volume = Volume::new(0.6);

        volume.mute();
        assert!(volume.is_muted());
        assert_eq!(volume.effective(), 0.0);
        assert_eq!(volume.level(), 0.6);

        volume.toggle_mute();
        assert!(!volume.is_muted());
        assert_eq!(volume.effective(), 0.6);
    }

    #[test]
    fn unmute_after_level_change_uses_new_level() {
        let mut volume = Volume::new(0.8);
        volume.mute();
        volume.set_level(0.3);
        volume.unmute();
        assert_eq!(volume.effective(), 0.3);
    }
}
