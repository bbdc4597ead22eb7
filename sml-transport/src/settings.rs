//! Transport configuration

/// Default upper bound for one frame, start marker through CRC
pub const DEFAULT_MAX_FRAME_SIZE: usize = 8096;

/// Smallest frame: start marker plus end trailer
pub const MIN_FRAME_SIZE: usize = 16;

/// Frame reader settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    pub max_frame_size: usize,
    /// Also accept frames sealed with CRC-16/Kermit, as sent by some
    /// meter firmwares. Off by default.
    pub accept_kermit_crc: bool,
}

impl TransportSettings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            accept_kermit_crc: false,
        }
    }

    /// Create settings with a frame size limit
    ///
    /// Limits below [`MIN_FRAME_SIZE`] are raised to it.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        if max_frame_size < MIN_FRAME_SIZE {
            log::warn!(
                "max frame size {} below minimum, using {}",
                max_frame_size,
                MIN_FRAME_SIZE
            );
        }
        Self {
            max_frame_size: max_frame_size.max(MIN_FRAME_SIZE),
            ..Self::new()
        }
    }

    /// Enable or disable the CRC-16/Kermit frame checksum fallback
    pub fn with_kermit_crc(mut self, accept: bool) -> Self {
        self.accept_kermit_crc = accept;
        self
    }
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = TransportSettings::default();
        assert_eq!(settings.max_frame_size, 8096);
        assert!(!settings.accept_kermit_crc);
    }

    #[test]
    fn test_kermit_opt_in() {
        let settings = TransportSettings::with_max_frame_size(64).with_kermit_crc(true);
        assert!(settings.accept_kermit_crc);
        assert_eq!(settings.max_frame_size, 64);
    }

    #[test]
    fn test_minimum_frame_size() {
        assert_eq!(TransportSettings::with_max_frame_size(4).max_frame_size, 16);
        assert_eq!(TransportSettings::with_max_frame_size(64).max_frame_size, 64);
    }
}
