use crate::error::ConfigurationError;

/// Durations offered by the selection surface, in seconds
pub const DURATION_OPTIONS: [u64; 4] = [15, 30, 60, 120];
pub const DEFAULT_DURATION_SECS: u64 = 30;
pub const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = 2;
/// Words requested up front and again every time the stream runs out
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Settings fixed for the lifetime of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub duration_secs: u64,
    pub sample_interval_secs: u64,
    pub batch_size: usize,
}

impl SessionConfig {
    pub fn new(duration_secs: u64) -> Result<Self, ConfigurationError> {
        if duration_secs == 0 {
            return Err(ConfigurationError::InvalidDuration(duration_secs));
        }
        Ok(Self {
            duration_secs,
            ..Self::default()
        })
    }

    pub fn with_sample_interval(mut self, secs: u64) -> Result<Self, ConfigurationError> {
        if secs == 0 {
            return Err(ConfigurationError::InvalidSampleInterval);
        }
        self.sample_interval_secs = secs;
        Ok(self)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self, ConfigurationError> {
        if batch_size == 0 {
            return Err(ConfigurationError::InvalidBatchSize);
        }
        self.batch_size = batch_size;
        Ok(self)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Lifecycle of one session: Idle until the first keystroke, Running until the
/// clock runs out, then Finished until restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.duration_secs, 30);
        assert_eq!(config.sample_interval_secs, 2);
        assert_eq!(config.batch_size, 100);
    }

    #[test]
    fn test_builder_validation() {
        assert_matches!(
            SessionConfig::new(0),
            Err(ConfigurationError::InvalidDuration(0))
        );
        assert_matches!(
            SessionConfig::new(15).unwrap().with_sample_interval(0),
            Err(ConfigurationError::InvalidSampleInterval)
        );
        assert_matches!(
            SessionConfig::new(15).unwrap().with_batch_size(0),
            Err(ConfigurationError::InvalidBatchSize)
        );

        let config = SessionConfig::new(60)
            .and_then(|c| c.with_sample_interval(5))
            .and_then(|c| c.with_batch_size(10))
            .unwrap();
        assert_eq!(
            config,
            SessionConfig {
                duration_secs: 60,
                sample_interval_secs: 5,
                batch_size: 10,
            }
        );
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::default(), SessionState::Idle);
        assert_eq!(SessionState::Running.to_string(), "Running");
        assert_eq!(SessionState::Finished.to_string(), "Finished");
    }

    #[test]
    fn test_duration_options_include_default() {
        assert!(DURATION_OPTIONS.contains(&DEFAULT_DURATION_SECS));
    }
}
