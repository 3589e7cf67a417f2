use crate::consts::{BASE_FORMAT, DATE_FORMAT, DATE_TIME_FORMAT, ISO_FORMAT, TIME_FORMAT};
use crate::parse::Pattern;
use serde::{Deserialize, Serialize};
use time::UtcOffset;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    /// Pattern used when a caller passes no format
    pub base_format: String,

    /// Named patterns used by callers
    pub formats: DefaultFormats,

    /// Local offset from UTC, in minutes, that parsed values are expressed in
    pub utc_offset_minutes: i32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            base_format: BASE_FORMAT.to_owned(),
            formats: DefaultFormats::default(),
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultFormats {
    pub iso_format: String,
    pub date_time_format: String,
    pub date_format: String,
    pub time_format: String,
}

impl Default for DefaultFormats {
    fn default() -> Self {
        Self {
            iso_format: ISO_FORMAT.to_owned(),
            date_time_format: DATE_TIME_FORMAT.to_owned(),
            date_format: DATE_FORMAT.to_owned(),
            time_format: TIME_FORMAT.to_owned(),
        }
    }
}

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Offset is outside what a UTC offset can express.
    #[error("utc offset of {minutes} minutes is out of range (must be within ±23:59)")]
    InvalidOffset { minutes: i32 },

    /// A date pattern cannot identify a calendar day.
    #[error("{name} pattern {pattern:?} must contain year, month and day tokens")]
    IncompleteFormat { name: &'static str, pattern: String },
}

impl CalendarConfig {
    /// Returns the configured local offset.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidOffset` when the minutes do not form a
    /// valid offset.
    pub fn utc_offset(&self) -> Result<UtcOffset, ConfigError> {
        let invalid = ConfigError::InvalidOffset {
            minutes: self.utc_offset_minutes,
        };
        if self.utc_offset_minutes.unsigned_abs() >= 24 * 60 {
            return Err(invalid);
        }
        UtcOffset::from_whole_seconds(self.utc_offset_minutes * 60).map_err(|_| invalid)
    }

    /// Checks the offset and every pattern used for parsing. `time_format` is
    /// display-only and not checked.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.utc_offset()?;

        let date_patterns = [
            ("base_format", &self.base_format),
            ("iso_format", &self.formats.iso_format),
            ("date_time_format", &self.formats.date_time_format),
            ("date_format", &self.formats.date_format),
        ];
        for (name, pattern) in date_patterns {
            if !Pattern::compile(pattern).has_date_components() {
                return Err(ConfigError::IncompleteFormat {
                    name,
                    pattern: pattern.clone(),
                });
            }
        }
        Ok(())
    }
}
