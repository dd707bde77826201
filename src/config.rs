//! Configuration primitives for the ADXL345 driver.

use crate::params::{DataRate, Range};
use crate::registers::{BwRate, DataFormat};

/// Settings programmed while a device is brought up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Full-scale range written to `DATA_FORMAT`.
    pub range: Range,
    /// Full resolution (4 mg/LSB) instead of fixed 10-bit output.
    pub full_resolution: bool,
    /// Left-justified output.
    pub justify: bool,
    /// Output data rate; `None` keeps the power-on rate.
    pub data_rate: Option<DataRate>,
    /// Reduced power operation.
    pub low_power: bool,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is valid according to datasheet rules.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.low_power && !self.data_rate.is_some_and(DataRate::supports_low_power) {
            return Err(ConfigError::LowPowerRate);
        }

        Ok(())
    }

    /// `DATA_FORMAT` value for this configuration.
    pub fn data_format(&self) -> DataFormat {
        DataFormat::new()
            .with_range(self.range)
            .with_justify(self.justify)
            .with_full_res(self.full_resolution)
    }

    /// `BW_RATE` value for this configuration, if a rate was chosen.
    pub fn bw_rate(&self) -> Option<BwRate> {
        self.data_rate
            .map(|rate| BwRate::new().with_rate(rate).with_low_power(self.low_power))
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the full-scale range.
    pub fn range(mut self, range: Range) -> Self {
        self.config.range = range;
        self
    }

    /// Selects full or fixed 10-bit resolution.
    pub fn full_resolution(mut self, enabled: bool) -> Self {
        self.config.full_resolution = enabled;
        self
    }

    /// Selects left-justified output.
    pub fn justify(mut self, enabled: bool) -> Self {
        self.config.justify = enabled;
        self
    }

    /// Sets the output data rate.
    pub fn data_rate(mut self, rate: DataRate) -> Self {
        self.config.data_rate = Some(rate);
        self
    }

    /// Enables reduced power operation.
    pub fn low_power(mut self, enabled: bool) -> Self {
        self.config.low_power = enabled;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            range: Range::G2,
            full_resolution: true,
            justify: false,
            data_rate: None,
            low_power: false,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Low-power mode needs an explicit data rate between 12.5 Hz and 400 Hz.
    LowPowerRate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_full_resolution_2g() {
        let config = Config::default();
        assert_eq!(u8::from(config.data_format()), 0x08);
        assert_eq!(config.bw_rate(), None);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builder_encodes_rate_and_range() {
        let config = Config::new()
            .range(Range::G16)
            .data_rate(DataRate::Hz200)
            .low_power(true)
            .build();

        assert_eq!(u8::from(config.data_format()), 0x0B);
        assert_eq!(config.bw_rate().map(u8::from), Some(0x1B));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn low_power_needs_supported_rate() {
        let fast = Config::new().data_rate(DataRate::Hz1600).low_power(true).build();
        assert_eq!(fast.validate(), Err(ConfigError::LowPowerRate));

        let unset = Config::new().low_power(true).build();
        assert_eq!(unset.validate(), Err(ConfigError::LowPowerRate));
    }
}
