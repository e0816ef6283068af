//! Configuration structs and value types
//!
//! This module houses the datastructures that describe how the sensor is
//! tuned. A complete [`Config`] can be applied in one go with
//! [`AS3935::configure`](crate::hl::AS3935::configure) and read back with
//! [`AS3935::read_config`](crate::hl::AS3935::read_config).

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Sensor configuration
///
/// Numeric fields are checked against their legal values when the config is
/// applied, so an out-of-range value is reported before anything is written.
pub struct Config {
    /// Analog front-end gain. Defaults to [`AfeGain::Indoor`].
    pub afe_gain: AfeGain,
    /// Watchdog threshold, 0 to 10. Defaults to 2.
    pub watchdog_threshold: u8,
    /// Noise floor level, 0 to 7. Defaults to 2.
    pub noise_floor: u8,
    /// Spike rejection, 0 to 11. Defaults to 2.
    pub spike_rejection: u8,
    /// Strikes needed within 15 minutes before lightning is reported: 1, 5,
    /// 9 or 16. Defaults to 1.
    pub lightning_threshold: u8,
    /// Keep disturber events off the IRQ pin. Defaults to `false`.
    pub mask_disturber: bool,
    /// Division ratio applied to the antenna frequency on the IRQ pin: 16,
    /// 32, 64 or 128. Defaults to 16.
    pub antenna_division_ratio: u8,
    /// Internal tuning capacitance in steps of 8 pF, 0 to 15. Defaults to 0.
    pub tuning_capacitance: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            afe_gain: AfeGain::default(),
            watchdog_threshold: 2,
            noise_floor: 2,
            spike_rejection: 2,
            lightning_threshold: 1,
            mask_disturber: false,
            antenna_division_ratio: 16,
            tuning_capacitance: 0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Analog front-end gain boost
///
/// The discriminants are the AFE_GB bit patterns from the datasheet.
pub enum AfeGain {
    /// Higher gain for use inside buildings
    Indoor = 0b10010,
    /// Lower gain for use outdoors
    Outdoor = 0b01110,
}

impl Default for AfeGain {
    fn default() -> Self {
        AfeGain::Indoor
    }
}

impl AfeGain {
    /// The AFE_GB bit pattern
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Match a raw AFE_GB pattern against the two presets
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b10010 => Some(AfeGain::Indoor),
            0b01110 => Some(AfeGain::Outdoor),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Whether the sensor is listening or powered down
pub enum PowerState {
    /// Listening
    On,
    /// Powered down, drawing 1-2 µA
    Off,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Internal oscillators that can be routed to the IRQ pin
pub enum Oscillator {
    /// Timer RC oscillator, 1.1 MHz
    Trco,
    /// System RC oscillator, 32.768 kHz
    Srco,
    /// Antenna LC oscillator, 500 kHz divided by the division ratio
    Lco,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Why the IRQ pin went high
pub enum InterruptCause {
    /// Noise level above the configured floor. Stays set while the noise
    /// persists.
    NoiseLevelTooHigh = 0b0001,
    /// A disturber was detected and rejected
    Disturber = 0b0100,
    /// Lightning was detected
    Lightning = 0b1000,
}

impl InterruptCause {
    /// Classify the INT field of the interrupt register
    ///
    /// Returns `None` if no known cause is flagged. The chip reports zero, for
    /// example, when the distance estimate changed because old events were
    /// purged from its statistics.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x0f {
            0b0001 => Some(InterruptCause::NoiseLevelTooHigh),
            0b0100 => Some(InterruptCause::Disturber),
            0b1000 => Some(InterruptCause::Lightning),
            _ => None,
        }
    }
}
