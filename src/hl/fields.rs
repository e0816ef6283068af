//! Descriptors for every logical setting
//!
//! Each descriptor ties a setting to its register field and to the values it
//! accepts. Setters encode through the descriptor, getters decode through it,
//! so the bit layout of a setting lives in exactly one place.

use crate::ll::{self, Field};

/// The values a setting accepts
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LegalValues {
    /// Any value in `min..=max`, written to the field unchanged
    Range {
        /// Smallest legal value
        min: u8,
        /// Largest legal value
        max: u8,
    },
    /// A fixed set of values, each written as its own field code
    ///
    /// Stored as `(value, code)` pairs.
    Codes(&'static [(u8, u8)]),
}

/// A logical setting: where it lives and what it accepts
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    /// Human readable name, reported in errors
    pub name: &'static str,
    /// The register field holding the setting
    pub field: Field,
    /// The values the setting accepts
    pub legal: LegalValues,
}

impl FieldDescriptor {
    /// Map a setting value to the code written into the field
    ///
    /// Returns `None` if the value is not legal for this setting.
    pub fn encode(&self, value: u8) -> Option<u8> {
        match self.legal {
            LegalValues::Range { min, max } => (min..=max).contains(&value).then_some(value),
            LegalValues::Codes(codes) => codes
                .iter()
                .find(|(legal, _)| *legal == value)
                .map(|(_, code)| *code),
        }
    }

    /// Map a field code read from the device back to the setting value
    ///
    /// Range settings return the code as is, even if it is above `max`. Codes
    /// that are not in the table return `None`.
    pub fn decode(&self, code: u8) -> Option<u8> {
        match self.legal {
            LegalValues::Range { .. } => Some(code),
            LegalValues::Codes(codes) => codes
                .iter()
                .find(|(_, legal)| *legal == code)
                .map(|(value, _)| *value),
        }
    }
}

const BOOL: LegalValues = LegalValues::Range { min: 0, max: 1 };

/// Power-down bit
pub const POWER_DOWN: FieldDescriptor = FieldDescriptor {
    name: "power down",
    field: ll::afe_gain::PWD,
    legal: BOOL,
};

/// AFE gain boost, one of the indoor or outdoor patterns
pub const AFE_GAIN: FieldDescriptor = FieldDescriptor {
    name: "AFE gain",
    field: ll::afe_gain::AFE_GB,
    legal: LegalValues::Codes(&[(0b10010, 0b10010), (0b01110, 0b01110)]),
};

/// Watchdog threshold
pub const WATCHDOG_THRESHOLD: FieldDescriptor = FieldDescriptor {
    name: "watchdog threshold",
    field: ll::threshold::WDTH,
    legal: LegalValues::Range { min: 0, max: 10 },
};

/// Noise floor level
pub const NOISE_FLOOR: FieldDescriptor = FieldDescriptor {
    name: "noise floor",
    field: ll::threshold::NF_LEV,
    legal: LegalValues::Range { min: 0, max: 7 },
};

/// Spike rejection
pub const SPIKE_REJECTION: FieldDescriptor = FieldDescriptor {
    name: "spike rejection",
    field: ll::lightning::SREJ,
    legal: LegalValues::Range { min: 0, max: 11 },
};

/// Minimum number of strikes before lightning is reported
pub const LIGHTNING_THRESHOLD: FieldDescriptor = FieldDescriptor {
    name: "lightning threshold",
    field: ll::lightning::MIN_NUM_LIGH,
    legal: LegalValues::Codes(&[(1, 0b00), (5, 0b01), (9, 0b10), (16, 0b11)]),
};

/// Clear statistics bit, pulsed rather than set
pub const CLEAR_STATISTICS: FieldDescriptor = FieldDescriptor {
    name: "clear statistics",
    field: ll::lightning::CL_STAT,
    legal: BOOL,
};

/// Disturber mask
pub const MASK_DISTURBER: FieldDescriptor = FieldDescriptor {
    name: "mask disturber",
    field: ll::int_mask_ant::MASK_DIST,
    legal: BOOL,
};

/// LCO frequency division ratio
pub const ANTENNA_DIVISION_RATIO: FieldDescriptor = FieldDescriptor {
    name: "antenna division ratio",
    field: ll::int_mask_ant::LCO_FDIV,
    legal: LegalValues::Codes(&[(16, 0b00), (32, 0b01), (64, 0b10), (128, 0b11)]),
};

/// TRCO on IRQ pin
pub const DISPLAY_TRCO: FieldDescriptor = FieldDescriptor {
    name: "display TRCO",
    field: ll::freq_irq::DISP_TRCO,
    legal: BOOL,
};

/// SRCO on IRQ pin
pub const DISPLAY_SRCO: FieldDescriptor = FieldDescriptor {
    name: "display SRCO",
    field: ll::freq_irq::DISP_SRCO,
    legal: BOOL,
};

/// LCO on IRQ pin
pub const DISPLAY_LCO: FieldDescriptor = FieldDescriptor {
    name: "display LCO",
    field: ll::freq_irq::DISP_LCO,
    legal: BOOL,
};

/// Antenna tuning capacitance, 8 pF per step
pub const TUNING_CAPACITANCE: FieldDescriptor = FieldDescriptor {
    name: "tuning capacitance",
    field: ll::freq_irq::TUN_CAP,
    legal: LegalValues::Range { min: 0, max: 15 },
};
