//! Enumeration for direct commands

/// Value that has to be written to a direct command address to trigger it
pub const DIRECT_COMMAND_TRIGGER: u8 = 0x96;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Direct commands, sent by writing [`DIRECT_COMMAND_TRIGGER`] to their address
pub enum DirectCommand {
	/// Sets all registers to their manufacturer default values
	PresetDefault = 0x3C,
	/// Calibrates the internal RC oscillators (TRCO and SRCO)
	CalibRco      = 0x3D,
}

impl DirectCommand {
	/// Address the trigger value is written to
	pub fn address(self) -> u8 {
		self as u8
	}
}
