use core::fmt;

use crate::{
    configs::InterruptCause, hal_type, ll, ll::RegisterAddress, maybe_async_attr, Error, AS3935,
};

/// Energy of the last detected strike
///
/// A dimensionless 20-bit figure of merit. It has no physical unit and is only
/// meaningful compared to other readings of the same sensor.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Energy(u32);

impl Energy {
    /// Largest value the chip can report
    pub const MAX: Self = Energy(0xf_ffff);

    /// Assemble the energy from the LSB, MSB and MMSB registers, in that order
    ///
    /// Only the low four bits of the MMSB register belong to the value.
    pub fn from_bytes([lsb, msb, mmsb]: [u8; 3]) -> Self {
        let mmsb = ll::s_lig_mm::VALUE.decode(mmsb);

        Energy((u32::from(mmsb) << 16) | (u32::from(msb) << 8) | u32::from(lsb))
    }

    /// The raw 20-bit value
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<Energy> for u32 {
    fn from(energy: Energy) -> Self {
        energy.0
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<I2C> AS3935<I2C>
where
    I2C: hal_type::i2c::I2c,
{
    /// Returns the estimated distance to the leading edge of the storm, in km
    ///
    /// This is not the distance to any single strike. See the datasheet for
    /// the values the chip reports for "out of range" and "overhead".
    #[maybe_async_attr]
    pub async fn distance_to_storm(&mut self) -> Result<u8, Error<I2C>> {
        let distance = self.ll.distance().read().await?.value();

        debug!("storm at {} km", distance);

        Ok(distance)
    }

    /// Returns the energy of the last detected strike
    ///
    /// All three energy registers are fetched in one sequential read.
    #[maybe_async_attr]
    pub async fn lightning_energy(&mut self) -> Result<Energy, Error<I2C>> {
        let mut bytes = [0; 3];
        self.ll
            .read_registers(RegisterAddress::EnergyLsb, &mut bytes)
            .await?;

        let energy = Energy::from_bytes(bytes);
        debug!("strike energy {}", energy.value());

        Ok(energy)
    }

    /// Returns why the IRQ pin was raised
    ///
    /// Reading clears a disturber or lightning cause. A noise cause is
    /// reported for as long as the noise stays above the floor. Returns `None`
    /// if no known cause is flagged.
    #[maybe_async_attr]
    pub async fn interrupt_cause(&mut self) -> Result<Option<InterruptCause>, Error<I2C>> {
        let int = self.ll.int_mask_ant().read().await?.int();
        let cause = InterruptCause::from_bits(int);

        if cause.is_none() && int != 0 {
            warn!("unknown interrupt flags 0x{:02x}", int);
        }

        Ok(cause)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::test_support::{Event, FakeChip};

    #[test]
    fn energy_assembly() {
        assert_eq!(Energy::from_bytes([0xff, 0xff, 0x1f]).value(), 0xf_ffff);
        assert_eq!(Energy::from_bytes([0xff, 0xff, 0x1f]), Energy::MAX);
        assert_eq!(Energy::from_bytes([0xff, 0xff, 0x00]).value(), 65535);
        assert_eq!(Energy::from_bytes([0x00, 0x00, 0x00]).value(), 0);
        assert_eq!(Energy::from_bytes([0x34, 0x12, 0xf5]).value(), 0x5_1234);
    }

    #[maybe_async::test(not(feature = "async"), async(feature = "async", tokio::test))]
    async fn energy_is_one_sequential_read() {
        let mut chip = FakeChip::new();
        chip.registers[4..7].copy_from_slice(&[0x78, 0x56, 0xa3]);
        let mut as3935 = AS3935::new(&mut chip);

        let energy = as3935.lightning_energy().await.unwrap();

        assert_eq!(u32::from(energy), 0x3_5678);
        assert_eq!(
            chip.events(),
            [Event::Read {
                register: 0x04,
                len: 3
            }]
        );
        assert_eq!(chip.transactions(), 1);
    }

    #[maybe_async::test(not(feature = "async"), async(feature = "async", tokio::test))]
    async fn distance_keeps_five_bits() {
        let mut chip = FakeChip::new();

        for (byte, km) in [(0x3f, 0x1f), (0xc5, 5), (0x01, 1)] {
            chip.registers[7] = byte;
            let mut as3935 = AS3935::new(&mut chip);

            let distance = as3935.distance_to_storm().await.unwrap();
            assert_eq!(distance, km);
        }
    }

    #[maybe_async::test(not(feature = "async"), async(feature = "async", tokio::test))]
    async fn interrupt_classification() {
        let mut chip = FakeChip::new();

        for (byte, expected) in [
            (0b0000_0001, Some(InterruptCause::NoiseLevelTooHigh)),
            (0b0000_0100, Some(InterruptCause::Disturber)),
            (0b1110_1000, Some(InterruptCause::Lightning)),
            (0b1100_0000, None),
            (0b0000_0011, None),
        ] {
            chip.registers[3] = byte;
            let mut as3935 = AS3935::new(&mut chip);

            let cause = as3935.interrupt_cause().await.unwrap();
            assert_eq!(cause, expected);
        }
    }

    #[maybe_async::test(not(feature = "async"), async(feature = "async", tokio::test))]
    async fn telemetry_surfaces_transport_errors() {
        let mut chip = FakeChip::new();
        chip.unplug();
        let mut as3935 = AS3935::new(&mut chip);

        let energy = as3935.lightning_energy().await;
        let cause = as3935.interrupt_cause().await;

        assert!(matches!(energy, Err(Error::Transport(ll::Error::Read(_)))));
        assert!(matches!(cause, Err(Error::Transport(_))));
    }

    // `embedded-hal-mock` only provides the blocking I2C traits
    #[cfg(not(feature = "async"))]
    #[test]
    fn distance_is_a_single_register_read() {
        use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

        let i2c = I2cMock::new(&[
            I2cTransaction::write_read(0x03, vec![0x07], vec![0x3f]),
            I2cTransaction::write_read(0x03, vec![0x07], vec![0xc5]),
        ]);
        let mut as3935 = AS3935::new(i2c);

        assert_eq!(as3935.distance_to_storm().unwrap(), 0x1f);
        assert_eq!(as3935.distance_to_storm().unwrap(), 5);

        as3935.release().done();
    }
}
