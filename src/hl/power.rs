use super::fields;
use crate::{
    configs::PowerState, direct_command::DirectCommand, hal_type, hal_type::delay::DelayNs,
    maybe_async_attr, Error, AS3935,
};

/// How long the TRCO needs to settle after its calibration is triggered
pub const RECALIBRATION_WAIT_MS: u32 = 2;

impl<I2C> AS3935<I2C>
where
    I2C: hal_type::i2c::I2c,
{
    /// Puts the sensor into power-down
    ///
    /// All settings are kept, but no lightning is detected until the sensor is
    /// powered up again.
    #[maybe_async_attr]
    pub async fn power_down(&mut self) -> Result<(), Error<I2C>> {
        self.write_setting(&fields::POWER_DOWN, 1).await?;

        debug!("powered down");

        Ok(())
    }

    /// Leaves power-down and recalibrates the TRCO
    ///
    /// The timer oscillator stops while the sensor is powered down and must be
    /// recalibrated whenever it powers up. This blocks for
    /// [`RECALIBRATION_WAIT_MS`] on `delay`.
    #[maybe_async_attr]
    pub async fn power_up<D>(&mut self, delay: &mut D) -> Result<(), Error<I2C>>
    where
        D: DelayNs,
    {
        self.write_setting(&fields::POWER_DOWN, 0).await?;
        self.recalibrate_trco(delay).await?;

        debug!("powered up");

        Ok(())
    }

    /// Powers the sensor up or down
    #[maybe_async_attr]
    pub async fn set_power_state<D>(
        &mut self,
        state: PowerState,
        delay: &mut D,
    ) -> Result<(), Error<I2C>>
    where
        D: DelayNs,
    {
        match state {
            PowerState::On => self.power_up(delay).await,
            PowerState::Off => self.power_down().await,
        }
    }

    /// Returns whether the sensor is powered up
    #[maybe_async_attr]
    pub async fn power_state(&mut self) -> Result<PowerState, Error<I2C>> {
        let pwd = self.ll.afe_gain().read().await?.pwd();

        Ok(if pwd == 1 {
            PowerState::Off
        } else {
            PowerState::On
        })
    }

    /// Restores every register to its power-on default
    ///
    /// This includes the AFE gain, which returns to indoor.
    #[maybe_async_attr]
    pub async fn reset_settings(&mut self) -> Result<(), Error<I2C>> {
        self.ll.direct_command(DirectCommand::PresetDefault).await?;

        debug!("settings reset to defaults");

        Ok(())
    }

    /// Calibrates both RC oscillators
    ///
    /// Sends the automatic calibration command, then recalibrates the TRCO the
    /// same way [`AS3935::power_up`] does.
    #[maybe_async_attr]
    pub async fn calibrate_oscillators<D>(&mut self, delay: &mut D) -> Result<(), Error<I2C>>
    where
        D: DelayNs,
    {
        self.ll.direct_command(DirectCommand::CalibRco).await?;
        self.recalibrate_trco(delay).await?;

        debug!("oscillators calibrated");

        Ok(())
    }

    #[maybe_async_attr]
    async fn recalibrate_trco<D>(&mut self, delay: &mut D) -> Result<(), Error<I2C>>
    where
        D: DelayNs,
    {
        // The TRCO is calibrated while DISP_TRCO is pulsed high
        self.write_setting(&fields::DISPLAY_TRCO, 1).await?;
        delay.delay_ms(RECALIBRATION_WAIT_MS).await;
        self.write_setting(&fields::DISPLAY_TRCO, 0).await?;

        trace!("TRCO recalibrated");

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{
        configs::AfeGain,
        test_support::{Event, FakeChip, POWER_ON_DEFAULTS},
    };

    fn trco_pulse() -> [Event; 5] {
        [
            Event::Read {
                register: 0x08,
                len: 1,
            },
            Event::Write {
                register: 0x08,
                value: 0b0010_0000,
            },
            Event::Delay { ns: 2_000_000 },
            Event::Read {
                register: 0x08,
                len: 1,
            },
            Event::Write {
                register: 0x08,
                value: 0b0000_0000,
            },
        ]
    }

    #[maybe_async::test(not(feature = "async"), async(feature = "async", tokio::test))]
    async fn power_up_clears_power_down_then_calibrates() {
        let mut chip = FakeChip::new();
        chip.registers[0] = 0x25;
        let mut delay = chip.delay();
        let mut as3935 = AS3935::new(&mut chip);

        as3935.power_up(&mut delay).await.unwrap();

        let mut expected = vec![
            Event::Read {
                register: 0x00,
                len: 1,
            },
            Event::Write {
                register: 0x00,
                value: 0x24,
            },
        ];
        expected.extend(trco_pulse());
        assert_eq!(chip.events(), expected);
    }

    #[maybe_async::test(not(feature = "async"), async(feature = "async", tokio::test))]
    async fn power_down_keeps_the_gain() {
        let mut chip = FakeChip::new();
        let mut delay = chip.delay();
        let mut as3935 = AS3935::new(&mut chip);

        as3935.set_afe_gain(AfeGain::Outdoor).await.unwrap();
        as3935
            .set_power_state(PowerState::Off, &mut delay)
            .await
            .unwrap();

        let state = as3935.power_state().await.unwrap();
        let gain = as3935.afe_gain().await.unwrap();
        assert_eq!(state, PowerState::Off);
        assert_eq!(gain, Some(AfeGain::Outdoor));

        as3935
            .set_power_state(PowerState::On, &mut delay)
            .await
            .unwrap();

        let state = as3935.power_state().await.unwrap();
        assert_eq!(state, PowerState::On);
        assert_eq!(chip.registers[0], 0x1c);
    }

    #[maybe_async::test(not(feature = "async"), async(feature = "async", tokio::test))]
    async fn failed_power_up_does_not_wait() {
        let mut chip = FakeChip::new();
        chip.unplug();
        let mut delay = chip.delay();
        let mut as3935 = AS3935::new(&mut chip);

        let result = as3935.power_up(&mut delay).await;

        assert!(result.is_err());

        assert!(chip.events().is_empty());
    }

    #[maybe_async::test(not(feature = "async"), async(feature = "async", tokio::test))]
    async fn calibration_sends_command_before_trco_pulse() {
        let mut chip = FakeChip::new();
        chip.registers[8] = 0b1000_0101;
        let mut delay = chip.delay();
        let mut as3935 = AS3935::new(&mut chip);

        as3935.calibrate_oscillators(&mut delay).await.unwrap();

        let events = chip.events();
        assert_eq!(events[0], Event::Command(DirectCommand::CalibRco));
        assert_eq!(events[2], Event::Write { register: 0x08, value: 0b1010_0101 });
        assert_eq!(events[3], Event::Delay { ns: 2_000_000 });
        assert_eq!(events[5], Event::Write { register: 0x08, value: 0b1000_0101 });
        assert_eq!(events.len(), 6);
    }

    #[maybe_async::test(not(feature = "async"), async(feature = "async", tokio::test))]
    async fn reset_restores_defaults() {
        let mut chip = FakeChip::new();
        let mut as3935 = AS3935::new(&mut chip);

        as3935.set_noise_floor(7).await.unwrap();
        as3935.set_afe_gain(AfeGain::Outdoor).await.unwrap();
        as3935.reset_settings().await.unwrap();

        let gain = as3935.afe_gain().await.unwrap();
        assert_eq!(gain, Some(AfeGain::Indoor));
        assert_eq!(chip.registers, POWER_ON_DEFAULTS);
        assert!(chip
            .events()
            .contains(&Event::Command(DirectCommand::PresetDefault)));
    }
}
