use super::fields::{self, FieldDescriptor};
use crate::{
    configs::{AfeGain, Config, Oscillator},
    hal_type,
    ll::RegisterAddress,
    maybe_async_attr, Error, AS3935,
};

fn oscillator_field(oscillator: Oscillator) -> &'static FieldDescriptor {
    match oscillator {
        Oscillator::Trco => &fields::DISPLAY_TRCO,
        Oscillator::Srco => &fields::DISPLAY_SRCO,
        Oscillator::Lco => &fields::DISPLAY_LCO,
    }
}

impl<I2C> AS3935<I2C>
where
    I2C: hal_type::i2c::I2c,
{
    /// Check a value against its descriptor and return the field code
    fn encode(descriptor: &FieldDescriptor, value: u8) -> Result<u8, Error<I2C>> {
        descriptor.encode(value).ok_or_else(|| {
            warn!("rejected {} for {}", value, descriptor.name);
            Error::InvalidArgument {
                field: descriptor.name,
                value,
            }
        })
    }

    /// Validate and write one setting
    #[maybe_async_attr]
    pub(super) async fn write_setting(
        &mut self,
        descriptor: &FieldDescriptor,
        value: u8,
    ) -> Result<(), Error<I2C>> {
        let code = Self::encode(descriptor, value)?;
        self.ll.write_field(descriptor.field, code).await?;

        debug!("{} set to {}", descriptor.name, value);

        Ok(())
    }

    /// Read one setting back and map it through its descriptor
    #[maybe_async_attr]
    pub(super) async fn read_setting(
        &mut self,
        descriptor: &FieldDescriptor,
    ) -> Result<Option<u8>, Error<I2C>> {
        let code = self.ll.read_field(descriptor.field).await?;

        Ok(descriptor.decode(code))
    }

    /// Selects the indoor or outdoor gain of the analog front-end
    #[maybe_async_attr]
    pub async fn set_afe_gain(&mut self, gain: AfeGain) -> Result<(), Error<I2C>> {
        self.write_setting(&fields::AFE_GAIN, gain.bits()).await
    }

    /// Returns the current AFE gain
    ///
    /// `None` if the chip holds a gain pattern other than the two presets,
    /// which can only happen through the register-level API.
    #[maybe_async_attr]
    pub async fn afe_gain(&mut self) -> Result<Option<AfeGain>, Error<I2C>> {
        let bits = self.read_setting(&fields::AFE_GAIN).await?;

        Ok(bits.and_then(AfeGain::from_bits))
    }

    /// Sets the watchdog threshold, 0 to 10
    ///
    /// Higher values make the chip less sensitive to weak signals, which
    /// helps against disturbers at the cost of detection range.
    #[maybe_async_attr]
    pub async fn set_watchdog_threshold(&mut self, threshold: u8) -> Result<(), Error<I2C>> {
        self.write_setting(&fields::WATCHDOG_THRESHOLD, threshold)
            .await
    }

    /// Returns the watchdog threshold
    #[maybe_async_attr]
    pub async fn watchdog_threshold(&mut self) -> Result<u8, Error<I2C>> {
        Ok(self.ll.read_field(fields::WATCHDOG_THRESHOLD.field).await?)
    }

    /// Sets the noise floor level, 0 to 7
    ///
    /// Ambient noise above this level raises a noise interrupt for as long as
    /// it lasts.
    #[maybe_async_attr]
    pub async fn set_noise_floor(&mut self, level: u8) -> Result<(), Error<I2C>> {
        self.write_setting(&fields::NOISE_FLOOR, level).await
    }

    /// Returns the noise floor level
    #[maybe_async_attr]
    pub async fn noise_floor(&mut self) -> Result<u8, Error<I2C>> {
        Ok(self.ll.read_field(fields::NOISE_FLOOR.field).await?)
    }

    /// Sets the spike rejection, 0 to 11
    #[maybe_async_attr]
    pub async fn set_spike_rejection(&mut self, rejection: u8) -> Result<(), Error<I2C>> {
        self.write_setting(&fields::SPIKE_REJECTION, rejection)
            .await
    }

    /// Returns the spike rejection
    #[maybe_async_attr]
    pub async fn spike_rejection(&mut self) -> Result<u8, Error<I2C>> {
        Ok(self.ll.read_field(fields::SPIKE_REJECTION.field).await?)
    }

    /// Sets how many strikes must occur within 15 minutes before lightning is
    /// reported: 1, 5, 9 or 16
    #[maybe_async_attr]
    pub async fn set_lightning_threshold(&mut self, strikes: u8) -> Result<(), Error<I2C>> {
        self.write_setting(&fields::LIGHTNING_THRESHOLD, strikes)
            .await
    }

    /// Returns the number of strikes needed before lightning is reported
    #[maybe_async_attr]
    pub async fn lightning_threshold(&mut self) -> Result<u8, Error<I2C>> {
        let strikes = self.read_setting(&fields::LIGHTNING_THRESHOLD).await?;

        // Two-bit field, every code is in the table
        Ok(strikes.unwrap_or_default())
    }

    /// Clears the chip's lightning statistics
    ///
    /// The chip clears on an edge, so the bit is pulsed high, low and high
    /// again rather than set.
    #[maybe_async_attr]
    pub async fn clear_statistics(&mut self) -> Result<(), Error<I2C>> {
        for level in [1, 0, 1] {
            self.write_setting(&fields::CLEAR_STATISTICS, level).await?;
        }

        Ok(())
    }

    /// Keeps disturber events from raising an interrupt
    #[maybe_async_attr]
    pub async fn mask_disturber(&mut self, mask: bool) -> Result<(), Error<I2C>> {
        self.write_setting(&fields::MASK_DISTURBER, mask.into())
            .await
    }

    /// Returns whether disturber events are masked
    #[maybe_async_attr]
    pub async fn disturber_masked(&mut self) -> Result<bool, Error<I2C>> {
        Ok(self.ll.read_field(fields::MASK_DISTURBER.field).await? == 1)
    }

    /// Sets the division ratio applied to the antenna frequency before it is
    /// put on the IRQ pin: 16, 32, 64 or 128
    #[maybe_async_attr]
    pub async fn set_antenna_division_ratio(&mut self, ratio: u8) -> Result<(), Error<I2C>> {
        self.write_setting(&fields::ANTENNA_DIVISION_RATIO, ratio)
            .await
    }

    /// Returns the antenna frequency division ratio
    #[maybe_async_attr]
    pub async fn antenna_division_ratio(&mut self) -> Result<u8, Error<I2C>> {
        let ratio = self.read_setting(&fields::ANTENNA_DIVISION_RATIO).await?;

        // Two-bit field, every code is in the table
        Ok(ratio.unwrap_or_default())
    }

    /// Routes one of the internal oscillators to the IRQ pin, or stops doing so
    ///
    /// The three oscillators have independent enable bits.
    #[maybe_async_attr]
    pub async fn display_oscillator(
        &mut self,
        oscillator: Oscillator,
        enable: bool,
    ) -> Result<(), Error<I2C>> {
        self.write_setting(oscillator_field(oscillator), enable.into())
            .await
    }

    /// Returns whether an oscillator is routed to the IRQ pin
    #[maybe_async_attr]
    pub async fn oscillator_displayed(&mut self, oscillator: Oscillator) -> Result<bool, Error<I2C>> {
        let field = oscillator_field(oscillator).field;

        Ok(self.ll.read_field(field).await? == 1)
    }

    /// Sets the internal antenna tuning capacitance in steps of 8 pF, 0 to 15
    #[maybe_async_attr]
    pub async fn set_tuning_capacitance(&mut self, steps: u8) -> Result<(), Error<I2C>> {
        self.write_setting(&fields::TUNING_CAPACITANCE, steps).await
    }

    /// Returns the antenna tuning capacitance in steps of 8 pF
    #[maybe_async_attr]
    pub async fn tuning_capacitance(&mut self) -> Result<u8, Error<I2C>> {
        Ok(self.ll.read_field(fields::TUNING_CAPACITANCE.field).await?)
    }

    /// Returns the antenna tuning capacitance in pF, 0 to 120
    #[maybe_async_attr]
    pub async fn tuning_capacitance_pf(&mut self) -> Result<u8, Error<I2C>> {
        Ok(self.tuning_capacitance().await? * 8)
    }

    /// Applies a complete configuration
    ///
    /// All values are validated first. If any is illegal, the error names it
    /// and nothing has been written. Settings sharing a register are written
    /// together with one read-modify-write.
    #[maybe_async_attr]
    pub async fn configure(&mut self, config: &Config) -> Result<(), Error<I2C>> {
        let afe_gb = Self::encode(&fields::AFE_GAIN, config.afe_gain.bits())?;
        let wdth = Self::encode(&fields::WATCHDOG_THRESHOLD, config.watchdog_threshold)?;
        let nf_lev = Self::encode(&fields::NOISE_FLOOR, config.noise_floor)?;
        let srej = Self::encode(&fields::SPIKE_REJECTION, config.spike_rejection)?;
        let min_num_ligh = Self::encode(&fields::LIGHTNING_THRESHOLD, config.lightning_threshold)?;
        let mask_dist = Self::encode(&fields::MASK_DISTURBER, config.mask_disturber.into())?;
        let lco_fdiv = Self::encode(&fields::ANTENNA_DIVISION_RATIO, config.antenna_division_ratio)?;
        let tun_cap = Self::encode(&fields::TUNING_CAPACITANCE, config.tuning_capacitance)?;

        self.ll.afe_gain().modify(|_, w| w.afe_gb(afe_gb)).await?;
        self.ll
            .threshold()
            .modify(|_, w| w.wdth(wdth).nf_lev(nf_lev))
            .await?;
        self.ll
            .lightning()
            .modify(|_, w| w.srej(srej).min_num_ligh(min_num_ligh))
            .await?;
        self.ll
            .int_mask_ant()
            .modify(|_, w| w.mask_dist(mask_dist).lco_fdiv(lco_fdiv))
            .await?;
        self.ll.freq_irq().modify(|_, w| w.tun_cap(tun_cap)).await?;

        debug!("configuration applied");

        Ok(())
    }

    /// Reads the complete configuration back from the chip
    ///
    /// `None` if the chip holds an AFE gain pattern other than the two
    /// presets.
    #[maybe_async_attr]
    pub async fn read_config(&mut self) -> Result<Option<Config>, Error<I2C>> {
        // Gain, threshold, lightning and interrupt registers are consecutive
        let mut bytes = [0; 4];
        self.ll
            .read_registers(RegisterAddress::AfeGain, &mut bytes)
            .await?;
        let [afe_gain, threshold, lightning, int_mask_ant] = bytes;
        let freq_irq = self.ll.freq_irq().read().await?;

        let gain = fields::AFE_GAIN
            .decode(fields::AFE_GAIN.field.decode(afe_gain))
            .and_then(AfeGain::from_bits);
        let Some(afe_gain) = gain else {
            return Ok(None);
        };

        let decode = |descriptor: &FieldDescriptor, byte: u8| {
            descriptor
                .decode(descriptor.field.decode(byte))
                .unwrap_or_default()
        };

        Ok(Some(Config {
            afe_gain,
            watchdog_threshold: decode(&fields::WATCHDOG_THRESHOLD, threshold),
            noise_floor: decode(&fields::NOISE_FLOOR, threshold),
            spike_rejection: decode(&fields::SPIKE_REJECTION, lightning),
            lightning_threshold: decode(&fields::LIGHTNING_THRESHOLD, lightning),
            mask_disturber: decode(&fields::MASK_DISTURBER, int_mask_ant) == 1,
            antenna_division_ratio: decode(&fields::ANTENNA_DIVISION_RATIO, int_mask_ant),
            tuning_capacitance: freq_irq.tun_cap(),
        }))
    }
}
