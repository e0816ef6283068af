//! Low-level interface to the AS3935
//!
//! This module implements a register-level interface to the AS3935. Users of
//! this library should typically not need to use this. Please consider using
//! the [high-level interface] instead.
//!
//! Every register of the AS3935 is a single byte. Reads set the register
//! pointer and then read back with a repeated start, writes send the register
//! address followed by the new value. Reading more than one byte walks the
//! register file sequentially, which is how the three energy registers are
//! fetched in one go.
//!
//! **NOTE**: Field access methods accept `u8` values, which is wider than most
//! fields. If you use such a method to pass a value that is too large to be
//! written to the field, it will be silently truncated to the field's mask.
//!
//! [high-level interface]: ../hl/index.html

use core::{fmt, marker::PhantomData};

use embedded_hal::i2c::{self, ErrorType};

use crate::{
    direct_command::{DirectCommand, DIRECT_COMMAND_TRIGGER},
    hal_type, maybe_async_attr,
};

/// Entry point to the AS3935 driver's low-level API
///
/// Please consider using [hl::AS3935] instead.
///
/// [hl::AS3935]: ../hl/struct.AS3935.html
#[derive(Copy, Clone)]
pub struct AS3935<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> AS3935<I2C> {
    /// Create a new instance of `AS3935`
    ///
    /// Requires the I2C bus the AS3935 is connected to and its 7-bit address.
    pub fn new(i2c: I2C, address: u8) -> Self {
        AS3935 { i2c, address }
    }

    /// The 7-bit bus address this instance talks to
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Allow access to the I2C bus
    pub fn bus(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Releases the I2C bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> AS3935<I2C>
where
    I2C: hal_type::i2c::I2c,
{
    /// Read consecutive registers, starting at `start`
    ///
    /// Fills all of `buffer`. The chip auto-increments its register pointer,
    /// so `buffer[n]` holds the register at `start + n`.
    #[maybe_async_attr]
    pub async fn read_registers(
        &mut self,
        start: RegisterAddress,
        buffer: &mut [u8],
    ) -> Result<(), Error<I2C>> {
        self.i2c
            .write_read(self.address, &[start.into()], buffer)
            .await
            .map_err(Error::Read)?;

        trace!("read {} byte(s) from 0x{:02x}", buffer.len(), u8::from(start));

        Ok(())
    }

    /// Read a single register
    #[maybe_async_attr]
    pub async fn read_register(&mut self, address: RegisterAddress) -> Result<u8, Error<I2C>> {
        let mut buffer = [0];
        self.read_registers(address, &mut buffer).await?;

        Ok(buffer[0])
    }

    /// Overwrite a single register
    ///
    /// All bits of the register are replaced. Use [`AS3935::write_field`] or
    /// one of the `modify` accessors to change only part of a register.
    #[maybe_async_attr]
    pub async fn write_register(
        &mut self,
        address: RegisterAddress,
        value: u8,
    ) -> Result<(), Error<I2C>> {
        self.i2c
            .write(self.address, &[address.into(), value])
            .await
            .map_err(Error::Write)?;

        trace!("wrote 0x{:02x} to 0x{:02x}", value, u8::from(address));

        Ok(())
    }

    /// Read the current value of a field
    #[maybe_async_attr]
    pub async fn read_field(&mut self, field: Field) -> Result<u8, Error<I2C>> {
        let byte = self.read_register(field.register).await?;

        Ok(field.decode(byte))
    }

    /// Change a single field, leaving the rest of its register untouched
    ///
    /// Reads the register, replaces the bits covered by the field's mask and
    /// writes the result back. If the read fails, nothing is written.
    #[maybe_async_attr]
    pub async fn write_field(&mut self, field: Field, value: u8) -> Result<(), Error<I2C>> {
        let current = self.read_register(field.register).await?;
        self.write_register(field.register, field.encode(current, value))
            .await
    }

    /// Send a direct command
    #[maybe_async_attr]
    pub async fn direct_command(&mut self, command: DirectCommand) -> Result<(), Error<I2C>> {
        self.i2c
            .write(self.address, &[command.address(), DIRECT_COMMAND_TRIGGER])
            .await
            .map_err(Error::Write)?;

        trace!("sent direct command 0x{:02x}", command.address());

        Ok(())
    }
}

/// Provides access to a register
///
/// You can get an instance for a given register using one of the methods on
/// [`AS3935`].
pub struct RegAccessor<'s, R, I2C>(&'s mut AS3935<I2C>, PhantomData<R>);

impl<'s, R, I2C> RegAccessor<'s, R, I2C>
where
    R: Register,
    I2C: hal_type::i2c::I2c,
{
    /// Read from the register
    #[maybe_async_attr]
    pub async fn read(&mut self) -> Result<R::Read, Error<I2C>>
    where
        R: Readable,
    {
        let byte = self.0.read_register(R::ADDRESS).await?;

        Ok(<R as Readable>::read(byte))
    }

    /// Write to the register
    ///
    /// Fields that are not set by `f` are written as zero.
    #[maybe_async_attr]
    pub async fn write<F>(&mut self, f: F) -> Result<(), Error<I2C>>
    where
        R: Writable,
        F: FnOnce(&mut R::Write) -> &mut R::Write,
    {
        let mut w = <R as Writable>::write(0);
        f(&mut w);

        self.0.write_register(R::ADDRESS, R::bits(&w)).await
    }

    /// Modify the register
    #[maybe_async_attr]
    pub async fn modify<F>(&mut self, f: F) -> Result<(), Error<I2C>>
    where
        R: Readable + Writable,
        F: for<'r> FnOnce(&mut R::Read, &'r mut R::Write) -> &'r mut R::Write,
    {
        let byte = self.0.read_register(R::ADDRESS).await?;
        let mut r = <R as Readable>::read(byte);
        let mut w = <R as Writable>::write(byte);

        f(&mut r, &mut w);

        self.0.write_register(R::ADDRESS, R::bits(&w)).await
    }
}

/// An I2C error that can occur when communicating with the AS3935
pub enum Error<I2C>
where
    I2C: ErrorType,
{
    /// I2C error occured while reading registers
    Read(I2C::Error),

    /// I2C error occured while writing a register or direct command
    Write(I2C::Error),
}

impl<I2C> Error<I2C>
where
    I2C: ErrorType,
{
    /// The HAL-independent kind of the underlying bus error
    ///
    /// Useful to tell an absent device (no acknowledge) from a disturbed bus.
    pub fn kind(&self) -> i2c::ErrorKind {
        use embedded_hal::i2c::Error as _;

        match self {
            Error::Read(error) | Error::Write(error) => error.kind(),
        }
    }
}

// We can't derive this implementation, as the compiler would then require
// `I2C` itself to implement `Debug`.
impl<I2C> fmt::Debug for Error<I2C>
where
    I2C: ErrorType,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read(error) => write!(f, "Read({:?})", error),
            Error::Write(error) => write!(f, "Write({:?})", error),
        }
    }
}

#[cfg(feature = "defmt")]
impl<I2C> defmt::Format for Error<I2C>
where
    I2C: ErrorType,
{
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Read(_) => defmt::write!(f, "Read()"),
            Error::Write(_) => defmt::write!(f, "Write()"),
        }
    }
}

/// Addresses of the AS3935's registers
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RegisterAddress {
    /// AFE gain boost and power-down
    AfeGain = 0x00,
    /// Noise floor level and watchdog threshold
    Threshold = 0x01,
    /// Statistics clear, minimum number of strikes and spike rejection
    Lightning = 0x02,
    /// LCO division ratio, disturber mask and interrupt cause
    IntMaskAnt = 0x03,
    /// Energy of the last strike, bits [7:0]
    EnergyLsb = 0x04,
    /// Energy of the last strike, bits [15:8]
    EnergyMsb = 0x05,
    /// Energy of the last strike, bits [19:16]
    EnergyMmsb = 0x06,
    /// Estimated distance to the storm
    Distance = 0x07,
    /// Oscillator display on IRQ and antenna tuning capacitance
    FreqIrq = 0x08,
}

impl From<RegisterAddress> for u8 {
    fn from(address: RegisterAddress) -> Self {
        address as u8
    }
}

/// A contiguous bit field inside one register
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// The register holding the field
    pub register: RegisterAddress,
    /// Bits of the register covered by the field, in register position
    pub mask: u8,
    /// Index of the field's lowest bit
    pub offset: u8,
}

impl Field {
    /// Describe the field spanning `first_bit..=last_bit` of `register`
    pub const fn new(register: RegisterAddress, first_bit: u8, last_bit: u8) -> Self {
        let width = last_bit - first_bit + 1;
        let mask = (((1u16 << width) - 1) as u8) << first_bit;

        Field {
            register,
            mask,
            offset: first_bit,
        }
    }

    /// Largest value the field can hold
    pub const fn max(&self) -> u8 {
        self.mask >> self.offset
    }

    /// Replace the field's bits in `current` with `value`
    pub const fn encode(&self, current: u8, value: u8) -> u8 {
        (current & !self.mask) | ((value << self.offset) & self.mask)
    }

    /// Extract the field's value from a register byte
    pub const fn decode(&self, byte: u8) -> u8 {
        (byte & self.mask) >> self.offset
    }
}

/// Implemented for all registers
///
/// This is a mostly internal crate that should not be implemented or used
/// directly by users of this crate. It is exposed through the public API
/// though, so it can't be made private.
pub trait Register {
    /// The register address
    const ADDRESS: RegisterAddress;
}

/// Marker trait for registers that can be read from
///
/// This is a mostly internal crate that should not be implemented or used
/// directly by users of this crate. It is exposed through the public API
/// though, so it can't be made private.
pub trait Readable {
    /// The type that is used to read from the register
    type Read;

    /// Wrap a raw register byte
    fn read(byte: u8) -> Self::Read;
}

/// Marker trait for registers that can be written to
///
/// This is a mostly internal crate that should not be implemented or used
/// directly by users of this crate. It is exposed through the public API
/// though, so it can't be made private.
pub trait Writable {
    /// The type that is used to write to the register
    type Write;

    /// Start a write from the given register contents
    fn write(byte: u8) -> Self::Write;

    /// Return the byte that will be written
    fn bits(w: &Self::Write) -> u8;
}

/// Generates register implementations
macro_rules! impl_register {
    (
        $(
            $variant:ident,
            $rw:tt,
            $name:ident($name_lower:ident) {
            #[$doc:meta]
            $(
                $field_const:ident($field:ident),
                $first_bit:expr,
                $last_bit:expr;
                #[$field_doc:meta]
            )*
            }
        )*
    ) => {
        $(
            #[$doc]
            #[allow(non_camel_case_types)]
            pub struct $name;

            impl Register for $name {
                const ADDRESS: RegisterAddress = RegisterAddress::$variant;
            }

            #[$doc]
            pub mod $name_lower {
                use core::fmt;

                use super::{Field, RegisterAddress};

                $(
                    #[$field_doc]
                    pub const $field_const: Field =
                        Field::new(RegisterAddress::$variant, $first_bit, $last_bit);
                )*

                /// Used to read from the register
                #[derive(Copy, Clone, Eq, PartialEq)]
                pub struct R(pub(crate) u8);

                impl R {
                    $(
                        #[$field_doc]
                        #[inline(always)]
                        pub fn $field(&self) -> u8 {
                            $field_const.decode(self.0)
                        }
                    )*

                    /// The raw register contents
                    #[inline(always)]
                    pub fn bits(&self) -> u8 {
                        self.0
                    }
                }

                impl fmt::Debug for R {
                    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                        write!(f, "0x{:02x}", self.0)
                    }
                }

                #[cfg(feature = "defmt")]
                impl defmt::Format for R {
                    fn format(&self, f: defmt::Formatter) {
                        defmt::write!(f, "0x{:02x}", self.0);
                    }
                }

                /// Used to write to the register
                pub struct W(pub(crate) u8);

                impl W {
                    $(
                        #[$field_doc]
                        #[inline(always)]
                        pub fn $field(&mut self, value: u8) -> &mut Self {
                            self.0 = $field_const.encode(self.0, value);
                            self
                        }
                    )*
                }
            }

            impl_rw!($rw, $name, $name_lower);
        )*

        impl<I2C> AS3935<I2C> {
            $(
                #[$doc]
                pub fn $name_lower(&mut self) -> RegAccessor<'_, $name, I2C> {
                    RegAccessor(self, PhantomData)
                }
            )*
        }
    }
}

// Helper macro, used internally by `impl_register!`
macro_rules! impl_rw {
    (RO, $name:ident, $name_lower:ident) => {
        impl_rw!(@R, $name, $name_lower);
    };
    (RW, $name:ident, $name_lower:ident) => {
        impl_rw!(@R, $name, $name_lower);
        impl_rw!(@W, $name, $name_lower);
    };

    (@R, $name:ident, $name_lower:ident) => {
        impl Readable for $name {
            type Read = $name_lower::R;

            fn read(byte: u8) -> Self::Read {
                $name_lower::R(byte)
            }
        }
    };
    (@W, $name:ident, $name_lower:ident) => {
        impl Writable for $name {
            type Write = $name_lower::W;

            fn write(byte: u8) -> Self::Write {
                $name_lower::W(byte)
            }

            fn bits(w: &Self::Write) -> u8 {
                w.0
            }
        }
    };
}

// All registers are implemented in this macro invocation. It follows the
// following syntax:
// <address>, <RO/RW>, <NAME(name)> { /// <doc>
//     <FIELD(field)>, <first-bit-index>, <last-bit-index>; /// <doc>
//     ...
// }
//
// Bit positions are from the AS3935 datasheet, section 8.9.
impl_register! {
    AfeGain, RW, AFE_GAIN(afe_gain) { /// AFE gain boost and power-down
        PWD(pwd),       0, 0; /// Power-down
        AFE_GB(afe_gb), 1, 5; /// AFE gain boost
    }
    Threshold, RW, THRESHOLD(threshold) { /// Noise floor and watchdog threshold
        WDTH(wdth),     0, 3; /// Watchdog threshold
        NF_LEV(nf_lev), 4, 6; /// Noise floor level
    }
    Lightning, RW, LIGHTNING(lightning) { /// Lightning detection tuning
        SREJ(srej),                 0, 3; /// Spike rejection
        MIN_NUM_LIGH(min_num_ligh), 4, 5; /// Minimum number of lightning strikes
        CL_STAT(cl_stat),           6, 6; /// Clear statistics
    }
    IntMaskAnt, RW, INT_MASK_ANT(int_mask_ant) { /// Interrupt cause, disturber mask and LCO division
        INT(int),             0, 3; /// Interrupt cause
        MASK_DIST(mask_dist), 5, 5; /// Mask disturber events
        LCO_FDIV(lco_fdiv),   6, 7; /// Frequency division ratio for the antenna tuning
    }
    EnergyLsb, RO, S_LIG_L(s_lig_l) { /// Energy of the single lightning, LSB
        VALUE(value), 0, 7; /// Energy bits [7:0]
    }
    EnergyMsb, RO, S_LIG_M(s_lig_m) { /// Energy of the single lightning, MSB
        VALUE(value), 0, 7; /// Energy bits [15:8]
    }
    EnergyMmsb, RO, S_LIG_MM(s_lig_mm) { /// Energy of the single lightning, MMSB
        VALUE(value), 0, 3; /// Energy bits [19:16]
    }
    Distance, RO, DISTANCE(distance) { /// Distance estimation
        VALUE(value), 0, 4; /// Distance to the head of the storm in km
    }
    FreqIrq, RW, FREQ_IRQ(freq_irq) { /// Oscillator display and antenna tuning
        TUN_CAP(tun_cap),     0, 3; /// Internal tuning capacitors, 8 pF steps
        DISP_TRCO(disp_trco), 5, 5; /// Display TRCO on IRQ pin
        DISP_SRCO(disp_srco), 6, 6; /// Display SRCO on IRQ pin
        DISP_LCO(disp_lco),   7, 7; /// Display LCO on IRQ pin
    }
}
