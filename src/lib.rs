//! Driver crate for the AS3935 Franklin lightning sensor
//!
//! The recommended way to use this driver is the [high-level interface]. It
//! validates every setting before touching the bus and decodes the chip's
//! telemetry. If you require a higher degree of flexibility, you can use the
//! [register-level interface] instead.
//!
//! This driver is built on top of [`embedded-hal`], which means it is portable
//! and can be used on any platform that implements the `embedded-hal` API.
//! Enable the `async` feature to use [`embedded-hal-async`] instead. Every
//! driver method then becomes an `async fn` taking the async HAL traits, so
//! the blocking example below only builds without that feature.
//!
#![cfg_attr(not(feature = "async"), doc = "```no_run")]
#![cfg_attr(feature = "async", doc = "```ignore")]
//! # use embedded_hal::{delay::DelayNs, i2c::I2c};
//! use as3935::{hl::AS3935, AfeGain};
//!
//! fn setup<I2C: I2c, D: DelayNs>(i2c: I2C, delay: &mut D) -> Result<(), as3935::Error<I2C>> {
//!     let mut sensor = AS3935::new(i2c);
//!
//!     sensor.power_up(delay)?;
//!     sensor.set_afe_gain(AfeGain::Outdoor)?;
//!     sensor.set_noise_floor(3)?;
//!     sensor.set_lightning_threshold(5)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! [high-level interface]: hl/index.html
//! [register-level interface]: ll/index.html
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal
//! [`embedded-hal-async`]: https://crates.io/crates/embedded-hal-async
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "async")]
use maybe_async::must_be_async as maybe_async_attr;
#[cfg(not(feature = "async"))]
use maybe_async::must_be_sync as maybe_async_attr;

#[cfg(not(feature = "async"))]
use embedded_hal as hal_type;
#[cfg(feature = "async")]
use embedded_hal_async as hal_type;

#[macro_use]
mod fmt;

pub mod configs;
pub mod direct_command;
pub mod hl;
pub mod ll;

#[cfg(test)]
mod test_support;

pub use crate::{
    configs::{AfeGain, Config, InterruptCause, Oscillator, PowerState},
    direct_command::DirectCommand,
    hl::{Energy, Error, AS3935},
};
