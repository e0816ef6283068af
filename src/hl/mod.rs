//! High-level interface to the AS3935
//!
//! The entry point to this API is the [AS3935] struct. Please refer to the
//! documentation there for more details.
//!
//! This module implements a high-level interface to the AS3935. This is the
//! recommended way to access the AS3935 using this crate, unless you need the
//! greater flexibility provided by the [register-level interface].
//!
//! Every setter checks its value against the setting's [`FieldDescriptor`]
//! before the bus is touched, and then changes only the bits of that setting.
//! Nothing is cached: each call reads the register it modifies, so changes
//! made by a chip reset between calls are never overwritten with stale data.
//!
//! [register-level interface]: ../ll/index.html

use core::fmt;

pub use error::*;
pub use fields::{FieldDescriptor, LegalValues};
pub use power::RECALIBRATION_WAIT_MS;
pub use telemetry::Energy;

use crate::ll;

mod error;
pub mod fields;
mod power;
mod settings;
mod telemetry;

/// Bus address of the AS3935 with both address pins pulled high
pub const DEFAULT_ADDRESS: u8 = 0x03;

/// Entry point to the AS3935 driver API
///
/// Owns whatever implements the bus trait. Pass `&mut bus` to keep ownership
/// of the bus yourself, or a shared-bus device from `embedded-hal-bus` if
/// other devices sit on the same bus. Every method takes `&mut self`, so the
/// read and write halves of a register update can never interleave with
/// another operation on the same handle. To use one sensor from several
/// threads, put the whole `AS3935` behind a mutex, not just the bus.
#[derive(Copy, Clone)]
pub struct AS3935<I2C> {
    ll: ll::AS3935<I2C>,
}

impl<I2C> AS3935<I2C> {
    /// Create a new instance of `AS3935` at [`DEFAULT_ADDRESS`]
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a new instance of `AS3935` at the given 7-bit address
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        AS3935 {
            ll: ll::AS3935::new(i2c, address),
        }
    }

    /// Releases the I2C bus
    pub fn release(self) -> I2C {
        self.ll.release()
    }

    /// Provides direct access to the register-level API
    ///
    /// Be aware that the register-level API does not validate values. Fields
    /// that are too wide are silently truncated.
    pub fn ll(&mut self) -> &mut ll::AS3935<I2C> {
        &mut self.ll
    }
}

// Can't be derived without putting requirements on `I2C`.
impl<I2C> fmt::Debug for AS3935<I2C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AS3935 {{ address: 0x{:02x}, .. }}", self.ll.address())
    }
}
