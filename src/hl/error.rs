use core::fmt;
use core::fmt::{Display, Formatter};

use embedded_hal::i2c;

use crate::ll;

/// An error that can occur when configuring or reading the sensor
pub enum Error<I2C>
where
    I2C: i2c::ErrorType,
{
    /// Error occured while using the I2C bus
    ///
    /// The device may be absent, may not have acknowledged, or the bus may
    /// have been lost to another controller. The handle stays usable.
    Transport(ll::Error<I2C>),

    /// A setting was given a value outside of its legal set
    ///
    /// Detected before any bus transaction, so the device was left untouched.
    InvalidArgument {
        /// Name of the rejected setting
        field: &'static str,
        /// The rejected value
        value: u8,
    },
}

impl<I2C> From<ll::Error<I2C>> for Error<I2C>
where
    I2C: i2c::ErrorType,
{
    fn from(error: ll::Error<I2C>) -> Self {
        Error::Transport(error)
    }
}

impl<I2C> Display for Error<I2C>
where
    I2C: i2c::ErrorType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Transport(error) => write!(f, "bus error: {:?}", error),
            Error::InvalidArgument { field, value } => {
                write!(f, "invalid value {} for {}", value, field)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<I2C> std::error::Error for Error<I2C> where I2C: i2c::ErrorType {}

// We can't derive this implementation, as the compiler would then require
// `I2C` itself to implement `Debug`.
impl<I2C> fmt::Debug for Error<I2C>
where
    I2C: i2c::ErrorType,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transport(error) => write!(f, "Transport({:?})", error),
            Error::InvalidArgument { field, value } => write!(
                f,
                "InvalidArgument {{ field: {:?}, value: {:?} }}",
                field, value
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl<I2C> defmt::Format for Error<I2C>
where
    I2C: i2c::ErrorType,
{
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Transport(error) => defmt::write!(f, "Transport({:?})", error),
            Error::InvalidArgument { field, value } => {
                defmt::write!(f, "InvalidArgument {{ field: {}, value: {} }}", *field, *value)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::Mock as I2cMock;

    #[test]
    fn display_names_the_rejected_setting() {
        let error = Error::<I2cMock>::InvalidArgument {
            field: "noise floor",
            value: 9,
        };

        assert_eq!(error.to_string(), "invalid value 9 for noise floor");
        assert_eq!(
            format!("{:?}", error),
            "InvalidArgument { field: \"noise floor\", value: 9 }"
        );
    }

    #[test]
    fn bus_errors_convert() {
        let error: Error<I2cMock> = ll::Error::Read(ErrorKind::Bus).into();

        assert!(matches!(error, Error::Transport(ll::Error::Read(ErrorKind::Bus))));
        assert_eq!(format!("{:?}", error), "Transport(Read(Bus))");
    }

    #[cfg(feature = "defmt")]
    #[test]
    fn test_defmt() {
        let error = Error::<I2cMock>::InvalidArgument {
            field: "noise floor",
            value: 9,
        };

        defmt::info!("error: {:?}", error);
    }
}
