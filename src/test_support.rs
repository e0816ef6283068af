//! Register-file fake of the AS3935 for tests
//!
//! Behaves like the chip on the bus: a register pointer set by the first
//! written byte, auto-increment on reads and writes, and the two direct
//! commands. Every transfer, plus every delay on the paired [`FakeDelay`], is
//! appended to a shared log so tests can check ordering.

use std::{cell::RefCell, rc::Rc, vec::Vec};

use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource, Operation};

use crate::{direct_command::DIRECT_COMMAND_TRIGGER, hl::DEFAULT_ADDRESS, DirectCommand};

/// Register contents after power-on or PRESET_DEFAULT
pub const POWER_ON_DEFAULTS: [u8; 9] = [0x24, 0x22, 0xc2, 0x00, 0x00, 0x00, 0x00, 0x3f, 0x00];

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Read { register: u8, len: usize },
    Write { register: u8, value: u8 },
    Command(DirectCommand),
    Delay { ns: u32 },
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub struct FakeChip {
    pub registers: [u8; 9],
    log: Log,
    transactions: usize,
    failing: bool,
}

impl FakeChip {
    pub fn new() -> Self {
        FakeChip {
            registers: POWER_ON_DEFAULTS,
            log: Log::default(),
            transactions: 0,
            failing: false,
        }
    }

    /// A delay source that records into the same log
    pub fn delay(&self) -> FakeDelay {
        FakeDelay {
            log: self.log.clone(),
        }
    }

    /// Make every following transfer fail as if the device was absent
    pub fn unplug(&mut self) {
        self.failing = true;
    }

    pub fn transactions(&self) -> usize {
        self.transactions
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    /// Values written to `register`, in order
    pub fn writes_to(&self, register: u8) -> Vec<u8> {
        self.log
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Write { register: r, value } if *r == register => Some(*value),
                _ => None,
            })
            .collect()
    }

    fn command(&mut self, address: u8, data: &[u8]) -> bool {
        let command = match address {
            0x3c => DirectCommand::PresetDefault,
            0x3d => DirectCommand::CalibRco,
            _ => return false,
        };
        assert_eq!(data, [DIRECT_COMMAND_TRIGGER], "bad direct command payload");

        if command == DirectCommand::PresetDefault {
            self.registers = POWER_ON_DEFAULTS;
        }
        self.log.borrow_mut().push(Event::Command(command));

        true
    }
}

impl i2c::ErrorType for FakeChip {
    type Error = ErrorKind;
}

impl i2c::I2c for FakeChip {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;

        if self.failing {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        assert_eq!(address, DEFAULT_ADDRESS, "unexpected bus address");

        let mut pointer = None;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    let (&register, data) = bytes.split_first().expect("empty write");
                    if self.command(register, data) {
                        continue;
                    }

                    pointer = Some(register);
                    for (i, &value) in data.iter().enumerate() {
                        let register = register + i as u8;
                        self.registers[register as usize] = value;
                        self.log
                            .borrow_mut()
                            .push(Event::Write { register, value });
                    }
                }
                Operation::Read(buffer) => {
                    let register = pointer.expect("read without register pointer");
                    for (i, byte) in buffer.iter_mut().enumerate() {
                        *byte = self.registers[register as usize + i];
                    }
                    self.log.borrow_mut().push(Event::Read {
                        register,
                        len: buffer.len(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::i2c::I2c for FakeChip {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        i2c::I2c::transaction(self, address, operations)
    }
}

pub struct FakeDelay {
    log: Log,
}

impl embedded_hal::delay::DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::Delay { ns });
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        embedded_hal::delay::DelayNs::delay_ns(self, ns)
    }
}
