use std::time::{
	Duration,
	Instant,
};

use crate::transport::Transport;

use super::consts::*;
use super::status::Status;
use super::{
	Ads1263,
	Ads1263Error,
	VerifyPolicy,
};

/// 8-bit checksum the chip appends to conversion data: byte sum plus 0x9b.
pub fn checksum(value: u32) -> u8 {
	value.to_be_bytes().iter().fold(CHECKSUM_SEED, |sum, b| sum.wrapping_add(*b))
}

pub fn checksum_ok(value: u32, checksum_byte: u8) -> bool {
	0 == checksum(value) ^ checksum_byte
}

/// Chip select window; CS is released when this is dropped.
pub(crate) struct Selected<'a, T: Transport + ?Sized + 'a> {
	transport: &'a mut T,
	chip_select: u32,
}

impl<'a, T: Transport + ?Sized> Selected<'a, T> {
	fn open(transport: &'a mut T, chip_select: u32) -> crate::AResult<Self> {
		transport.write_pin(chip_select, false)?;
		Ok(Selected {
			transport,
			chip_select,
		})
	}

	pub fn transfer(&mut self, byte: u8) -> crate::AResult<u8> {
		self.transport.transfer_byte(byte)
	}

	pub fn write(&mut self, data: &[u8]) -> crate::AResult<()> {
		for b in data {
			self.transfer(*b)?;
		}
		Ok(())
	}

	pub fn read_byte(&mut self) -> crate::AResult<u8> {
		self.transfer(0x00)
	}

	pub fn read(&mut self, target: &mut [u8]) -> crate::AResult<()> {
		for t in target.iter_mut() {
			*t = self.read_byte()?;
		}
		Ok(())
	}

	/// Re-issues `command` until the status byte clocked out after it has
	/// a bit of `ready_mask` set; chip select stays low throughout.
	pub fn poll_status_until(&mut self, command: u8, ready_mask: u8, timeout: Duration) -> crate::AResult<Status> {
		let start = Instant::now();
		loop {
			self.transfer(command)?;
			let status = Status(self.read_byte()?);
			if 0 != status.0 & ready_mask {
				return Ok(status);
			}
			if start.elapsed() >= timeout {
				return Err(Ads1263Error::ReadyTimeout {
					what: "conversion status",
					timeout,
				}.into());
			}
		}
	}
}

impl<'a, T: Transport + ?Sized> Drop for Selected<'a, T> {
	fn drop(&mut self) {
		let _ = self.transport.write_pin(self.chip_select, true);
	}
}

impl<T: Transport> Ads1263<T> {
	pub(crate) fn select(&mut self) -> crate::AResult<Selected<T>> {
		Selected::open(&mut self.transport, self.config.pins.chip_select)
	}

	pub fn send_command(&mut self, command: u8) -> crate::AResult<()> {
		debug!("command 0x{:02x}", command);
		self.select()?.transfer(command)?;
		Ok(())
	}

	pub fn write_register(&mut self, register: Register, value: u8) -> crate::AResult<()> {
		debug!("{} <- 0x{:02x}", register, value);
		let mut sel = self.select()?;
		sel.write(&[CMD_WREG | register.address(), SINGLE_REGISTER, value])
	}

	pub fn read_register(&mut self, register: Register) -> crate::AResult<u8> {
		let value = {
			let mut sel = self.select()?;
			sel.write(&[CMD_RREG | register.address(), SINGLE_REGISTER])?;
			sel.read_byte()?
		};
		debug!("{} -> 0x{:02x}", register, value);
		Ok(value)
	}

	/// Compares the register content with `written` (valid bits only).
	///
	/// A mismatch is a warning (`Ok(false)`) unless the policy is
	/// `VerifyPolicy::Strict`.
	pub fn verify_register(&mut self, register: Register, written: u8) -> crate::AResult<bool> {
		let read = self.read_register(register)?;
		let mask = register.valid_bits();
		if read & mask == written & mask {
			debug!("{} verified", register);
			return Ok(true);
		}

		let e = Ads1263Error::RegisterVerifyMismatch {
			register,
			written,
			read,
		};
		match self.config.verify {
			VerifyPolicy::Warn => {
				warn!("{}", e);
				Ok(false)
			},
			VerifyPolicy::Strict => Err(e.into()),
		}
	}

	pub fn write_verified(&mut self, register: Register, value: u8) -> crate::AResult<bool> {
		self.write_register(register, value)?;
		self.verify_register(register, value)
	}

	/// Busy-polls DRDY until it is low.
	///
	/// Returns `false` if `Config::ready_timeout` passed first; that is only
	/// logged, the caller decides whether to read anyway.
	pub fn wait_ready_on_pin(&mut self) -> crate::AResult<bool> {
		let pin = self.config.pins.data_ready;
		let timeout = self.config.ready_timeout;
		let start = Instant::now();
		loop {
			if !self.transport.read_pin(pin)? {
				return Ok(true);
			}
			if start.elapsed() >= timeout {
				warn!("{}", Ads1263Error::ReadyTimeout {
					what: "DRDY",
					timeout,
				});
				return Ok(false);
			}
		}
	}
}
