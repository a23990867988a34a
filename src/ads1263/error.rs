use std::time::Duration;

use failure::Fail;

use super::consts::Register;
use super::settings::ScanMode;

#[derive(Clone, Debug, PartialEq, Eq, Fail)]
pub enum Ads1263Error {
	#[fail(display = "unexpected chip id 0b{:03b} (expected 0b{:03b})", found, expected)]
	ChipIdMismatch {
		found: u8,
		expected: u8,
	},

	#[fail(display = "register {} verify failed: wrote 0x{:02x}, read back 0x{:02x}", register, written, read)]
	RegisterVerifyMismatch {
		register: Register,
		written: u8,
		read: u8,
	},

	#[fail(display = "checksum mismatch for data 0x{:08x} (checksum byte 0x{:02x})", value, checksum)]
	ChecksumMismatch {
		value: u32,
		checksum: u8,
	},

	#[fail(display = "timeout after {:?} waiting for {}", timeout, what)]
	ReadyTimeout {
		what: &'static str,
		timeout: Duration,
	},

	#[fail(display = "channel {} out of range in {:?} mode", channel, mode)]
	InvalidChannel {
		channel: u8,
		mode: ScanMode,
	},
}
