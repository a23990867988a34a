use std::time::Duration;

use crate::transport::Pins;

/// What to do when a register read-back disagrees with the value written.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum VerifyPolicy {
	/// log a warning and carry on
	Warn,
	/// fail with `Ads1263Error::RegisterVerifyMismatch`
	Strict,
}

impl Default for VerifyPolicy {
	fn default() -> Self {
		VerifyPolicy::Warn
	}
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Config {
	pub pins: Pins,
	/// deadline for DRDY to go low; expiry is logged, the read still happens
	pub ready_timeout: Duration,
	/// deadline for the in-band status byte to flag new data; expiry is an error
	pub status_timeout: Duration,
	/// pause between a configuration write and its read-back
	pub settle_ms: u32,
	pub verify: VerifyPolicy,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			pins: Pins::default(),
			ready_timeout: Duration::from_secs(5),
			status_timeout: Duration::from_secs(5),
			settle_ms: 1,
			verify: VerifyPolicy::default(),
		}
	}
}
