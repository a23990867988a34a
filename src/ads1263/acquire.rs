use crate::transport::Transport;

use super::consts::*;
use super::protocol::checksum_ok;
use super::settings::ScanMode;
use super::status::Status;
use super::{
	Ads1263,
	Ads1263Error,
	ConverterState,
};

/// One conversion result.
///
/// The raw code is always returned; `checksum_ok` and `ready` tell whether
/// it can be trusted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Reading {
	/// signed code (ADC2: sign extended from 24 bits)
	pub value: i32,
	/// word as received, the checksum covers this
	pub raw: u32,
	pub status: Status,
	pub checksum: u8,
	pub checksum_ok: bool,
	/// false if DRDY didn't go low in time before this read
	pub ready: bool,
}

impl Reading {
	fn new(converter: &str, status: Status, raw: u32, value: i32, checksum: u8) -> Self {
		let ok = checksum_ok(raw, checksum);
		if !ok {
			warn!("{} data read error: {}", converter, Ads1263Error::ChecksumMismatch {
				value: raw,
				checksum,
			});
		}
		Reading {
			value,
			raw,
			status,
			checksum,
			checksum_ok: ok,
			ready: true,
		}
	}

	pub fn is_valid(&self) -> bool {
		self.checksum_ok && self.ready
	}

	/// The value if the checksum matched and DRDY was seen.
	pub fn checked(&self) -> crate::AResult<i32> {
		if !self.checksum_ok {
			return Err(Ads1263Error::ChecksumMismatch {
				value: self.raw,
				checksum: self.checksum,
			}.into());
		}
		ensure!(self.ready, "sample 0x{:08x} was read after a DRDY timeout", self.raw);
		Ok(self.value)
	}
}

// a channel that never became ready doesn't stop a scan; it reads as 0
fn skip_timeout(converter: &str, channel: u8, result: crate::AResult<i32>) -> crate::AResult<i32> {
	let e = match result {
		Ok(value) => return Ok(value),
		Err(e) => e,
	};
	let timed_out = match e.downcast_ref::<Ads1263Error>() {
		Some(Ads1263Error::ReadyTimeout { .. }) => true,
		_ => false,
	};
	if !timed_out {
		return Err(e);
	}
	warn!("{} channel {} skipped: {}", converter, channel, e);
	Ok(0)
}

fn warn_unconfigured(converter: &str, state: ConverterState) {
	if state < ConverterState::Configured {
		warn!("{} read while {:?}", converter, state);
	}
}

impl<T: Transport> Ads1263<T> {
	/// RDATA1 transaction: status poll, 4 data bytes (MSB first), checksum.
	pub fn read_adc1_word(&mut self) -> crate::AResult<Reading> {
		let timeout = self.config.status_timeout;
		let (status, data, checksum) = {
			let mut sel = self.select()?;
			let status = sel.poll_status_until(CMD_RDATA1, Status::ADC1_READY, timeout)?;
			let mut data = [0u8; 4];
			sel.read(&mut data)?;
			(status, data, sel.read_byte()?)
		};

		let raw = u32::from_be_bytes(data);
		Ok(Reading::new("ADC1", status, raw, raw as i32, checksum))
	}

	/// RDATA2 transaction: status poll, 3 data bytes (MSB first), pad byte,
	/// checksum.
	pub fn read_adc2_word(&mut self) -> crate::AResult<Reading> {
		let timeout = self.config.status_timeout;
		let (status, data, checksum) = {
			let mut sel = self.select()?;
			let status = sel.poll_status_until(CMD_RDATA2, Status::ADC2_READY, timeout)?;
			let mut data = [0u8; 3];
			sel.read(&mut data)?;
			let mut pad = [0u8; ADC2_PAD_BYTES];
			sel.read(&mut pad)?;
			(status, data, sel.read_byte()?)
		};

		let raw = u32::from_be_bytes([0, data[0], data[1], data[2]]);
		let value = ((raw << 8) as i32) >> 8;
		Ok(Reading::new("ADC2", status, raw, value, checksum))
	}

	fn convert_adc1(&mut self, mode: ScanMode, channel: u8) -> crate::AResult<Reading> {
		match mode {
			ScanMode::SingleEnded => self.select_channel(channel)?,
			ScanMode::Differential => self.select_diff_channel(channel)?,
		};
		let ready = self.wait_ready_on_pin()?;
		let mut reading = self.read_adc1_word()?;
		reading.ready = ready;
		Ok(reading)
	}

	fn convert_adc2(&mut self, mode: ScanMode, channel: u8) -> crate::AResult<Reading> {
		match mode {
			ScanMode::SingleEnded => self.select_channel_adc2(channel)?,
			ScanMode::Differential => self.select_diff_channel_adc2(channel)?,
		};
		self.send_command(CMD_START2)?;
		self.read_adc2_word()
	}

	fn channel_in_range(&self, channel: u8) -> bool {
		let mode = self.scan_mode;
		if channel > mode.max_channel() {
			warn!("{}", Ads1263Error::InvalidChannel {
				channel,
				mode,
			});
			return false;
		}
		true
	}

	/// ADC1 conversion of `channel` in the current scan mode; `None` (and no
	/// bus traffic) if the channel doesn't exist in that mode.
	pub fn read_channel(&mut self, channel: u8) -> crate::AResult<Option<Reading>> {
		if !self.channel_in_range(channel) {
			return Ok(None);
		}
		warn_unconfigured("ADC1", self.adc1);
		let mode = self.scan_mode;
		self.convert_adc1(mode, channel).map(Some)
	}

	/// Raw ADC1 code of `channel`, 0 for channels out of range.
	pub fn get_channel_value(&mut self, channel: u8) -> crate::AResult<i32> {
		Ok(self.read_channel(channel)?.map_or(0, |r| r.value))
	}

	/// ADC2 conversion of `channel` in the current scan mode. There is no
	/// DRDY for ADC2; the status byte is the only readiness signal.
	pub fn read_channel_adc2(&mut self, channel: u8) -> crate::AResult<Option<Reading>> {
		if !self.channel_in_range(channel) {
			return Ok(None);
		}
		warn_unconfigured("ADC2", self.adc2);
		let mode = self.scan_mode;
		self.convert_adc2(mode, channel).map(Some)
	}

	pub fn get_channel_value_adc2(&mut self, channel: u8) -> crate::AResult<i32> {
		Ok(self.read_channel_adc2(channel)?.map_or(0, |r| r.value))
	}

	/// ADC1 codes for `channels`, in the given order. Channels that time
	/// out read as 0.
	pub fn get_all(&mut self, channels: &[u8]) -> crate::AResult<Vec<i32>> {
		let mut values = Vec::with_capacity(channels.len());
		for &channel in channels {
			let result = self.get_channel_value(channel);
			values.push(skip_timeout("ADC1", channel, result)?);
		}
		Ok(values)
	}

	/// Single-ended ADC2 codes of AIN0..AIN9; ADC2 is stopped after each,
	/// channels that time out read as 0.
	pub fn get_all_adc2(&mut self) -> crate::AResult<[i32; ADC2_CHANNELS]> {
		warn_unconfigured("ADC2", self.adc2);
		let mut values = [0i32; ADC2_CHANNELS];
		for (channel, value) in values.iter_mut().enumerate() {
			let channel = channel as u8;
			let result = self.convert_adc2(ScanMode::SingleEnded, channel).map(|r| r.value);
			self.send_command(CMD_STOP2)?;
			*value = skip_timeout("ADC2", channel, result)?;
		}
		Ok(values)
	}
}
